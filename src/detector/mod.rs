//! Deepfake detector: a pretrained EfficientNet backbone whose classifier is
//! replaced by a single-output linear head followed by a sigmoid.

use anyhow::{Result, anyhow};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Module, VarBuilder, VarMap};
use candle_transformers::models::efficientnet::EfficientNet;

use crate::constants::{HEAD_OUTPUTS, INPUT_SIZE};

mod architecture;
mod weights;

pub use architecture::Architecture;
pub use weights::WeightSource;

/// Frame-level deepfake classifier. Immutable once built; share it behind an `Arc`.
pub struct DeepfakeDetector {
    model: EfficientNet,
    architecture: Architecture,
    device: Device,
}

impl DeepfakeDetector {
    /// Build the backbone from pretrained weights and attach a fresh probability head.
    /// Blocking: may download weights.
    pub fn load(architecture: Architecture, source: &WeightSource) -> Result<Self> {
        let device = select_device();
        log::info!("Loading {} detector on {:?}", architecture, device);

        let weights_path = source.resolve(architecture)?;
        let (detector, varmap) = Self::build(architecture, &device)?;
        let loaded = weights::load_backbone(&varmap, &weights_path, &device)?;
        detector.self_check()?;

        log::info!(
            "Detector ready: {} backbone tensors from {}, head {} -> {}",
            loaded,
            weights_path.display(),
            architecture.feature_width(),
            HEAD_OUTPUTS
        );
        Ok(detector)
    }

    /// Construct the network over a fresh `VarMap`. The classifier is sized for
    /// [`HEAD_OUTPUTS`] so it never matches a pretrained 1000-class classifier.
    pub(crate) fn build(architecture: Architecture, device: &Device) -> Result<(Self, VarMap)> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = EfficientNet::new(vb, architecture.block_configs(), HEAD_OUTPUTS)?;

        Ok((
            Self {
                model,
                architecture,
                device: device.clone(),
            },
            varmap,
        ))
    }

    /// Deepfake probability per image for an `(N, 3, H, W)` batch. Returns `(N, 1)` in (0, 1).
    /// Batch norm runs on its running statistics and no gradients are tracked.
    pub fn predict(&self, batch: &Tensor) -> Result<Tensor> {
        let batch = batch.to_device(&self.device)?.to_dtype(DType::F32)?;
        let logits = self.model.forward(&batch)?;
        Ok(candle_nn::ops::sigmoid(&logits)?)
    }

    /// Run one blank frame through the network and verify the head emits a single probability
    pub fn self_check(&self) -> Result<()> {
        let blank = Tensor::zeros((1, 3, INPUT_SIZE, INPUT_SIZE), DType::F32, &self.device)?;
        let probs = self.predict(&blank)?;
        if probs.dims() != [1, HEAD_OUTPUTS] {
            return Err(anyhow!(
                "Detector head produced shape {:?}, expected [1, {}]",
                probs.dims(),
                HEAD_OUTPUTS
            ));
        }
        let p = probs.flatten_all()?.to_vec1::<f32>()?[0];
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Detector head produced {} outside [0, 1]", p));
        }
        Ok(())
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }
}

#[cfg(feature = "metal")]
fn select_device() -> Device {
    Device::new_metal(0).unwrap_or(Device::Cpu)
}

#[cfg(not(feature = "metal"))]
fn select_device() -> Device {
    Device::Cpu
}
