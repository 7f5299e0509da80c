//! Pretrained weight resolution and backbone loading.

use anyhow::{Context, Result, anyhow};
use candle_core::Device;
use candle_core::safetensors::MmapedSafetensors;
use candle_nn::VarMap;
use hf_hub::{Repo, RepoType, api::sync::Api};
use std::path::{Path, PathBuf};

use super::Architecture;
use crate::constants::HEAD_PREFIX;

/// Where pretrained backbone weights come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightSource {
    /// Download (or reuse the cached copy) from the model hub
    Hub { repo: String },
    /// A safetensors file already on disk
    Local(PathBuf),
}

impl WeightSource {
    /// Resolve to a local safetensors path, downloading if needed. Blocking.
    pub fn resolve(&self, architecture: Architecture) -> Result<PathBuf> {
        match self {
            WeightSource::Local(path) => {
                if !path.is_file() {
                    return Err(anyhow!("Weights file not found: {}", path.display()));
                }
                Ok(path.clone())
            }
            WeightSource::Hub { repo } => {
                let file = architecture.weights_file();
                log::info!("Fetching {} from hub repo {}", file, repo);
                let api = Api::new().context("Failed to initialise hub client")?;
                api.repo(Repo::new(repo.clone(), RepoType::Model))
                    .get(&file)
                    .with_context(|| format!("Failed to fetch {} from {}", file, repo))
            }
        }
    }
}

/// Copy pretrained tensors into every backbone variable of `varmap`.
/// Head variables keep their fresh initialisation; the pretrained classifier is never read.
/// Returns the number of tensors loaded.
pub fn load_backbone(varmap: &VarMap, path: &Path, device: &Device) -> Result<usize> {
    let tensors = unsafe { MmapedSafetensors::new(path) }
        .with_context(|| format!("Failed to map weights file {}", path.display()))?;

    let vars = varmap
        .data()
        .lock()
        .map_err(|e| anyhow!("Lock error: {}", e))?;

    let mut loaded = 0usize;
    for (name, var) in vars.iter() {
        if name.starts_with(HEAD_PREFIX) {
            continue;
        }
        let tensor = tensors
            .load(name, device)
            .with_context(|| format!("Weights file is missing backbone tensor {}", name))?
            .to_dtype(var.dtype())?;
        var.set(&tensor).with_context(|| {
            format!(
                "Backbone tensor {} has shape {:?}, expected {:?}",
                name,
                tensor.shape(),
                var.shape()
            )
        })?;
        loaded += 1;
    }

    Ok(loaded)
}
