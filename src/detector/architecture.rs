//! Supported pretrained backbones.

use candle_transformers::models::efficientnet::MBConvConfig;
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;

/// EfficientNet variant used as the detector backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Architecture {
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    #[default]
    B7,
}

impl Architecture {
    pub const ALL: [Architecture; 8] = [
        Architecture::B0,
        Architecture::B1,
        Architecture::B2,
        Architecture::B3,
        Architecture::B4,
        Architecture::B5,
        Architecture::B6,
        Architecture::B7,
    ];

    /// Short variant tag, e.g. "b7"
    pub fn tag(&self) -> &'static str {
        match self {
            Architecture::B0 => "b0",
            Architecture::B1 => "b1",
            Architecture::B2 => "b2",
            Architecture::B3 => "b3",
            Architecture::B4 => "b4",
            Architecture::B5 => "b5",
            Architecture::B6 => "b6",
            Architecture::B7 => "b7",
        }
    }

    /// MBConv block layout for this variant
    pub fn block_configs(&self) -> Vec<MBConvConfig> {
        match self {
            Architecture::B0 => MBConvConfig::b0(),
            Architecture::B1 => MBConvConfig::b1(),
            Architecture::B2 => MBConvConfig::b2(),
            Architecture::B3 => MBConvConfig::b3(),
            Architecture::B4 => MBConvConfig::b4(),
            Architecture::B5 => MBConvConfig::b5(),
            Architecture::B6 => MBConvConfig::b6(),
            Architecture::B7 => MBConvConfig::b7(),
        }
    }

    /// Width of the pooled features feeding the head (4x the last block's channels)
    pub fn feature_width(&self) -> usize {
        match self {
            Architecture::B0 | Architecture::B1 => 1280,
            Architecture::B2 => 1408,
            Architecture::B3 => 1536,
            Architecture::B4 => 1792,
            Architecture::B5 => 2048,
            Architecture::B6 => 2304,
            Architecture::B7 => 2560,
        }
    }

    /// Safetensors file name inside the weights repository
    pub fn weights_file(&self) -> String {
        format!("efficientnet-{}.safetensors", self.tag())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "efficientnet-{}", self.tag())
    }
}

/// Accepts "b7", "efficientnet-b7", "efficientnet_b7" and timm hub ids such as
/// "hf_hub:timm/tf_efficientnet_b7.ns_jft_in1k".
impl FromStr for Architecture {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let mut name = lowered.as_str();
        name = name.strip_prefix("hf_hub:").unwrap_or(name);
        name = name.strip_prefix("timm/").unwrap_or(name);
        // Drop the pretrained tag: "tf_efficientnet_b7.ns_jft_in1k"
        name = name.split('.').next().unwrap_or(name);
        name = name.strip_prefix("tf_").unwrap_or(name);
        if let Some(rest) = name.strip_prefix("efficientnet") {
            name = rest.trim_start_matches(['-', '_']);
        }

        Architecture::ALL
            .into_iter()
            .find(|arch| arch.tag() == name)
            .ok_or_else(|| ConfigError::UnknownArchitecture(s.to_string()))
    }
}
