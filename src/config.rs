//! Service configuration, read once from the environment at startup.
//!
//! ## Environment Variables
//! - `PORT` - port to listen on (default: `8000`)
//! - `HOST` - bind address (default: `0.0.0.0`)
//! - `MAX_UPLOAD_SIZE_MB` - request body limit for uploads (default: `500`)
//! - `DETECTOR_ARCHITECTURE` - backbone variant, e.g. `b7` or a timm hub id (default: `b7`)
//! - `DETECTOR_WEIGHTS` - local safetensors file; skips the hub download when set
//! - `DETECTOR_REPO` - hub repository for weights (default: `lmz/candle-efficientnet`)
//! - `CORS_ALLOWED_ORIGINS` - comma separated origins; any origin when unset

use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_HOST, DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_MODEL_REPO, DEFAULT_PORT};
use crate::detector::{Architecture, WeightSource};

/// Error types for configuration parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownArchitecture(String),
    InvalidNumber { key: &'static str, value: String },
    InvalidOrigin(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownArchitecture(s) => write!(f, "Unknown model architecture: {:?}", s),
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be a positive integer, got {:?}", key, value)
            }
            ConfigError::InvalidOrigin(s) => {
                write!(f, "CORS_ALLOWED_ORIGINS entry {:?} is not an http(s) origin", s)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_upload_size: usize,
    pub architecture: Architecture,
    pub weights: WeightSource,
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = parse_positive(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT);
        let max_upload_size = match get("MAX_UPLOAD_SIZE_MB") {
            Some(raw) => parse_positive::<usize>(Some(raw.clone()), "MAX_UPLOAD_SIZE_MB")?
                .and_then(|mb| mb.checked_mul(1024 * 1024))
                .ok_or(ConfigError::InvalidNumber {
                    key: "MAX_UPLOAD_SIZE_MB",
                    value: raw,
                })?,
            None => DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
        };

        let architecture = match get("DETECTOR_ARCHITECTURE") {
            Some(id) => id.parse()?,
            None => Architecture::default(),
        };

        let weights = match get("DETECTOR_WEIGHTS") {
            Some(path) => WeightSource::Local(PathBuf::from(path)),
            None => WeightSource::Hub {
                repo: get("DETECTOR_REPO").unwrap_or_else(|| DEFAULT_MODEL_REPO.to_string()),
            },
        };

        let cors_allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(parse_origin)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            max_upload_size,
            architecture,
            weights,
            cors_allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let invalid = || ConfigError::InvalidOrigin(origin.to_string());
    let host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(invalid)?;
    if host.is_empty() || host.contains(['/', ' ']) {
        return Err(invalid());
    }
    HeaderValue::from_str(origin).map_err(|_| invalid())
}

fn parse_positive<T>(value: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    let Some(raw) = value else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|v| *v > T::default())
        .map(Some)
        .ok_or(ConfigError::InvalidNumber { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_upload_size, 500 * 1024 * 1024);
        assert_eq!(config.architecture, Architecture::B7);
        assert!(matches!(
            config.weights,
            WeightSource::Hub { ref repo } if repo == "lmz/candle-efficientnet"
        ));
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9001"),
            ("HOST", "127.0.0.1"),
            ("MAX_UPLOAD_SIZE_MB", "16"),
            ("DETECTOR_ARCHITECTURE", "hf_hub:timm/tf_efficientnet_b7.ns_jft_in1k"),
            ("DETECTOR_WEIGHTS", "/models/b7.safetensors"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, https://deepscan.example ,"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9001");
        assert_eq!(config.max_upload_size, 16 * 1024 * 1024);
        assert_eq!(config.architecture, Architecture::B7);
        assert!(matches!(
            config.weights,
            WeightSource::Local(ref p) if p == &PathBuf::from("/models/b7.safetensors")
        ));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://deepscan.example"]
        );
    }

    #[test]
    fn test_blank_values_take_defaults() {
        let config = config_from(&[("PORT", "  "), ("DETECTOR_ARCHITECTURE", "")]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.architecture, Architecture::B7);
    }

    #[test]
    fn test_custom_repo() {
        let config = config_from(&[("DETECTOR_REPO", "acme/efficientnet")]).unwrap();
        assert!(matches!(
            config.weights,
            WeightSource::Hub { ref repo } if repo == "acme/efficientnet"
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            config_from(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidNumber {
                key: "PORT",
                value: "http".to_string()
            }
        );
        assert!(config_from(&[("PORT", "0")]).is_err());
        assert!(config_from(&[("MAX_UPLOAD_SIZE_MB", "-1")]).is_err());
        assert_eq!(
            config_from(&[("DETECTOR_ARCHITECTURE", "resnet50")]).unwrap_err(),
            ConfigError::UnknownArchitecture("resnet50".to_string())
        );
    }

    #[test]
    fn test_rejects_upload_size_that_overflows() {
        for huge in ["18446744073709551615", "17592186044416"] {
            assert_eq!(
                config_from(&[("MAX_UPLOAD_SIZE_MB", huge)]).unwrap_err(),
                ConfigError::InvalidNumber {
                    key: "MAX_UPLOAD_SIZE_MB",
                    value: huge.to_string()
                }
            );
        }
    }

    #[test]
    fn test_rejects_bad_cors_origins() {
        for bad in ["localhost:5173", "http://", "https://a.example/path", "http://bad\x7forigin"] {
            let err = config_from(&[("CORS_ALLOWED_ORIGINS", bad)]).unwrap_err();
            assert_eq!(err, ConfigError::InvalidOrigin(bad.to_string()), "{bad}");
        }
        // One bad entry fails the whole list
        assert!(config_from(&[("CORS_ALLOWED_ORIGINS", "http://localhost:5173,ftp://x")]).is_err());
    }
}
