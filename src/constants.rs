//! Application constants

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Maximum upload size for /analyze, in megabytes
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 500;

/// Hub repository holding EfficientNet weights in safetensors format
pub const DEFAULT_MODEL_REPO: &str = "lmz/candle-efficientnet";

/// Variable prefix of the classifier head inside the EfficientNet var tree.
/// Anything under it is replaced, never loaded from pretrained weights.
pub const HEAD_PREFIX: &str = "classifier.";

/// The replaced head emits a single deepfake probability
pub const HEAD_OUTPUTS: usize = 1;

/// Square input resolution used for the startup self-check
pub const INPUT_SIZE: usize = 224;

/// Multipart field carrying the uploaded video
pub const VIDEO_FIELD: &str = "video";

/// Score returned by /analyze until frame-level inference is wired in
pub const ANALYSIS_SCORE: u8 = 85;

/// Explanation returned alongside [`ANALYSIS_SCORE`]
pub const ANALYSIS_EXPLANATION: &str = "High facial inconsistency detected.";
