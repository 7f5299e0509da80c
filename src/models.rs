use serde::{Deserialize, Serialize};

use crate::constants::{ANALYSIS_EXPLANATION, ANALYSIS_SCORE};

/// Response body of POST /analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Deepfake likelihood, 0-100
    pub score: u8,
    pub explanation: String,
}

impl AnalysisResult {
    /// Fixed verdict returned while no frame pipeline exists
    pub fn placeholder() -> Self {
        Self {
            score: ANALYSIS_SCORE,
            explanation: ANALYSIS_EXPLANATION.to_string(),
        }
    }
}
