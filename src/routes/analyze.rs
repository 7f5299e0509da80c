//! Video analysis endpoint (/analyze)

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
};
use std::sync::Arc;

use crate::AppState;
use crate::constants::VIDEO_FIELD;
use crate::models::AnalysisResult;
use crate::services::error::LogErr;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

/// POST /analyze - Accept a video upload and return a deepfake score.
/// The upload is drained and discarded; no frames are extracted yet.
async fn analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, StatusCode> {
    let mut video_size = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .log_rejection("[analyze] Multipart field error")?
    {
        if field.name() != Some(VIDEO_FIELD) {
            log::debug!("[analyze] Skipping field {:?}", field.name());
            continue;
        }

        // Drain chunk by chunk so the upload is never held in memory
        let content_type = field.content_type().map(str::to_string);
        let mut size = 0usize;
        while let Some(chunk) = field
            .chunk()
            .await
            .log_rejection("[analyze] Failed to read video field")?
        {
            size += chunk.len();
        }

        log::debug!(
            "[analyze] Video field: {} bytes, content type {:?}",
            size,
            content_type
        );
        video_size = Some(size);
    }

    let Some(size) = video_size else {
        log::warn!("[analyze] Request missing '{}' field", VIDEO_FIELD);
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };

    let result = AnalysisResult::placeholder();
    log::info!(
        "[analyze] {} byte upload scored {} ({})",
        size,
        result.score,
        state.detector.architecture()
    );

    Ok(Json(result))
}
