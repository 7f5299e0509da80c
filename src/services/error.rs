//! Error handling utilities for route handlers

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

/// Errors that carry the status code they should surface as
pub trait StatusError: std::fmt::Display {
    fn status(&self) -> StatusCode;
}

impl StatusError for MultipartError {
    fn status(&self) -> StatusCode {
        MultipartError::status(self)
    }
}

/// Extension trait for logging errors and converting to StatusCode
pub trait LogErr<T> {
    /// Log error with context and return the error's own StatusCode
    fn log_rejection(self, context: &str) -> Result<T, StatusCode>;
}

impl<T, E: StatusError> LogErr<T> for Result<T, E> {
    fn log_rejection(self, context: &str) -> Result<T, StatusCode> {
        self.map_err(|e| {
            let status = e.status();
            log::warn!("{}: {} ({})", context, e, status);
            status
        })
    }
}
