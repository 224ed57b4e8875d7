//! Error types for the YouTube module

use thiserror::Error;

/// Errors that can occur when talking to the YouTube Data API
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body from the API
        message: String,
    },

    /// Failed to parse the API response
    #[error("Parse error: {0}")]
    ParseError(String),
}
