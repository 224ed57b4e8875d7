//! Error types for the Google News module

use thiserror::Error;

/// Errors that can occur while fetching or decoding Google News data
#[derive(Debug, Error)]
pub enum GnewsError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Endpoint returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the endpoint
        message: String,
    },

    /// Failed to parse a feed or response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The batchexecute RPC did not return a decoded URL
    #[error("RPC decode failed: {0}")]
    RpcFailed(String),
}
