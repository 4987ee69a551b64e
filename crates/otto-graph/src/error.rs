//! Error types for otto-graph

use thiserror::Error;

/// Result type alias using otto-graph Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when calling the Graph API
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Graph returned an error response
    #[error("Graph API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    /// Blank or missing access token
    #[error("Invalid access token")]
    InvalidToken,

    /// Response shape did not match expectations
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Create an API error from a status code and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
