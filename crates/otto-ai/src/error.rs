//! Error types for otto-ai

use thiserror::Error;

/// Result type alias using otto-ai Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the model or moderation APIs
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    /// Invalid or missing API key
    #[error("Invalid or missing API key")]
    InvalidApiKey,

    /// The completion did not contain a message
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The model output could not be parsed into a plan
    #[error("Malformed plan: {0}")]
    MalformedPlan(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
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
