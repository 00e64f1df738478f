//! SDK error types and handling
//!
//! Errors raised while talking to the inference server, and their folding into
//! [`InferenceOutcome`] at the client boundary.

use codebot_core::InferenceOutcome;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// Server answered with a non-success status
    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Whether the failure happened on the wire rather than in the server
    pub fn is_network(&self) -> bool {
        matches!(self, SdkError::NetworkError(_) | SdkError::Timeout(_))
    }
}

impl From<SdkError> for InferenceOutcome {
    fn from(error: SdkError) -> Self {
        match error {
            SdkError::ApiError { status, body } => InferenceOutcome::StatusFailure { code: status, body },
            ref network if network.is_network() => InferenceOutcome::NetworkFailure(network.to_string()),
            other => InferenceOutcome::UnknownFailure(other.to_string()),
        }
    }
}
