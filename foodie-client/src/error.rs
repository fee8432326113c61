//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote answered but refused the operation (`success: false`)
    #[error("Rejected by remote: {0}")]
    Rejected(String),

    /// Client could not be built from its configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the remote should be considered unusable.
    ///
    /// Everything except an explicit rejection counts: a malformed body is
    /// handled exactly like a dropped connection.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

impl From<shared::ModelError> for ClientError {
    fn from(err: shared::ModelError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
