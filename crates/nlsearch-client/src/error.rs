//! Error types for the execution client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the search backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// The parser produced an error document; nothing was sent
    #[error("Query rejected: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Check if retrying the request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Server(_))
    }
}

impl From<ClientError> for nlsearch_core::AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected(msg) => nlsearch_core::AppError::validation(msg),
            other => nlsearch_core::AppError::backend(other.to_string()),
        }
    }
}
