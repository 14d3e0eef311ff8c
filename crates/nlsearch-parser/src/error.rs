//! Parser-specific error types.

use thiserror::Error;

/// Errors surfaced by the fallible parsing entry point.
///
/// `parse` itself never fails; this type exists for callers that prefer a
/// `Result` over inspecting the error document shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    Unsupported(String),
}

impl ParseError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

impl From<ParseError> for nlsearch_core::AppError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Unsupported(msg) => nlsearch_core::AppError::validation(msg),
        }
    }
}
