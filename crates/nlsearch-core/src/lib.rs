//! # NLSearch Core
//!
//! Shared error types and configuration loading for the NLSearch workspace.

pub mod config;
pub mod error;

pub use config::SearchBackendConfig;
pub use error::{AppError, Result};
