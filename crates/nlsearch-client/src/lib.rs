//! # NLSearch Client
//!
//! Async REST client that executes the structured query documents produced
//! by [`nlsearch_parser`] against an OpenSearch-compatible cluster. The
//! client is a thin transport wrapper: all query semantics live in the
//! parser crate, and the parser has no dependency on anything here.

pub mod client;
pub mod error;

pub use client::{SearchClient, SearchClientBuilder};
pub use error::{ClientError, Result};
