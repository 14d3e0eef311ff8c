//! # NLSearch Parser
//!
//! Converts a free-form English sentence describing a log search intent into
//! a canonical structured query document for an OpenSearch-compatible REST
//! API.
//!
//! The engine is deterministic and rule-based: a classifier decides whether
//! the sentence is a search, a cluster-health request, or a cat-style admin
//! listing, and a set of independent extractors pull typed entities (time
//! range, log level, service name, result size, free-text terms) out of the
//! raw text. A builder assembles the final document with fixed default
//! policies. Parsing never fails: unrecognizable input yields the error
//! document shape, not a panic or an `Err`.
//!
//! ## Example
//!
//! ```rust
//! use nlsearch_parser::NlqParser;
//!
//! let parser = NlqParser::new();
//! let doc = parser.parse("errors in last 5 minutes for checkout-service");
//! let json = serde_json::to_string(&doc).unwrap();
//! assert!(json.contains("now-5m"));
//! ```

pub mod classify;
pub mod engine;
pub mod entity;
pub mod error;
pub mod query;

pub use classify::{CatResource, QueryCategory};
pub use engine::NlqParser;
pub use entity::{ExtractedEntities, LogLevel, TimeRange};
pub use error::{ParseError, Result};
pub use query::{QueryBuilder, SearchBody, StructuredQuery, DEFAULT_SIZE, UNSUPPORTED_MESSAGE};
