//! Parser entry point.
//!
//! The orchestrator owns the fixed pipeline order: classify once, run the
//! extractors for search-category input, hand everything to the builder.
//! It holds no mutable state and is safe to share across threads; every
//! call derives its entities fresh from the input string.

use tracing::{debug, info, instrument};

use crate::classify::{classify, QueryCategory};
use crate::entity::{extract_entities, ExtractedEntities};
use crate::error::{ParseError, Result};
use crate::query::{QueryBuilder, StructuredQuery};

/// Converts natural language sentences into structured query documents.
#[derive(Debug, Clone, Default)]
pub struct NlqParser {
    builder: QueryBuilder,
}

impl NlqParser {
    pub fn new() -> Self {
        Self {
            builder: QueryBuilder::new(),
        }
    }

    /// Parses one sentence into a structured query document.
    ///
    /// This is total: every input, including the empty string, yields a
    /// valid document. Unrecognizable input yields the error shape rather
    /// than an `Err` or a panic.
    #[instrument(skip(self), fields(query_len = input.len()))]
    pub fn parse(&self, input: &str) -> StructuredQuery {
        let query = normalize(input);
        let category = classify(&query);
        debug!(?category, "classified query");

        let entities = match category {
            QueryCategory::Search => {
                let entities = extract_entities(&query);
                debug!(
                    level = ?entities.level,
                    service = ?entities.service,
                    size = ?entities.size,
                    time = ?entities.time,
                    terms = ?entities.terms,
                    "extracted entities"
                );
                entities
            }
            _ => ExtractedEntities::default(),
        };

        let doc = self.builder.build(category, entities);
        info!(error = doc.is_error(), "generated query document");
        doc
    }

    /// Like [`parse`](Self::parse), but reports the error document as a
    /// typed error instead.
    pub fn try_parse(&self, input: &str) -> Result<StructuredQuery> {
        match self.parse(input) {
            StructuredQuery::Error { error } => Err(ParseError::unsupported(error)),
            doc => Ok(doc),
        }
    }

    /// Parses and serializes to compact JSON, the wire form consumed by the
    /// execution client.
    pub fn parse_to_json(&self, input: &str) -> String {
        let doc = self.parse(input);
        serde_json::to_string(&doc)
            .unwrap_or_else(|_| serde_json::json!({"error": crate::query::UNSUPPORTED_MESSAGE}).to_string())
    }
}

/// Lower-cases, trims, and collapses interior whitespace.
fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Show   ERRORS   today  "), "show errors today");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parser = NlqParser::new();
        let doc = parser.parse("ERRORS in LAST 5 Minutes for Checkout-Service");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value["query"]["bool"]["must"][1],
            json!({"match": {"service.name": "checkout-service"}})
        );
    }

    #[test]
    fn test_empty_input_is_error_document() {
        let parser = NlqParser::new();
        let doc = parser.parse("");
        assert!(doc.is_error());
    }

    #[test]
    fn test_try_parse_maps_error_shape() {
        let parser = NlqParser::new();
        assert!(parser.try_parse("errors today").is_ok());
        assert!(matches!(parser.try_parse(""), Err(ParseError::Unsupported(_))));
    }

    #[test]
    fn test_parse_to_json_is_compact() {
        let parser = NlqParser::new();
        let json = parser.parse_to_json("list indices");
        assert_eq!(json, r#"{"api":"_cat/indices"}"#);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = NlqParser::new();
        let input = "show top 100 warnings from payment-service last hour";
        assert_eq!(parser.parse_to_json(input), parser.parse_to_json(input));
    }
}
