//! Structured query assembly.
//!
//! The builder combines the classification and the extracted entities into
//! the final document: a boolean conjunction for searches, a bare API path
//! for administrative calls, or the error shape when nothing usable was
//! extracted.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::classify::QueryCategory;
use crate::entity::{ExtractedEntities, TimeRange};

/// Result size applied when the sentence does not request one.
pub const DEFAULT_SIZE: u32 = 50;

/// Error message for sentences the engine cannot turn into a query.
pub const UNSUPPORTED_MESSAGE: &str =
    "Unsupported query. Please rephrase or check available APIs.";

/// The canonical output document.
///
/// Serializes to exactly one of the three wire shapes:
/// `{query:{bool:{must:[...]}}, size, sort}`, `{api:"<path>"}`, or
/// `{error:"<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredQuery {
    Search(SearchBody),
    Api { api: String },
    Error { error: String },
}

/// Body of a search-shaped query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBody {
    pub query: Value,
    pub size: u32,
    pub sort: Value,
}

impl StructuredQuery {
    pub fn api(path: impl Into<String>) -> Self {
        Self::Api { api: path.into() }
    }

    pub fn unsupported() -> Self {
        Self::Error {
            error: UNSUPPORTED_MESSAGE.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Assembles structured query documents with fixed default policies.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_size: u32,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
        }
    }

    /// Builds the final document for a classified query.
    pub fn build(&self, category: QueryCategory, entities: ExtractedEntities) -> StructuredQuery {
        match category {
            QueryCategory::ClusterHealth => StructuredQuery::api("_cluster/health"),
            QueryCategory::CatApi(resource) => StructuredQuery::api(resource.api_path()),
            QueryCategory::Unsupported => StructuredQuery::unsupported(),
            QueryCategory::Search => self.build_search(entities),
        }
    }

    /// Builds the conjunction in fixed order: log level, service name, one
    /// condition per free-text term, then the time range last. Zero
    /// conditions means an unconstrained full-index search, which is never a
    /// valid inferred intent.
    fn build_search(&self, entities: ExtractedEntities) -> StructuredQuery {
        let mut must: Vec<Value> = Vec::new();

        if let Some(level) = entities.level {
            must.push(json!({"match": {"log.level": level.as_str()}}));
        }
        if let Some(service) = entities.service {
            must.push(json!({"match": {"service.name": service}}));
        }
        for term in entities.terms {
            must.push(json!({"match": {"_all": term}}));
        }
        if let Some(time) = entities.time {
            must.push(time_condition(&time));
        }

        if must.is_empty() {
            debug!("no conditions extracted, returning error document");
            return StructuredQuery::unsupported();
        }

        StructuredQuery::Search(SearchBody {
            query: json!({"bool": {"must": must}}),
            size: entities.size.unwrap_or(self.default_size),
            // Newest-first on the timestamp field, unconditionally.
            sort: json!([{"@timestamp": "desc"}]),
        })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn time_condition(time: &TimeRange) -> Value {
    let mut range = json!({"gte": time.gte});
    if let Some(lt) = &time.lt {
        range["lt"] = json!(lt);
    }
    json!({"range": {"@timestamp": range}})
}
