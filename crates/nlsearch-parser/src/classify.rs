//! Query category classification.
//!
//! Administrative intents (cluster health, cat-style listings) are
//! unambiguous short-circuits and take precedence over search vocabulary
//! appearing in the same sentence. Mutating intents (index creation,
//! mapping changes, ...) are refused outright. Search is the default.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Resources reachable through the cat API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatResource {
    Indices,
    Nodes,
    Shards,
}

impl CatResource {
    pub fn api_path(&self) -> &'static str {
        match self {
            Self::Indices => "_cat/indices",
            Self::Nodes => "_cat/nodes",
            Self::Shards => "_cat/shards",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "indices" => Some(Self::Indices),
            "nodes" => Some(Self::Nodes),
            "shards" => Some(Self::Shards),
            _ => None,
        }
    }
}

/// The kind of structured query to build. Exactly one per parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    Search,
    ClusterHealth,
    CatApi(CatResource),
    /// Mutating or otherwise unsupported administrative intent.
    Unsupported,
}

lazy_static! {
    static ref CLUSTER: Regex = Regex::new(r"\bcluster\s+(?:health|status)\b").unwrap();
    static ref CAT: Regex =
        Regex::new(r"\b(?:list|show|cat)\s+(indices|nodes|shards)\b").unwrap();
    static ref MUTATING: Regex = Regex::new(
        r"\b(?:create|delete|update|insert|reindex|bulk|scroll|aggregate|aggregations?|pipeline|template|settings|alias(?:es)?|snapshot|restore|backup|mappings?)\b"
    )
    .unwrap();
}

/// Classifies the (lowercased) input, in fixed priority order.
pub fn classify(query: &str) -> QueryCategory {
    if CLUSTER.is_match(query) {
        return QueryCategory::ClusterHealth;
    }
    if let Some(caps) = CAT.captures(query) {
        if let Some(resource) = CatResource::from_keyword(&caps[1]) {
            return QueryCategory::CatApi(resource);
        }
    }
    if MUTATING.is_match(query) {
        return QueryCategory::Unsupported;
    }
    QueryCategory::Search
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_health() {
        assert_eq!(classify("show cluster health"), QueryCategory::ClusterHealth);
        assert_eq!(classify("cluster status please"), QueryCategory::ClusterHealth);
    }

    #[test]
    fn test_cat_listings() {
        assert_eq!(classify("list indices"), QueryCategory::CatApi(CatResource::Indices));
        assert_eq!(classify("show nodes"), QueryCategory::CatApi(CatResource::Nodes));
        assert_eq!(classify("list shards"), QueryCategory::CatApi(CatResource::Shards));
        assert_eq!(classify("cat indices"), QueryCategory::CatApi(CatResource::Indices));
    }

    #[test]
    fn test_admin_intent_beats_search_vocabulary() {
        // Log terms in the same sentence do not demote an admin intent.
        assert_eq!(
            classify("cluster health for errors in checkout-service"),
            QueryCategory::ClusterHealth
        );
    }

    #[test]
    fn test_mutating_intent_is_unsupported() {
        assert_eq!(
            classify("create a new index with custom mappings"),
            QueryCategory::Unsupported
        );
        assert_eq!(classify("delete old documents"), QueryCategory::Unsupported);
    }

    #[test]
    fn test_cat_listing_beats_mutating_vocabulary() {
        // `indices` alone is a listing, not a mutation.
        assert_eq!(classify("list indices"), QueryCategory::CatApi(CatResource::Indices));
    }

    #[test]
    fn test_search_is_default() {
        assert_eq!(classify("errors in last 5 minutes"), QueryCategory::Search);
        assert_eq!(classify(""), QueryCategory::Search);
    }
}
