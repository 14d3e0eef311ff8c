//! Entity extraction.
//!
//! Each extractor is a stateless function over a fixed pattern table. All of
//! them read the (lowercased, whitespace-normalized) input independently;
//! only free-text extraction depends on the spans the other extractors
//! consume, so it runs last and scrubs those spans first.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// A relative time filter on the timestamp field, e.g. `now-5m`.
///
/// `lt` is only set for window expressions like `yesterday` that need an
/// upper bound as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub gte: String,
    pub lt: Option<String>,
}

impl TimeRange {
    pub fn since(gte: impl Into<String>) -> Self {
        Self {
            gte: gte.into(),
            lt: None,
        }
    }

    pub fn window(gte: impl Into<String>, lt: impl Into<String>) -> Self {
        Self {
            gte: gte.into(),
            lt: Some(lt.into()),
        }
    }
}

/// Canonical log levels. Surface synonyms (`errors`, `warnings`, ...) all
/// resolve to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Everything the extractors pulled out of one input sentence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedEntities {
    pub level: Option<LogLevel>,
    pub service: Option<String>,
    pub size: Option<u32>,
    pub time: Option<TimeRange>,
    pub terms: Vec<String>,
}

/// Time unit words and their backend codes. Minute (`m`) and month (`M`)
/// are distinct codes and must not collide.
const TIME_UNITS: &[(&str, &str)] = &[
    ("minute", "m"),
    ("hour", "h"),
    ("day", "d"),
    ("week", "w"),
    ("month", "M"),
    ("year", "y"),
];

/// Surface forms mapped to canonical log levels, in match priority order.
const LEVEL_SYNONYMS: &[(&str, LogLevel)] = &[
    ("error", LogLevel::Error),
    ("errors", LogLevel::Error),
    ("warn", LogLevel::Warn),
    ("warning", LogLevel::Warn),
    ("warnings", LogLevel::Warn),
    ("info", LogLevel::Info),
    ("debug", LogLevel::Debug),
    ("trace", LogLevel::Trace),
];

lazy_static! {
    /// `last N <unit>` or `last <unit>` (implicit magnitude 1).
    static ref RELATIVE_TIME: Regex = Regex::new(
        r"\blast\s+(?:(\d+)\s+)?(minutes?|hours?|days?|weeks?|months?|years?)\b"
    )
    .unwrap();
    static ref TODAY: Regex = Regex::new(r"\btoday\b").unwrap();
    static ref YESTERDAY: Regex = Regex::new(r"\byesterday\b").unwrap();

    /// Log level vocabulary, word-boundary matching only.
    static ref LOG_LEVEL: Regex =
        Regex::new(r"\b(errors?|warn(?:ings?)?|info|debug|trace)\b").unwrap();

    /// A hyphenated token already ending in `-service`, e.g. `checkout-service`.
    static ref SERVICE_TOKEN: Regex =
        Regex::new(r"\b([a-z0-9][a-z0-9_-]*-service)\b").unwrap();

    /// Prepositional cue: `for X service` / `in X service`.
    static ref SERVICE_CUE: Regex =
        Regex::new(r"\b(?:for|in)\s+([a-z0-9][a-z0-9_-]*)\s+service\b").unwrap();

    /// Explicit result-count request.
    static ref SIZE_CUE: Regex =
        Regex::new(r"\b(?:(?:top|first|limit)\s+(\d+)|show\s+(\d+)\s+results?)\b").unwrap();

    /// Tokens considered for free-text terms.
    static ref WORD: Regex = Regex::new(r"\b[a-z]+\b").unwrap();

    static ref STOP_WORDS: HashSet<&'static str> = [
        "a", "an", "and", "api", "are", "be", "been", "being", "cluster", "day",
        "days", "details", "did", "do", "does", "find", "first", "for", "from",
        "get", "had", "has", "have", "health", "hour", "hours", "in", "indices",
        "is", "last", "limit", "list", "log", "logs", "me", "minute", "minutes",
        "month", "months", "nodes", "of", "query", "results", "search", "service",
        "shards", "show", "status", "that", "the", "to", "today", "top", "want",
        "was", "week", "weeks", "were", "with", "year", "years", "yesterday",
    ]
    .into_iter()
    .collect();
}

/// Finds the first relative (`last N <unit>`) or absolute (`today`,
/// `yesterday`) time expression. Returns `None` when the sentence carries no
/// time filter; a missing time filter is not an error. A candidate whose
/// magnitude fails to parse as a positive integer is skipped rather than
/// aborting the scan.
pub fn extract_time_range(query: &str) -> Option<TimeRange> {
    for caps in RELATIVE_TIME.captures_iter(query) {
        let amount: u64 = match caps.get(1) {
            Some(digits) => match digits.as_str().parse() {
                Ok(n) if n > 0 => n,
                _ => continue,
            },
            None => 1,
        };
        let unit = caps[2].trim_end_matches('s');
        if let Some((_, code)) = TIME_UNITS.iter().find(|(word, _)| *word == unit) {
            trace!(amount, unit, "matched relative time expression");
            return Some(TimeRange::since(format!("now-{amount}{code}")));
        }
    }

    if TODAY.is_match(query) {
        return Some(TimeRange::since("now/d"));
    }
    if YESTERDAY.is_match(query) {
        return Some(TimeRange::window("now-1d/d", "now/d"));
    }

    None
}

/// Finds the first log-level word by position and canonicalizes it.
pub fn extract_log_level(query: &str) -> Option<LogLevel> {
    let surface = LOG_LEVEL.find(query)?.as_str();
    LEVEL_SYNONYMS
        .iter()
        .find(|(word, _)| *word == surface)
        .map(|(_, level)| *level)
}

/// Finds a service identifier. An explicit `-service`-suffixed token is an
/// unambiguous signal and always wins over the looser prepositional cue;
/// with two such tokens the first by position is taken.
pub fn extract_service_name(query: &str) -> Option<String> {
    if let Some(m) = SERVICE_TOKEN.find(query) {
        return Some(m.as_str().to_string());
    }

    for caps in SERVICE_CUE.captures_iter(query) {
        let name = &caps[1];
        if !STOP_WORDS.contains(name) {
            return Some(name.to_string());
        }
    }

    None
}

/// Finds an explicit result-count request (`top N`, `first N`, `limit N`,
/// `show N results`). Malformed or zero counts are skipped; no match means
/// the builder applies its default.
pub fn extract_size(query: &str) -> Option<u32> {
    for caps in SIZE_CUE.captures_iter(query) {
        let digits = caps.get(1).or_else(|| caps.get(2))?;
        match digits.as_str().parse::<u32>() {
            Ok(n) if n > 0 => return Some(n),
            _ => continue,
        }
    }
    None
}

/// Collects the significant tokens left over after the other extractors'
/// spans are scrubbed out. Each surviving token becomes its own match
/// condition; order is preserved.
pub fn extract_free_text(query: &str) -> Vec<String> {
    let mut remainder = query.to_string();
    for pattern in [
        &*SERVICE_CUE,
        &*SERVICE_TOKEN,
        &*RELATIVE_TIME,
        &*TODAY,
        &*YESTERDAY,
        &*SIZE_CUE,
        &*LOG_LEVEL,
    ] {
        remainder = pattern.replace_all(&remainder, " ").into_owned();
    }

    WORD.find_iter(&remainder)
        .map(|m| m.as_str())
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Runs every extractor against the input. Free-text extraction runs last;
/// the others are independent of each other.
pub fn extract_entities(query: &str) -> ExtractedEntities {
    ExtractedEntities {
        level: extract_log_level(query),
        service: extract_service_name(query),
        size: extract_size(query),
        time: extract_time_range(query),
        terms: extract_free_text(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_time_all_units() {
        // Minute and month must map to distinct codes.
        let cases = [
            ("last 5 minutes", "now-5m"),
            ("last 1 minute", "now-1m"),
            ("last 2 hours", "now-2h"),
            ("last 7 days", "now-7d"),
            ("last 3 weeks", "now-3w"),
            ("last 6 months", "now-6M"),
            ("last 1 year", "now-1y"),
        ];
        for (input, expected) in cases {
            let range = extract_time_range(input).unwrap();
            assert_eq!(range.gte, expected, "input: {input}");
            assert_eq!(range.lt, None);
        }
    }

    #[test]
    fn test_relative_time_implicit_magnitude() {
        let range = extract_time_range("warnings last hour").unwrap();
        assert_eq!(range.gte, "now-1h");
    }

    #[test]
    fn test_absolute_time_keywords() {
        assert_eq!(extract_time_range("errors today").unwrap(), TimeRange::since("now/d"));
        assert_eq!(
            extract_time_range("errors yesterday").unwrap(),
            TimeRange::window("now-1d/d", "now/d")
        );
    }

    #[test]
    fn test_first_time_expression_wins() {
        let range = extract_time_range("last 5 minutes or last 2 hours").unwrap();
        assert_eq!(range.gte, "now-5m");
    }

    #[test]
    fn test_zero_magnitude_is_skipped() {
        let range = extract_time_range("last 0 minutes and last 3 hours").unwrap();
        assert_eq!(range.gte, "now-3h");
        assert_eq!(extract_time_range("last 0 minutes"), None);
    }

    #[test]
    fn test_overflowing_magnitude_is_skipped() {
        assert_eq!(extract_time_range("last 99999999999999999999 minutes"), None);
    }

    #[test]
    fn test_no_time_expression() {
        assert_eq!(extract_time_range("errors in checkout-service"), None);
    }

    #[test]
    fn test_log_level_synonyms() {
        assert_eq!(extract_log_level("show errors"), Some(LogLevel::Error));
        assert_eq!(extract_log_level("show error logs"), Some(LogLevel::Error));
        assert_eq!(extract_log_level("any warnings"), Some(LogLevel::Warn));
        assert_eq!(extract_log_level("warning messages"), Some(LogLevel::Warn));
        assert_eq!(extract_log_level("warn entries"), Some(LogLevel::Warn));
        assert_eq!(extract_log_level("info output"), Some(LogLevel::Info));
        assert_eq!(extract_log_level("debug lines"), Some(LogLevel::Debug));
        assert_eq!(extract_log_level("trace output"), Some(LogLevel::Trace));
    }

    #[test]
    fn test_log_level_first_by_position() {
        assert_eq!(extract_log_level("warnings then errors"), Some(LogLevel::Warn));
    }

    #[test]
    fn test_log_level_word_boundaries_only() {
        // Substrings inside unrelated words must not match.
        assert_eq!(extract_log_level("terrorist tracer infos"), None);
    }

    #[test]
    fn test_service_token_verbatim() {
        assert_eq!(
            extract_service_name("errors for checkout-service"),
            Some("checkout-service".to_string())
        );
        assert_eq!(
            extract_service_name("api-gateway-service is down"),
            Some("api-gateway-service".to_string())
        );
    }

    #[test]
    fn test_service_token_beats_prepositional_cue() {
        assert_eq!(
            extract_service_name("in hydra service for checkout-service"),
            Some("checkout-service".to_string())
        );
    }

    #[test]
    fn test_two_service_tokens_first_wins() {
        // Pinned precedence: first `-service` token by position.
        assert_eq!(
            extract_service_name("errors for checkout-service and payment-service"),
            Some("checkout-service".to_string())
        );
    }

    #[test]
    fn test_prepositional_cue() {
        assert_eq!(
            extract_service_name("errors in hydra service"),
            Some("hydra".to_string())
        );
        assert_eq!(
            extract_service_name("warnings for api-gateway service"),
            Some("api-gateway".to_string())
        );
    }

    #[test]
    fn test_prepositional_cue_rejects_stop_words() {
        assert_eq!(extract_service_name("logged in the service"), None);
    }

    #[test]
    fn test_no_service() {
        assert_eq!(extract_service_name("errors in last 5 minutes"), None);
    }

    #[test]
    fn test_size_cues() {
        assert_eq!(extract_size("top 100 errors"), Some(100));
        assert_eq!(extract_size("first 20 hits"), Some(20));
        assert_eq!(extract_size("limit 5"), Some(5));
        assert_eq!(extract_size("show 25 results"), Some(25));
        assert_eq!(extract_size("show 1 result"), Some(1));
    }

    #[test]
    fn test_size_zero_is_no_match() {
        assert_eq!(extract_size("top 0 errors"), None);
    }

    #[test]
    fn test_no_size() {
        assert_eq!(extract_size("show errors"), None);
    }

    #[test]
    fn test_free_text_terms_are_separate_and_ordered() {
        let terms = extract_free_text("search for database connection errors last 30 minutes");
        assert_eq!(terms, vec!["database".to_string(), "connection".to_string()]);
    }

    #[test]
    fn test_free_text_drops_consumed_spans() {
        let terms =
            extract_free_text("show top 100 warnings from payment-service last hour");
        assert!(terms.is_empty(), "unexpected terms: {terms:?}");
    }

    #[test]
    fn test_free_text_drops_short_tokens() {
        let terms = extract_free_text("db io timeout");
        assert_eq!(terms, vec!["timeout".to_string()]);
    }

    #[test]
    fn test_extract_entities_combined() {
        let entities = extract_entities("errors in last 5 minutes for checkout-service");
        assert_eq!(entities.level, Some(LogLevel::Error));
        assert_eq!(entities.service, Some("checkout-service".to_string()));
        assert_eq!(entities.time, Some(TimeRange::since("now-5m")));
        assert_eq!(entities.size, None);
        assert!(entities.terms.is_empty());
    }
}
