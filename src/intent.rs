//! Intent and entity structures
//!
//! Value types produced by intent parsing and entity extraction. All of them
//! are call-scoped: each pipeline stage builds a fresh result and carries the
//! `Origin` tag through so callers can audit whether an answer came from the
//! LLM or the deterministic fallback.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The coarse operation category a natural-language question maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryIntent {
    /// Retrieve data
    Select,
    /// Add new data
    Insert,
    /// Modify existing data
    Update,
    /// Remove data
    Delete,
    /// Summary statistics (count, sum, avg)
    Aggregate,
    /// Combine data from multiple tables
    Join,
    /// Filter rows on conditions
    Filter,
    /// Order results
    Sort,
    /// Understand database structure
    Schema,
}

impl QueryIntent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Aggregate => "AGGREGATE",
            Self::Join => "JOIN",
            Self::Filter => "FILTER",
            Self::Sort => "SORT",
            Self::Schema => "SCHEMA",
        }
    }
}

impl std::fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error type for parsing QueryIntent
#[derive(Debug)]
pub struct ParseIntentError(String);

impl std::fmt::Display for ParseIntentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown intent '{}'", self.0)
    }
}

impl std::error::Error for ParseIntentError {}

impl FromStr for QueryIntent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SELECT" => Ok(Self::Select),
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "AGGREGATE" => Ok(Self::Aggregate),
            "JOIN" => Ok(Self::Join),
            "FILTER" => Ok(Self::Filter),
            "SORT" => Ok(Self::Sort),
            "SCHEMA" => Ok(Self::Schema),
            other => Err(ParseIntentError(other.to_string())),
        }
    }
}

/// Provenance tag on every pipeline result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Origin {
    /// Answer came from the LLM path
    Llm,
    /// Answer came from the deterministic fallback
    Heuristic,
}

/// Typed span of the input question relevant to query construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    TableName,
    ColumnName,
    Value,
    Operator,
    AggregateFunction,
    DateRange,
    NumericValue,
    TextValue,
}

/// A single extracted entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub value: serde_json::Value,
    pub confidence: f64,
    /// First character offset of the matched token in the original
    /// question; `None` when the LLM did not report one
    pub source_position: Option<usize>,
}

/// Result of intent parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: QueryIntent,
    pub confidence: f64,
    pub entities: Vec<ExtractedEntity>,
    pub origin: Origin,
}

impl IntentResult {
    /// Whether this result came from the deterministic fallback
    pub fn is_degraded(&self) -> bool {
        self.origin == Origin::Heuristic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_from_str() {
        assert_eq!("SELECT".parse::<QueryIntent>().unwrap(), QueryIntent::Select);
        assert_eq!(
            "aggregate".parse::<QueryIntent>().unwrap(),
            QueryIntent::Aggregate
        );
        assert_eq!(
            " Schema ".parse::<QueryIntent>().unwrap(),
            QueryIntent::Schema
        );
        assert!("UPSERT".parse::<QueryIntent>().is_err());
    }

    #[test]
    fn test_intent_serde_names() {
        assert_eq!(
            serde_json::to_string(&QueryIntent::Aggregate).unwrap(),
            "\"AGGREGATE\""
        );
        let parsed: QueryIntent = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(parsed, QueryIntent::Delete);
    }

    #[test]
    fn test_origin_serde_names() {
        assert_eq!(serde_json::to_string(&Origin::Llm).unwrap(), "\"LLM\"");
        assert_eq!(
            serde_json::to_string(&Origin::Heuristic).unwrap(),
            "\"HEURISTIC\""
        );
    }

    #[test]
    fn test_entity_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&EntityKind::NumericValue).unwrap(),
            "\"NUMERIC_VALUE\""
        );
        let parsed: EntityKind = serde_json::from_str("\"TABLE_NAME\"").unwrap();
        assert_eq!(parsed, EntityKind::TableName);
    }

    #[test]
    fn test_is_degraded() {
        let result = IntentResult {
            intent: QueryIntent::Select,
            confidence: 0.7,
            entities: vec![],
            origin: Origin::Heuristic,
        };
        assert!(result.is_degraded());
    }
}
