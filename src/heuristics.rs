//! Heuristic Fallback
//!
//! Deterministic, rule-based substitutes for every LLM-derived result:
//! intent classification, entity extraction, and template SQL generation.
//! No network calls. Used whenever the LLM path is unconfigured or fails.
//!
//! The keyword lists and their check order are the documented fallback
//! contract, not incidental detail: a question containing both "count" and
//! "show" resolves to SELECT because retrieval verbs are checked before
//! statistical ones.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::intent::{EntityKind, ExtractedEntity, IntentResult, Origin, QueryIntent};
use crate::safety::SafetyGate;
use crate::translator::SqlGenerationResult;

const RETRIEVAL_VERBS: &[&str] = &["show", "list", "get", "find", "select"];
const CREATION_VERBS: &[&str] = &["add", "insert", "create"];
const MUTATION_VERBS: &[&str] = &["update", "change", "modify"];
const REMOVAL_VERBS: &[&str] = &["delete", "remove"];
const STATISTICAL_VERBS: &[&str] = &["count", "sum", "average", "total"];

const FALLBACK_INTENT_CONFIDENCE: f64 = 0.7;
const FALLBACK_SQL_CONFIDENCE: f64 = 0.6;
const NUMERIC_CONFIDENCE: f64 = 0.8;
const TEXT_CONFIDENCE: f64 = 0.9;

static INTEGER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").unwrap());
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).unwrap());
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']*)'").unwrap());

/// Ordered first-match keyword scan over the question.
///
/// Check order: retrieval, creation, mutation, removal, statistical,
/// default SELECT.
pub fn classify_intent(question: &str) -> IntentResult {
    let question_lower = question.to_lowercase();

    let intent = if contains_any(&question_lower, RETRIEVAL_VERBS) {
        QueryIntent::Select
    } else if contains_any(&question_lower, CREATION_VERBS) {
        QueryIntent::Insert
    } else if contains_any(&question_lower, MUTATION_VERBS) {
        QueryIntent::Update
    } else if contains_any(&question_lower, REMOVAL_VERBS) {
        QueryIntent::Delete
    } else if contains_any(&question_lower, STATISTICAL_VERBS) {
        QueryIntent::Aggregate
    } else {
        QueryIntent::Select
    };

    IntentResult {
        intent,
        confidence: FALLBACK_INTENT_CONFIDENCE,
        entities: Vec::new(),
        origin: Origin::Heuristic,
    }
}

/// Pattern-based entity extraction: standalone integer tokens and quoted
/// substrings. No deduplication: repeated tokens each yield one entity at
/// their own offset.
pub fn extract_entities(question: &str) -> Vec<ExtractedEntity> {
    let mut entities = Vec::new();

    for token in INTEGER_TOKEN.find_iter(question) {
        // Tokens that overflow i64 are not standalone integers for our purposes
        let Ok(number) = token.as_str().parse::<i64>() else {
            continue;
        };
        entities.push(ExtractedEntity {
            kind: EntityKind::NumericValue,
            value: serde_json::json!(number),
            confidence: NUMERIC_CONFIDENCE,
            source_position: Some(token.start()),
        });
    }

    for pattern in [&DOUBLE_QUOTED, &SINGLE_QUOTED] {
        for captures in pattern.captures_iter(question) {
            if let Some(inner) = captures.get(1) {
                entities.push(ExtractedEntity {
                    kind: EntityKind::TextValue,
                    value: serde_json::json!(inner.as_str()),
                    confidence: TEXT_CONFIDENCE,
                    source_position: Some(inner.start()),
                });
            }
        }
    }

    entities
}

/// Template SQL generation. A deliberately low-fidelity safety net, not a
/// planner; it never synthesizes a destructive statement.
pub fn generate_sql(question: &str) -> SqlGenerationResult {
    let question_lower = question.to_lowercase();

    let (sql_query, explanation) = if question_lower.contains("people")
        || question_lower.contains("users")
    {
        if question_lower.contains("first")
            || question_lower.contains("10")
            || question_lower.contains("limit")
        {
            (
                "SELECT * FROM users LIMIT 10;",
                "Retrieves the first 10 records from the users table",
            )
        } else {
            (
                "SELECT * FROM users;",
                "Retrieves all records from the users table",
            )
        }
    } else if question_lower.contains("count") {
        (
            "SELECT COUNT(*) FROM users;",
            "Counts the total number of records in the users table",
        )
    } else if question_lower.contains("products") {
        (
            "SELECT * FROM products LIMIT 10;",
            "Retrieves the first 10 products from the products table",
        )
    } else if question_lower.contains("orders") {
        (
            "SELECT * FROM orders LIMIT 10;",
            "Retrieves the first 10 orders from the orders table",
        )
    } else {
        (
            "SELECT * FROM users LIMIT 10;",
            "Default query - please provide more specific requirements or check LLM configuration",
        )
    };

    SqlGenerationResult {
        sql_query: sql_query.to_string(),
        explanation: explanation.to_string(),
        confidence: FALLBACK_SQL_CONFIDENCE,
        suggested_modifications: standard_suggestions(),
        origin: Origin::Heuristic,
        safety_verdict: SafetyGate::scan(sql_query),
    }
}

fn standard_suggestions() -> Vec<String> {
    vec![
        "Specify exact table and column names".to_string(),
        "Add WHERE conditions for filtering".to_string(),
        "Consider JOIN operations if multiple tables are needed".to_string(),
        "Check LLM API key configuration for better results".to_string(),
    ]
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_keyword_classes() {
        assert_eq!(classify_intent("show me everything").intent, QueryIntent::Select);
        assert_eq!(classify_intent("insert a new row").intent, QueryIntent::Insert);
        assert_eq!(classify_intent("modify the record").intent, QueryIntent::Update);
        assert_eq!(classify_intent("remove old rows").intent, QueryIntent::Delete);
        assert_eq!(
            classify_intent("total revenue this year").intent,
            QueryIntent::Aggregate
        );
    }

    #[test]
    fn test_intent_default_is_select() {
        let result = classify_intent("what about the weather");
        assert_eq!(result.intent, QueryIntent::Select);
        assert_eq!(result.confidence, 0.7);
        assert!(result.entities.is_empty());
        assert_eq!(result.origin, Origin::Heuristic);
    }

    #[test]
    fn test_intent_check_order_retrieval_before_statistical() {
        // "count" and "show" both present: retrieval wins by check order
        let result = classify_intent("show me the count of users");
        assert_eq!(result.intent, QueryIntent::Select);
    }

    #[test]
    fn test_intent_check_order_creation_before_mutation() {
        let result = classify_intent("create an updated copy");
        assert_eq!(result.intent, QueryIntent::Insert);
    }

    #[test]
    fn test_entity_extraction_offsets() {
        let entities = extract_entities("find user 42 named 'Bob'");
        assert_eq!(entities.len(), 2);

        assert_eq!(entities[0].kind, EntityKind::NumericValue);
        assert_eq!(entities[0].value, serde_json::json!(42));
        assert_eq!(entities[0].confidence, 0.8);
        assert_eq!(entities[0].source_position, Some(10));

        assert_eq!(entities[1].kind, EntityKind::TextValue);
        assert_eq!(entities[1].value, serde_json::json!("Bob"));
        assert_eq!(entities[1].confidence, 0.9);
        assert_eq!(entities[1].source_position, Some(20));
    }

    #[test]
    fn test_entity_extraction_no_dedup() {
        let entities = extract_entities("compare 7 with 7");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].source_position, Some(8));
        assert_eq!(entities[1].source_position, Some(15));
    }

    #[test]
    fn test_entity_extraction_double_then_single_quotes() {
        let entities = extract_entities(r#"match "alpha" or 'beta'"#);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].value, serde_json::json!("alpha"));
        assert_eq!(entities[1].value, serde_json::json!("beta"));
    }

    #[test]
    fn test_entity_extraction_empty_question() {
        assert!(extract_entities("").is_empty());
    }

    #[test]
    fn test_sql_template_users() {
        let result = generate_sql("Show me all users");
        assert_eq!(result.sql_query, "SELECT * FROM users;");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.origin, Origin::Heuristic);
        assert!(!result.safety_verdict.is_dangerous);
    }

    #[test]
    fn test_sql_template_users_with_limit() {
        assert_eq!(
            generate_sql("first 10 people").sql_query,
            "SELECT * FROM users LIMIT 10;"
        );
        assert_eq!(
            generate_sql("limit the users please").sql_query,
            "SELECT * FROM users LIMIT 10;"
        );
    }

    #[test]
    fn test_sql_template_count() {
        assert_eq!(
            generate_sql("count the rows").sql_query,
            "SELECT COUNT(*) FROM users;"
        );
    }

    #[test]
    fn test_sql_template_products_orders_default() {
        assert_eq!(
            generate_sql("list products").sql_query,
            "SELECT * FROM products LIMIT 10;"
        );
        assert_eq!(
            generate_sql("recent orders").sql_query,
            "SELECT * FROM orders LIMIT 10;"
        );
        assert_eq!(
            generate_sql("something opaque").sql_query,
            "SELECT * FROM users LIMIT 10;"
        );
    }

    #[test]
    fn test_sql_templates_never_dangerous() {
        for question in [
            "drop the users table",
            "delete everything",
            "truncate logs",
            "insert new people",
        ] {
            let result = generate_sql(question);
            assert!(
                !SafetyGate::scan_strict(&result.sql_query).is_dangerous,
                "template for {:?} must be read-only, got {:?}",
                question,
                result.sql_query
            );
        }
    }
}
