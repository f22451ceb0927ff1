//! Query Validator
//!
//! Static validation of a SQL string: structural lint plus the strict
//! SafetyGate scan. Nothing here executes SQL. The strict gate is the one
//! condition that fails validation; lint findings are warnings only and
//! never affect validity.

use serde::{Deserialize, Serialize};

use crate::safety::SafetyGate;
use crate::schema::SchemaContext;

/// Placeholder until a real cost model exists; `None` stays a valid unknown
const ESTIMATED_EXECUTION_TIME: f64 = 0.1;

/// Validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub estimated_execution_time: Option<f64>,
}

/// Static SQL validator
pub struct QueryValidator;

impl QueryValidator {
    /// Validate a SQL statement without executing it.
    ///
    /// The schema context is accepted for future identifier checks; the
    /// current lint rules do not consult it.
    pub fn validate(sql: &str, _schema_context: Option<&SchemaContext>) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();

        let verdict = SafetyGate::scan_strict(sql);
        if verdict.is_dangerous {
            let keywords: Vec<&str> = verdict
                .matched_keywords
                .iter()
                .map(String::as_str)
                .collect();
            errors.push(format!(
                "Query contains potentially dangerous operations: {}",
                keywords.join(", ")
            ));
        }

        if !sql.trim().ends_with(';') {
            warnings.push("Query should end with semicolon".to_string());
            suggestions.push("Add semicolon at the end".to_string());
        }

        if sql.to_uppercase().contains("SELECT *") {
            warnings.push("Using SELECT * may impact performance".to_string());
            suggestions.push("Specify explicit column names".to_string());
        }

        let upper = sql.trim().to_uppercase();
        if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
            warnings.push("Only SELECT queries are recommended for safety".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            suggestions,
            estimated_execution_time: Some(ESTIMATED_EXECUTION_TIME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_select_with_warnings() {
        let result = QueryValidator::validate("SELECT * FROM users", None);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("semicolon")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("SELECT *")));
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.estimated_execution_time, Some(0.1));
    }

    #[test]
    fn test_delete_is_invalid() {
        let result = QueryValidator::validate("DELETE FROM users", None);
        assert!(!result.is_valid);
        assert!(!result.errors.is_empty());
        assert!(result.errors[0].contains("DELETE"));
    }

    #[test]
    fn test_insert_blocked_by_strict_gate() {
        let result = QueryValidator::validate("INSERT INTO users VALUES (1);", None);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_clean_explicit_select() {
        let result = QueryValidator::validate("SELECT id, name FROM users;", None);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_cte_not_flagged_as_non_select() {
        let result = QueryValidator::validate("WITH top AS (SELECT id FROM users) SELECT id FROM top;", None);
        assert!(result.is_valid);
        assert!(!result
            .warnings
            .iter()
            .any(|w| w.contains("recommended for safety")));
    }

    #[test]
    fn test_non_select_statement_warned_not_errored() {
        let result = QueryValidator::validate("EXPLAIN SELECT id FROM users;", None);
        assert!(result.is_valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("recommended for safety")));
    }

    #[test]
    fn test_warnings_never_affect_validity() {
        let result = QueryValidator::validate("SELECT * FROM users", None);
        assert!(result.is_valid);
        assert!(!result.warnings.is_empty());
    }
}
