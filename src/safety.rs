//! SQL Safety Gate
//!
//! Keyword-denylist classifier for dangerous SQL, independent of how the SQL
//! was produced. Two tiers with intentionally different denylists:
//!
//! - the advisory scan runs at generation time and only warns; INSERT and
//!   UPDATE may be legitimately requested by the user and are not flagged;
//! - the strict scan runs before validation/execution and does flag INSERT
//!   and UPDATE, because the execution layer is read-only.
//!
//! Both scans are pure functions of the SQL string.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keywords flagged at generation time (advisory)
const ADVISORY_DENYLIST: &[&str] = &[
    "DROP", "DELETE", "TRUNCATE", "ALTER", "CREATE", "GRANT", "REVOKE",
];

/// Keywords flagged before execution (blocking)
const EXECUTION_DENYLIST: &[&str] = &[
    "DROP", "DELETE", "TRUNCATE", "ALTER", "CREATE", "GRANT", "REVOKE", "INSERT", "UPDATE",
];

/// Verdict from a denylist scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_dangerous: bool,
    pub matched_keywords: BTreeSet<String>,
}

impl SafetyVerdict {
    fn clean() -> Self {
        Self {
            is_dangerous: false,
            matched_keywords: BTreeSet::new(),
        }
    }
}

/// Dangerous-SQL classifier
pub struct SafetyGate;

impl SafetyGate {
    /// Advisory scan used on generated SQL. Never blocks.
    pub fn scan(sql: &str) -> SafetyVerdict {
        Self::scan_against(sql, ADVISORY_DENYLIST)
    }

    /// Strict scan used by the validator and the execution layer.
    pub fn scan_strict(sql: &str) -> SafetyVerdict {
        Self::scan_against(sql, EXECUTION_DENYLIST)
    }

    fn scan_against(sql: &str, denylist: &[&str]) -> SafetyVerdict {
        let sql_upper = sql.to_uppercase();
        let matched: BTreeSet<String> = denylist
            .iter()
            .filter(|keyword| sql_upper.contains(*keyword))
            .map(|keyword| keyword.to_string())
            .collect();

        if matched.is_empty() {
            SafetyVerdict::clean()
        } else {
            SafetyVerdict {
                is_dangerous: true,
                matched_keywords: matched,
            }
        }
    }
}
