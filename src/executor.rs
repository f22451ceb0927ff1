//! Query Executor (stub)
//!
//! A read-only execution layer stub returning canned rows, plus the query
//! history repository. Real database execution is an external collaborator;
//! what matters here is the contract: SQL the strict SafetyGate flags never
//! executes, and every attempt is recorded through an injected history
//! store rather than an ad-hoc process-local map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use uuid::Uuid;

use crate::safety::SafetyGate;

/// Result of an execution attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub rows: Vec<serde_json::Value>,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub execution_time: f64,
    pub query_id: Uuid,
    pub error: Option<String>,
}

/// One recorded execution attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query_id: Uuid,
    pub sql_query: String,
    pub user_id: String,
    pub executed_at: DateTime<Utc>,
    pub execution_time: f64,
    pub row_count: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Append-only store of execution attempts, injected into the executor so a
/// real persistence backend can replace it without touching pipeline logic
pub trait QueryHistoryStore: Send + Sync {
    fn append(&self, record: QueryRecord);

    /// Records for one user, newest first
    fn for_user(&self, user_id: &str, limit: usize, offset: usize) -> Vec<QueryRecord>;
}

/// In-memory history store
#[derive(Default)]
pub struct InMemoryQueryHistory {
    records: Mutex<Vec<QueryRecord>>,
}

impl InMemoryQueryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryHistoryStore for InMemoryQueryHistory {
    fn append(&self, record: QueryRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    fn for_user(&self, user_id: &str, limit: usize, offset: usize) -> Vec<QueryRecord> {
        let Ok(records) = self.records.lock() else {
            return Vec::new();
        };
        let mut matching: Vec<QueryRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        matching.into_iter().skip(offset).take(limit).collect()
    }
}

/// Read-only execution stub
pub struct QueryExecutor {
    history: Arc<dyn QueryHistoryStore>,
}

impl QueryExecutor {
    pub fn new(history: Arc<dyn QueryHistoryStore>) -> Self {
        Self { history }
    }

    /// Execute a SQL statement against the canned dataset.
    ///
    /// Statements flagged by the strict gate are refused with an error
    /// outcome. `dry_run` validates the gate and returns an empty success
    /// without touching the dataset or the history store.
    pub fn execute(&self, sql: &str, user_id: &str, dry_run: bool) -> ExecutionOutcome {
        let query_id = Uuid::new_v4();
        let started = Instant::now();

        let verdict = SafetyGate::scan_strict(sql);
        if verdict.is_dangerous {
            let keywords: Vec<&str> = verdict
                .matched_keywords
                .iter()
                .map(String::as_str)
                .collect();
            let message = format!(
                "Potentially dangerous query refused: {}",
                keywords.join(", ")
            );
            tracing::warn!(%query_id, %message, "execution blocked");

            let execution_time = started.elapsed().as_secs_f64();
            self.history.append(QueryRecord {
                query_id,
                sql_query: sql.to_string(),
                user_id: user_id.to_string(),
                executed_at: Utc::now(),
                execution_time,
                row_count: 0,
                success: false,
                error_message: Some(message.clone()),
            });

            return ExecutionOutcome {
                success: false,
                rows: Vec::new(),
                columns: Vec::new(),
                row_count: 0,
                execution_time,
                query_id,
                error: Some(message),
            };
        }

        if dry_run {
            return ExecutionOutcome {
                success: true,
                rows: Vec::new(),
                columns: Vec::new(),
                row_count: 0,
                execution_time: 0.0,
                query_id,
                error: None,
            };
        }

        let (rows, columns) = canned_rows(sql);
        let execution_time = started.elapsed().as_secs_f64();

        self.history.append(QueryRecord {
            query_id,
            sql_query: sql.to_string(),
            user_id: user_id.to_string(),
            executed_at: Utc::now(),
            execution_time,
            row_count: rows.len(),
            success: true,
            error_message: None,
        });

        ExecutionOutcome {
            success: true,
            row_count: rows.len(),
            rows,
            columns,
            execution_time,
            query_id,
            error: None,
        }
    }

    /// Execution history for one user, newest first
    pub fn history(&self, user_id: &str, limit: usize, offset: usize) -> Vec<QueryRecord> {
        self.history.for_user(user_id, limit, offset)
    }
}

fn canned_rows(sql: &str) -> (Vec<serde_json::Value>, Vec<String>) {
    let sql_lower = sql.to_lowercase();

    if sql_lower.contains("users") {
        (
            vec![
                json!({"id": 1, "name": "John Doe", "email": "john@example.com", "created_at": "2024-01-15"}),
                json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com", "created_at": "2024-01-20"}),
                json!({"id": 3, "name": "Bob Johnson", "email": "bob@example.com", "created_at": "2024-02-01"}),
            ],
            vec!["id", "name", "email", "created_at"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    } else if sql_lower.contains("orders") {
        (
            vec![
                json!({"order_id": 101, "user_id": 1, "amount": 99.99, "status": "completed"}),
                json!({"order_id": 102, "user_id": 2, "amount": 149.50, "status": "pending"}),
                json!({"order_id": 103, "user_id": 1, "amount": 75.25, "status": "completed"}),
            ],
            vec!["order_id", "user_id", "amount", "status"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    } else if sql_lower.contains("products") {
        (
            vec![
                json!({"product_id": 1, "name": "Laptop", "price": 999.99, "category": "Electronics"}),
                json!({"product_id": 2, "name": "Book", "price": 19.99, "category": "Education"}),
                json!({"product_id": 3, "name": "Headphones", "price": 79.99, "category": "Electronics"}),
            ],
            vec!["product_id", "name", "price", "category"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    } else {
        (
            vec![
                json!({"column1": "value1", "column2": "value2"}),
                json!({"column1": "value3", "column2": "value4"}),
            ],
            vec!["column1", "column2"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}
