//! Pipeline Integration Tests
//!
//! End-to-end behavior from natural-language question to SQL, across the
//! LLM path, the degrade path, and the validation/execution gate.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::executor::{InMemoryQueryHistory, QueryExecutor};
    use crate::intent::{EntityKind, Origin, QueryIntent};
    use crate::llm_client::{LlmClient, LlmError};
    use crate::schema::TranslationRequest;
    use crate::translator::Translator;
    use crate::validator::QueryValidator;

    /// Mock LLM client for testing: canned response or canned failure
    struct MockLlmClient {
        response: Option<String>,
    }

    impl MockLlmClient {
        fn answering(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Some(response.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { response: None })
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, LlmError> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(LlmError::Timeout(Duration::from_secs(30))),
            }
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }

        fn provider_name(&self) -> &str {
            "Mock"
        }
    }

    // ── Unconfigured provider: deterministic heuristic results ────

    #[tokio::test]
    async fn unconfigured_intent_is_heuristic() {
        let translator = Translator::new(None);
        assert!(!translator.is_configured());

        let result = translator.parse_intent("count all the orders").await;
        assert_eq!(result.intent, QueryIntent::Aggregate);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.origin, Origin::Heuristic);
    }

    #[tokio::test]
    async fn unconfigured_entities_are_heuristic() {
        let translator = Translator::new(None);
        let entities = translator
            .extract_entities("find user 42 named 'Bob'", None)
            .await;

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].kind, EntityKind::NumericValue);
        assert_eq!(entities[0].value, serde_json::json!(42));
        assert_eq!(entities[0].source_position, Some(10));
        assert_eq!(entities[1].kind, EntityKind::TextValue);
        assert_eq!(entities[1].value, serde_json::json!("Bob"));
        assert_eq!(entities[1].source_position, Some(20));
    }

    #[tokio::test]
    async fn unconfigured_sql_generation_is_heuristic() {
        let translator = Translator::new(None);

        let result = translator
            .generate_sql(&TranslationRequest::new("Show me all users"))
            .await;
        assert_eq!(result.sql_query, "SELECT * FROM users;");
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.origin, Origin::Heuristic);

        let result = translator
            .generate_sql(&TranslationRequest::new("first 10 people"))
            .await;
        assert_eq!(result.sql_query, "SELECT * FROM users LIMIT 10;");
    }

    // ── LLM path ──────────────────────────────────────────────────

    #[tokio::test]
    async fn llm_intent_carries_llm_origin() {
        let client = MockLlmClient::answering(
            r#"{"intent": "JOIN", "confidence": 0.95, "entities": [
                {"type": "TABLE_NAME", "value": "users", "confidence": 0.9, "position": 5}
            ]}"#,
        );
        let translator = Translator::with_client(client);

        let result = translator
            .parse_intent("join users with their orders")
            .await;
        assert_eq!(result.intent, QueryIntent::Join);
        assert_eq!(result.origin, Origin::Llm);
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].kind, EntityKind::TableName);
    }

    #[tokio::test]
    async fn llm_sql_passes_advisory_gate() {
        let client = MockLlmClient::answering(
            r#"{"sql_query": "SELECT name FROM users LIMIT 5;", "explanation": "top names",
                "confidence": 0.9, "suggested_modifications": []}"#,
        );
        let translator = Translator::with_client(client);

        let result = translator
            .generate_sql(&TranslationRequest::new("five user names"))
            .await;
        assert_eq!(result.origin, Origin::Llm);
        assert!(!result.safety_verdict.is_dangerous);
    }

    #[tokio::test]
    async fn dangerous_llm_sql_is_returned_with_warning_verdict() {
        // Generation is advisory: the dangerous statement comes back
        // annotated, and only validation/execution blocks it
        let client = MockLlmClient::answering(
            r#"{"sql_query": "DROP TABLE users;", "explanation": "", "confidence": 0.4}"#,
        );
        let translator = Translator::with_client(client);

        let result = translator
            .generate_sql(&TranslationRequest::new("get rid of the users table"))
            .await;
        assert_eq!(result.origin, Origin::Llm);
        assert!(result.safety_verdict.is_dangerous);

        let validation = QueryValidator::validate(&result.sql_query, None);
        assert!(!validation.is_valid);
    }

    // ── Degrade path ──────────────────────────────────────────────

    #[tokio::test]
    async fn provider_failure_degrades_to_heuristic() {
        let translator = Translator::with_client(MockLlmClient::failing());

        let result = translator.parse_intent("show all users").await;
        assert_eq!(result.origin, Origin::Heuristic);
        assert_eq!(result.intent, QueryIntent::Select);

        let sql = translator
            .generate_sql(&TranslationRequest::new("list products"))
            .await;
        assert_eq!(sql.origin, Origin::Heuristic);
        assert_eq!(sql.sql_query, "SELECT * FROM products LIMIT 10;");
    }

    #[tokio::test]
    async fn malformed_payload_degrades_to_heuristic() {
        let client = MockLlmClient::answering("Sure! Here is your SQL: SELECT * FROM users");
        let translator = Translator::with_client(client);

        let result = translator
            .generate_sql(&TranslationRequest::new("count everything"))
            .await;
        assert_eq!(result.origin, Origin::Heuristic);
        assert_eq!(result.sql_query, "SELECT COUNT(*) FROM users;");
    }

    #[tokio::test]
    async fn unknown_intent_string_degrades_to_heuristic() {
        let client =
            MockLlmClient::answering(r#"{"intent": "MERGE", "confidence": 0.8, "entities": []}"#);
        let translator = Translator::with_client(client);

        let result = translator.parse_intent("merge the tables").await;
        assert_eq!(result.origin, Origin::Heuristic);
    }

    // ── Full pipeline: generate → validate → execute ──────────────

    #[tokio::test]
    async fn heuristic_sql_flows_through_validation_and_execution() {
        let translator = Translator::new(None);
        let generated = translator
            .generate_sql(&TranslationRequest::new("Show me all users"))
            .await;

        let validation = QueryValidator::validate(&generated.sql_query, None);
        assert!(validation.is_valid);

        let executor = QueryExecutor::new(Arc::new(InMemoryQueryHistory::new()));
        let outcome = executor.execute(&generated.sql_query, "alice", false);
        assert!(outcome.success);
        assert_eq!(outcome.row_count, 3);
    }

    #[tokio::test]
    async fn dangerous_llm_sql_is_stopped_before_execution() {
        let client = MockLlmClient::answering(
            r#"{"sql_query": "TRUNCATE TABLE users;", "explanation": "", "confidence": 0.3}"#,
        );
        let translator = Translator::with_client(client);
        let generated = translator
            .generate_sql(&TranslationRequest::new("wipe the users table"))
            .await;
        assert!(generated.safety_verdict.is_dangerous);

        let executor = QueryExecutor::new(Arc::new(InMemoryQueryHistory::new()));
        let outcome = executor.execute(&generated.sql_query, "alice", false);
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
