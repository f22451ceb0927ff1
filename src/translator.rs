//! Translator
//!
//! Orchestrates the LLM client and the heuristic fallback across three
//! independent operations (intent parsing, entity extraction, SQL
//! generation) with a uniform degrade-on-failure policy. Every LLM-boundary
//! failure is converted into a heuristic result; callers always receive a
//! best-effort answer, never an error. Generated SQL is passed through the
//! advisory SafetyGate before it is returned.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client_factory::create_llm_client;
use crate::config::LlmConfig;
use crate::heuristics;
use crate::intent::{EntityKind, ExtractedEntity, IntentResult, Origin, QueryIntent};
use crate::llm_client::{LlmClient, LlmError, LlmOutcome};
use crate::safety::{SafetyGate, SafetyVerdict};
use crate::schema::{SchemaContext, TranslationRequest};

/// History turns embedded in the generation prompt
const HISTORY_WINDOW: usize = 3;

/// Result of SQL generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlGenerationResult {
    pub sql_query: String,
    pub explanation: String,
    pub confidence: f64,
    pub suggested_modifications: Vec<String>,
    pub origin: Origin,
    pub safety_verdict: SafetyVerdict,
}

/// Natural-language → SQL translator
///
/// Holds only immutable configuration and an optional shared client;
/// concurrent calls share no mutable state. `client = None` means the
/// provider is unconfigured, decided once at construction, and every
/// operation goes straight to the heuristic path.
pub struct Translator {
    client: Option<Arc<dyn LlmClient>>,
}

impl Translator {
    /// Create a translator with an already-constructed client, or none
    pub fn new(client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { client }
    }

    /// Create from environment variables (AGENT_BACKEND, provider API keys,
    /// LLM_* tuning)
    pub fn from_env() -> Result<Self> {
        let config = LlmConfig::from_env();
        Ok(Self::new(create_llm_client(&config)?))
    }

    /// Create with a specific LLM client
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Whether the LLM path is available at all
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Parse user intent from a natural language question
    pub async fn parse_intent(&self, question: &str) -> IntentResult {
        match self.try_llm_intent(question).await {
            LlmOutcome::Answered(result) => result,
            LlmOutcome::Degraded(reason) => {
                tracing::warn!(%reason, "intent parsing degraded to heuristic path");
                heuristics::classify_intent(question)
            }
        }
    }

    /// Extract entities from a natural language question
    pub async fn extract_entities(
        &self,
        question: &str,
        schema_context: Option<&SchemaContext>,
    ) -> Vec<ExtractedEntity> {
        match self.try_llm_entities(question, schema_context).await {
            LlmOutcome::Answered(entities) => entities,
            LlmOutcome::Degraded(reason) => {
                tracing::warn!(%reason, "entity extraction degraded to heuristic path");
                heuristics::extract_entities(question)
            }
        }
    }

    /// Generate a SQL statement for the request
    pub async fn generate_sql(&self, request: &TranslationRequest) -> SqlGenerationResult {
        match self.try_llm_sql(request).await {
            LlmOutcome::Answered(result) => result,
            LlmOutcome::Degraded(reason) => {
                tracing::warn!(%reason, "SQL generation degraded to heuristic path");
                heuristics::generate_sql(&request.question)
            }
        }
    }

    async fn try_llm_intent(&self, question: &str) -> LlmOutcome<IntentResult> {
        let Some(client) = &self.client else {
            return LlmOutcome::Degraded(LlmError::Unconfigured);
        };

        let user_prompt = format!("Question: {}", question);
        match client.complete(INTENT_SYSTEM_PROMPT, &user_prompt).await {
            Ok(raw) => match decode_intent(&raw) {
                Ok(result) => LlmOutcome::Answered(result),
                Err(e) => LlmOutcome::Degraded(e),
            },
            Err(e) => LlmOutcome::Degraded(e),
        }
    }

    async fn try_llm_entities(
        &self,
        question: &str,
        schema_context: Option<&SchemaContext>,
    ) -> LlmOutcome<Vec<ExtractedEntity>> {
        let Some(client) = &self.client else {
            return LlmOutcome::Degraded(LlmError::Unconfigured);
        };

        let system_prompt = build_entity_system_prompt(schema_context);
        let user_prompt = format!("Question: {}", question);
        match client.complete(&system_prompt, &user_prompt).await {
            Ok(raw) => match decode_entities(&raw) {
                Ok(entities) => LlmOutcome::Answered(entities),
                Err(e) => LlmOutcome::Degraded(e),
            },
            Err(e) => LlmOutcome::Degraded(e),
        }
    }

    async fn try_llm_sql(&self, request: &TranslationRequest) -> LlmOutcome<SqlGenerationResult> {
        let Some(client) = &self.client else {
            return LlmOutcome::Degraded(LlmError::Unconfigured);
        };

        let system_prompt = build_generation_system_prompt(request);
        let user_prompt = format!("Convert this to SQL: {}", request.question);
        match client.complete(&system_prompt, &user_prompt).await {
            Ok(raw) => match decode_generation(&raw) {
                Ok(result) => LlmOutcome::Answered(result),
                Err(e) => LlmOutcome::Degraded(e),
            },
            Err(e) => LlmOutcome::Degraded(e),
        }
    }
}

const INTENT_SYSTEM_PROMPT: &str = r#"You are an expert at understanding user intents for SQL database queries.
Analyze the user's natural language question and determine their intent.

Possible intents:
- SELECT: retrieve data
- INSERT: add new data
- UPDATE: modify existing data
- DELETE: remove data
- AGGREGATE: summary statistics (count, sum, avg, etc.)
- JOIN: combine data from multiple tables
- FILTER: filter data based on conditions
- SORT: order results
- SCHEMA: understand database structure

Respond with a JSON object:
{
  "intent": "<one of the intents above>",
  "confidence": <0.0-1.0>,
  "entities": [
    {"type": "<entity type>", "value": <value>, "confidence": <0.0-1.0>, "position": <character offset or null>}
  ]
}"#;

fn build_entity_system_prompt(schema_context: Option<&SchemaContext>) -> String {
    let schema_info = match schema_context {
        Some(schema) => format!(
            "Available tables and columns:\n{}\n\n",
            pretty_json(schema)
        ),
        None => String::new(),
    };

    format!(
        r#"You are an expert at extracting entities from natural language database questions.
Extract entities that would be useful for SQL generation.

{schema_info}Entity types to look for:
- TABLE_NAME: table names mentioned or implied
- COLUMN_NAME: column names mentioned or implied
- VALUE: specific values to filter by
- OPERATOR: comparison operators (=, >, <, LIKE, etc.)
- AGGREGATE_FUNCTION: functions like COUNT, SUM, AVG
- DATE_RANGE: date or time ranges
- NUMERIC_VALUE: numbers mentioned
- TEXT_VALUE: text strings to search for

Respond with a JSON array of entities:
[{{"type": "<entity type>", "value": <value>, "confidence": <0.0-1.0>, "position": <character offset or null>}}]"#
    )
}

fn build_generation_system_prompt(request: &TranslationRequest) -> String {
    // Each grounding section is omitted entirely when absent
    let mut sections = String::new();

    if let Some(schema) = &request.schema_context {
        sections.push_str(&format!("## Database Schema\n{}\n\n", pretty_json(schema)));
    }

    if !request.conversation_history.is_empty() {
        let history = &request.conversation_history;
        let tail = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        sections.push_str(&format!(
            "## Previous Conversation (last {} exchanges)\n{}\n\n",
            tail.len(),
            pretty_json(&tail)
        ));
    }

    if let Some(preferences) = &request.user_preferences {
        sections.push_str(&format!(
            "## User Preferences\n{}\n\n",
            pretty_json(preferences)
        ));
    }

    format!(
        r#"You are an expert SQL developer. Convert natural language questions to SQL.

{sections}## Guidelines
1. Generate safe, parameterized SQL queries
2. Use proper SQL syntax and meaningful aliases
3. Include appropriate JOINs when querying multiple tables
4. Add LIMIT clauses for large result sets
5. Never generate destructive statements (DROP, DELETE, TRUNCATE, ALTER)
6. Validate table and column names against the supplied schema

Respond with a JSON object:
{{
  "sql_query": "<the generated SQL>",
  "explanation": "<what the query does>",
  "confidence": <0.0-1.0>,
  "suggested_modifications": ["<improvement>", ...]
}}"#
    )
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Deserialize)]
struct EntityPayload {
    #[serde(rename = "type")]
    kind: EntityKind,
    value: serde_json::Value,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    position: Option<usize>,
}

impl From<EntityPayload> for ExtractedEntity {
    fn from(payload: EntityPayload) -> Self {
        ExtractedEntity {
            kind: payload.kind,
            value: payload.value,
            confidence: payload.confidence.clamp(0.0, 1.0),
            source_position: payload.position,
        }
    }
}

#[derive(Deserialize)]
struct IntentPayload {
    intent: String,
    confidence: f64,
    #[serde(default)]
    entities: Vec<EntityPayload>,
}

#[derive(Deserialize)]
struct GenerationPayload {
    sql_query: String,
    #[serde(default)]
    explanation: String,
    confidence: f64,
    #[serde(default)]
    suggested_modifications: Vec<String>,
}

fn decode_intent(raw: &str) -> Result<IntentResult, LlmError> {
    let json = extract_json(raw);
    let payload: IntentPayload =
        serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    let intent: QueryIntent = payload
        .intent
        .parse()
        .map_err(|e: crate::intent::ParseIntentError| LlmError::Parse(e.to_string()))?;

    Ok(IntentResult {
        intent,
        confidence: payload.confidence.clamp(0.0, 1.0),
        entities: payload.entities.into_iter().map(Into::into).collect(),
        origin: Origin::Llm,
    })
}

fn decode_entities(raw: &str) -> Result<Vec<ExtractedEntity>, LlmError> {
    let json = extract_json(raw);
    let payload: Vec<EntityPayload> =
        serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;
    Ok(payload.into_iter().map(Into::into).collect())
}

fn decode_generation(raw: &str) -> Result<SqlGenerationResult, LlmError> {
    let json = extract_json(raw);
    let payload: GenerationPayload =
        serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    let sql_query = payload.sql_query.trim().to_string();
    if sql_query.is_empty() {
        return Err(LlmError::Parse("empty sql_query in payload".to_string()));
    }

    // Advisory scan: annotate and warn, never block generation output
    let safety_verdict = SafetyGate::scan(&sql_query);
    if safety_verdict.is_dangerous {
        tracing::warn!(
            keywords = ?safety_verdict.matched_keywords,
            "potentially dangerous SQL in LLM output"
        );
    }

    Ok(SqlGenerationResult {
        sql_query,
        explanation: payload.explanation,
        confidence: payload.confidence.clamp(0.0, 1.0),
        suggested_modifications: payload.suggested_modifications,
        origin: Origin::Llm,
        safety_verdict,
    })
}

/// Strip ```json ... ``` fences some providers wrap around payloads
fn extract_json(text: &str) -> &str {
    let text = text.trim();

    let inner = if let Some(rest) = text.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(text)
    } else if text.starts_with("```") {
        text.split("```").nth(1).unwrap_or(text)
    } else {
        text
    };

    inner.trim()
}
