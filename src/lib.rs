//! LLM-powered natural language to SQL translation
//!
//! This crate translates natural-language questions into SQL statements via
//! an external LLM provider, with a deterministic heuristic fallback and a
//! two-tier SQL safety gate. It has no database dependencies; execution
//! stays behind a stub boundary.
//!
//! ## Architecture
//!
//! ```text
//! Question → Translator → [LLM attempt, bounded wait] → advisory SafetyGate → result
//!                  ↘ (unconfigured / timeout / provider error / malformed payload)
//!                    HeuristicFallback → result
//!
//! QueryValidator / QueryExecutor → strict SafetyGate (blocking)
//! ```
//!
//! Every result carries an `Origin` tag so callers can audit whether an
//! answer came from the LLM path or the deterministic fallback.
//!
//! ## Backend Selection
//!
//! Set `AGENT_BACKEND` environment variable:
//! - `openai` (default): OpenAI API
//! - `anthropic`: Anthropic Claude API

// LLM client abstraction
pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod config;
pub mod llm_client;
pub mod openai_client;

// Core pipeline modules
pub mod heuristics;
pub mod intent;
pub mod schema;
pub mod translator;

// Safety gate and static validation
pub mod safety;
pub mod validator;

// Execution boundary (stub)
pub mod executor;

// End-to-end tests
#[cfg(test)]
mod pipeline_tests;

// Re-exports for convenience
pub use backend::AgentBackend;
pub use client_factory::create_llm_client;
pub use config::LlmConfig;
pub use executor::{ExecutionOutcome, InMemoryQueryHistory, QueryExecutor, QueryHistoryStore, QueryRecord};
pub use intent::{EntityKind, ExtractedEntity, IntentResult, Origin, QueryIntent};
pub use llm_client::{LlmClient, LlmError, LlmOutcome};
pub use safety::{SafetyGate, SafetyVerdict};
pub use schema::{ConversationTurn, SchemaContext, TranslationRequest};
pub use translator::{SqlGenerationResult, Translator};
pub use validator::{QueryValidator, ValidationResult};
