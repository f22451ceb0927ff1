//! LLM Client Trait
//!
//! Unified interface for LLM providers (OpenAI, Anthropic), plus the typed
//! failure taxonomy every adapter maps into.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for the provider boundary.
///
/// `Unconfigured` is decided once at construction time (see
/// `client_factory`); the other three arise per call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API credential configured")]
    Unconfigured,

    #[error("provider call exceeded {0:?}")]
    Timeout(Duration),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("malformed provider response: {0}")]
    Parse(String),
}

/// Outcome of a single LLM attempt: either the decoded payload or the
/// reason the pipeline degraded to the heuristic path.
///
/// Degrade-on-failure is part of the type signature at each call site,
/// not exception flow.
#[derive(Debug)]
pub enum LlmOutcome<T> {
    Answered(T),
    Degraded(LlmError),
}

/// Unified LLM client interface.
///
/// Prompts always instruct the provider to answer with a JSON payload;
/// `complete` returns the provider's raw text and the caller owns decoding.
/// Model, temperature, max_tokens and timeout are fixed at adapter
/// construction; adapters keep no other state between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Call the LLM with system + user prompts, return raw text response
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    /// Get the model name for logging
    fn model_name(&self) -> &str;

    /// Get the provider name for logging
    fn provider_name(&self) -> &str;
}
