//! Client Factory
//!
//! Builds the LLM client for the configured backend. The credential check
//! happens exactly once, here: when no usable key is present the factory
//! returns `None` and every pipeline call short-circuits to the heuristic
//! fallback without ever attempting the network.

use anyhow::Result;
use std::sync::Arc;

use crate::anthropic_client::AnthropicClient;
use crate::backend::AgentBackend;
use crate::config::LlmConfig;
use crate::llm_client::LlmClient;
use crate::openai_client::OpenAiClient;

/// Placeholder value shipped in .env templates; treated as absent
const PLACEHOLDER_KEY: &str = "your_openai_api_key_here";

/// Create an LLM client for the backend selected via AGENT_BACKEND.
///
/// Returns `Ok(None)` when the backend's API key is missing or still the
/// template placeholder. An invalid AGENT_BACKEND value is a hard
/// configuration error.
pub fn create_llm_client(config: &LlmConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    let backend = AgentBackend::from_env()?;

    let client: Option<Arc<dyn LlmClient>> = match backend {
        AgentBackend::OpenAi => {
            credential("OPENAI_API_KEY").map(|key| {
                Arc::new(OpenAiClient::new(key, config.clone())) as Arc<dyn LlmClient>
            })
        }
        AgentBackend::Anthropic => {
            credential("ANTHROPIC_API_KEY").map(|key| {
                Arc::new(AnthropicClient::new(key, config.clone())) as Arc<dyn LlmClient>
            })
        }
    };

    match &client {
        Some(c) => tracing::info!(
            provider = c.provider_name(),
            model = c.model_name(),
            "LLM client configured"
        ),
        None => tracing::warn!(
            backend = backend.name(),
            "API key not configured - will use fallback responses only"
        ),
    }

    Ok(client)
}

fn credential(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty() && key != PLACEHOLDER_KEY)
}
