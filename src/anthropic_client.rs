//! Anthropic Client
//!
//! LLM client implementation for the Anthropic Claude messages API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LlmConfig;
use crate::llm_client::{LlmClient, LlmError};

/// Default Anthropic model
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic Claude API client
#[derive(Clone)]
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    config: LlmConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key
    pub fn new(api_key: String, config: LlmConfig) -> Self {
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            config,
        }
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, config: LlmConfig, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
            config,
        }
    }

    /// Internal API call implementation
    async fn call_api(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        // Anthropic has no json_object mode, rely on prompt engineering
        let json_system = format!(
            "{}\n\nIMPORTANT: Respond with valid JSON only. No markdown code blocks, no explanations.",
            system_prompt
        );

        let body = serde_json::json!({
            "model": &self.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": json_system,
            "messages": [{"role": "user", "content": user_prompt}]
        });

        let fut = async {
            let response = self
                .client
                .post(MESSAGES_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .timeout(self.config.timeout)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        LlmError::Timeout(self.config.timeout)
                    } else {
                        LlmError::Provider(e.to_string())
                    }
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Provider(format!(
                    "Anthropic API error {}: {}",
                    status, body
                )));
            }

            #[derive(Deserialize)]
            struct ContentBlock {
                text: Option<String>,
            }
            #[derive(Deserialize)]
            struct ApiResponse {
                content: Vec<ContentBlock>,
            }

            let api_response: ApiResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Parse(format!("Anthropic envelope: {}", e)))?;

            api_response
                .content
                .first()
                .and_then(|c| c.text.clone())
                .ok_or_else(|| LlmError::Parse("Empty response from Anthropic".to_string()))
        };

        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result,
            // In-flight call is dropped here, not awaited further
            Err(_) => Err(LlmError::Timeout(self.config.timeout)),
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.call_api(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "Anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = AnthropicClient::new("test-key".to_string(), LlmConfig::default());
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "Anthropic");
    }

    #[test]
    fn test_with_model() {
        let client =
            AnthropicClient::with_model("test-key".to_string(), LlmConfig::default(), "claude-3-opus");
        assert_eq!(client.model_name(), "claude-3-opus");
    }
}
