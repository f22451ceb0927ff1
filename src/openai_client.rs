//! OpenAI Client
//!
//! LLM client implementation for the OpenAI chat-completions API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LlmConfig;
use crate::llm_client::{LlmClient, LlmError};

/// Default OpenAI model
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: String, config: LlmConfig) -> Self {
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
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
    ///
    /// The whole call (send + body read) runs under `tokio::time::timeout`;
    /// the request additionally carries reqwest's own timeout so a hung
    /// provider cannot outlive the configured bound either way.
    async fn call_api(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "response_format": {"type": "json_object"}
        });

        let fut = async {
            let response = self
                .client
                .post(CHAT_COMPLETIONS_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
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
                    "OpenAI API error {}: {}",
                    status, body
                )));
            }

            #[derive(Deserialize)]
            struct Message {
                content: String,
            }
            #[derive(Deserialize)]
            struct Choice {
                message: Message,
            }
            #[derive(Deserialize)]
            struct ApiResponse {
                choices: Vec<Choice>,
            }

            let response_text = response
                .text()
                .await
                .map_err(|e| LlmError::Provider(e.to_string()))?;
            tracing::debug!(
                "OpenAI raw response: {}",
                &response_text[..response_text.len().min(1000)]
            );

            let api_response: ApiResponse = serde_json::from_str(&response_text)
                .map_err(|e| LlmError::Parse(format!("OpenAI envelope: {}", e)))?;

            api_response
                .choices
                .first()
                .map(|c| c.message.content.clone())
                .ok_or_else(|| LlmError::Parse("OpenAI returned no choices".to_string()))
        };

        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result,
            // In-flight call is dropped here, not awaited further
            Err(_) => Err(LlmError::Timeout(self.config.timeout)),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        self.call_api(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
