//! LLM Configuration
//!
//! Model parameters and the wall-clock budget for provider calls, read from
//! the environment with safe defaults.

use std::time::Duration;

const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling and timeout configuration shared by all LLM adapters.
///
/// Fixed at adapter construction; adapters hold no other per-call state.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Sampling temperature passed to the provider
    pub temperature: f32,
    /// Token budget for the completion
    pub max_tokens: u32,
    /// Wall-clock bound enforced on every provider call. Always > 0.
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// Read LLM_TEMPERATURE, LLM_MAX_TOKENS and LLM_TIMEOUT_SECS from the
    /// environment. Unset or unparseable values fall back to defaults;
    /// a zero timeout is rejected the same way.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let temperature = read_env("LLM_TEMPERATURE").unwrap_or(defaults.temperature);
        let max_tokens = read_env("LLM_MAX_TOKENS").unwrap_or(defaults.max_tokens);
        let timeout = match read_env::<u64>("LLM_TIMEOUT_SECS") {
            Some(0) => {
                tracing::warn!("LLM_TIMEOUT_SECS=0 is invalid, using default");
                defaults.timeout
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        Self {
            temperature,
            max_tokens,
            timeout,
        }
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%key, %raw, "unparseable env value, using default");
            None
        }
    }
}
