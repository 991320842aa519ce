//! Language model configuration

use crate::constants::DEFAULT_MODEL_TIMEOUT_SECS;
use relay_providers::constants::{GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Available model providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini
    #[default]
    Gemini,
    /// No model; `/chat` always yields the no-response marker
    Null,
}

/// Language model configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider
    pub provider: ModelProvider,
    /// API key
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            api_key: None,
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl ModelConfig {
    /// Upstream request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key with surrounding whitespace removed, if non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
