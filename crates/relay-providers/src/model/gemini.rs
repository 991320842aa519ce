//! Gemini Language Model Provider
//!
//! Implements the `LanguageModel` port with Gemini's `generateContent`
//! endpoint and its `functionDeclarations` tool format.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use relay_domain::error::{Error, Result};
use relay_domain::ports::LanguageModel;
use relay_domain::value_objects::{Candidate, ModelRequest, ModelResponse, Part};

use crate::constants::{
    CONTENT_TYPE_JSON, ERROR_MSG_REQUEST_TIMEOUT, GEMINI_API_KEY_HEADER, GEMINI_DEFAULT_BASE_URL,
    GEMINI_DEFAULT_MODEL,
};
use crate::utils::HttpResponseUtils;

/// Gemini client settings
#[derive(Clone)]
pub struct GeminiConfig {
    /// Google AI API key
    pub api_key: String,
    /// API base URL, without the `/v1beta` suffix
    pub base_url: String,
    /// Model name, with or without the `models/` prefix
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Output token cap
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    /// Settings with default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output token cap
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Gemini function-calling model
pub struct GeminiModel {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiModel {
    /// Create a provider
    pub fn new(config: GeminiConfig, http_client: Client) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::config("Gemini API key is not set"));
        }
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Model name for API calls (prefix removed)
    pub fn api_model_name(&self) -> &str {
        self.config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url,
            self.api_model_name()
        )
    }
}

/// Build the `generateContent` request body
pub fn build_request_body(config: &GeminiConfig, request: &ModelRequest) -> Result<Value> {
    let mut body = json!({ "contents": serde_json::to_value(&request.turns)? });

    if !request.functions.is_empty() {
        body["tools"] = json!([{ "functionDeclarations": request.functions }]);
    }

    let mut generation = serde_json::Map::new();
    if let Some(temperature) = config.temperature {
        generation.insert("temperature".into(), json!(temperature));
    }
    if let Some(max_tokens) = config.max_output_tokens {
        generation.insert("maxOutputTokens".into(), json!(max_tokens));
    }
    if !generation.is_empty() {
        body["generationConfig"] = Value::Object(generation);
    }
    Ok(body)
}

/// Parse a `generateContent` response
///
/// A response without candidates is valid and yields an empty
/// [`ModelResponse`]. Parts the domain does not model are skipped.
pub fn parse_response(json: &Value) -> Result<ModelResponse> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(Error::upstream(format!("Gemini blocked the prompt: {reason}")));
    }

    let candidates = json["candidates"]
        .as_array()
        .map(|candidates| {
            candidates
                .iter()
                .map(|candidate| Candidate {
                    parts: candidate["content"]["parts"]
                        .as_array()
                        .map(|parts| {
                            parts
                                .iter()
                                .filter_map(|part| serde_json::from_value::<Part>(part.clone()).ok())
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ModelResponse { candidates })
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse> {
        let body = build_request_body(&self.config, &request)?;

        debug!(
            model = %self.api_model_name(),
            turns = request.turns.len(),
            functions = request.functions.len(),
            "Gemini API request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header(GEMINI_API_KEY_HEADER, &self.config.api_key)
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::upstream(format!(
                        "{} {:?}",
                        ERROR_MSG_REQUEST_TIMEOUT, self.config.timeout
                    ))
                } else {
                    Error::upstream_with_source("Gemini request failed", e)
                }
            })?;

        let json = HttpResponseUtils::check_and_parse(response, "Gemini", Error::upstream::<String>).await?;
        parse_response(&json)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
