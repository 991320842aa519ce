//! X (Twitter) API v2 publisher

use async_trait::async_trait;
use relay_domain::error::{Error, Result};
use relay_domain::ports::{PublishedPost, SocialPublisher};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::constants::{CONTENT_TYPE_JSON, X_DEFAULT_API_BASE};
use crate::utils::HttpResponseUtils;

/// Publishes posts with a user-context bearer token
pub struct XPublisher {
    bearer_token: String,
    api_base: String,
    timeout: Duration,
    http_client: Client,
}

impl XPublisher {
    /// Create a publisher
    pub fn new(
        bearer_token: String,
        api_base: Option<String>,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            bearer_token: bearer_token.trim().to_string(),
            api_base: api_base
                .map(|base| base.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| X_DEFAULT_API_BASE.to_string()),
            timeout,
            http_client,
        }
    }

    fn make_error(message: String) -> Error {
        Error::tool_execution("createPost", message)
    }
}

#[async_trait]
impl SocialPublisher for XPublisher {
    async fn publish(&self, status: &str) -> Result<PublishedPost> {
        let response = self
            .http_client
            .post(format!("{}/2/tweets", self.api_base))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .bearer_auth(&self.bearer_token)
            .timeout(self.timeout)
            .json(&json!({ "text": status }))
            .send()
            .await
            .map_err(|e| Error::tool_execution_with_source("createPost", e))?;

        let body = HttpResponseUtils::check_and_parse(response, "X", Self::make_error).await?;
        let id = body["data"]["id"]
            .as_str()
            .ok_or_else(|| Self::make_error("X response is missing data.id".to_string()))?;
        Ok(PublishedPost {
            id: id.to_string(),
            text: body["data"]["text"].as_str().unwrap_or(status).to_string(),
        })
    }
}
