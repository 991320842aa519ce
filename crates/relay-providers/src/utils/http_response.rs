//! HTTP Response Utilities
//!
//! Helper functions for processing HTTP responses from upstream APIs.

use relay_domain::error::{Error, Result};
use reqwest::Response;

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check response status and parse JSON
    ///
    /// `make_error` receives a `"{provider} {context}: {details}"` message and
    /// picks the domain error variant for the calling provider.
    pub async fn check_and_parse(
        response: Response,
        provider_name: &str,
        make_error: fn(String) -> Error,
    ) -> Result<serde_json::Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let code = status.as_u16();
            let context = match code {
                401 | 403 => "authentication failed".to_string(),
                429 => "rate limit exceeded".to_string(),
                500..=599 => format!("server error ({code})"),
                _ => format!("request failed ({code})"),
            };
            return Err(make_error(format!("{provider_name} {context}: {error_text}")));
        }

        response.json().await.map_err(|e| {
            make_error(format!("{provider_name} response parse failed: {e}"))
        })
    }
}
