//! Null Language Model
//!
//! Answers every request with no candidates. Used when no model provider
//! is configured, so the relay still serves tools over the protocol.

use async_trait::async_trait;
use relay_domain::error::Result;
use relay_domain::ports::LanguageModel;
use relay_domain::value_objects::{ModelRequest, ModelResponse};
use tracing::debug;

/// Model that never answers
#[derive(Debug, Default, Clone, Copy)]
pub struct NullModel;

impl NullModel {
    /// Create a null model
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LanguageModel for NullModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse> {
        debug!(turns = request.turns.len(), "Null model ignoring request");
        Ok(ModelResponse::default())
    }

    fn model_name(&self) -> &str {
        "null"
    }
}
