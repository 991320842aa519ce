//! Language model port

use crate::error::Result;
use crate::value_objects::{ModelRequest, ModelResponse};
use async_trait::async_trait;

/// Function-calling language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate candidates for the given turns and callable functions
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
