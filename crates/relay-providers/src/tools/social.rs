//! Social posting tool

use async_trait::async_trait;
use relay_domain::error::Result;
use relay_domain::ports::{SocialPublisher, ToolExecutor};
use relay_domain::value_objects::{
    ParamType, ParameterSchema, ParameterSpec, ToolArguments, ToolResult,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::args::parse_args;

/// Tool name of [`CreatePost`]
pub const CREATE_POST: &str = "createPost";

/// Longest status the X API accepts, in characters
pub const MAX_POST_LENGTH: u64 = 280;

#[derive(Debug, Deserialize, Validate)]
struct PostArgs {
    #[validate(length(min = 1, max = MAX_POST_LENGTH))]
    status: String,
}

/// Publishes a status update
pub struct CreatePost {
    publisher: Arc<dyn SocialPublisher>,
}

impl CreatePost {
    /// Create the tool over a publisher
    pub fn new(publisher: Arc<dyn SocialPublisher>) -> Self {
        Self { publisher }
    }

    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new().param(
            "status",
            ParameterSpec::required(ParamType::String)
                .with_description("Text of the post")
                .with_min_length(1)
                .with_max_length(MAX_POST_LENGTH),
        )
    }
}

#[async_trait]
impl ToolExecutor for CreatePost {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: PostArgs = parse_args(CREATE_POST, arguments)?;
        let post = self.publisher.publish(&args.status).await?;
        info!(post_id = %post.id, "Status published");
        Ok(ToolResult::text(format!("Tweeted: {}", post.text)))
    }
}
