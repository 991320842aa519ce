//! Conversation endpoint
//!
//! `POST /chat` takes `{"messages": [...]}` in the model's turn format and
//! answers `{"data": ...}`: model text, the content items of a delegated
//! tool call, or the no-response marker.

use std::sync::Arc;

use relay_application::{BridgeOutput, ModelBridge};
use relay_domain::constants::INVALID_MESSAGES_FORMAT;
use relay_domain::error::Error;
use rocket::serde::json::{self, Json};
use rocket::{State, post};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::{ApiError, api_error};

/// State of the conversation endpoint
#[derive(Clone)]
pub struct ChatState {
    /// Bridge answering conversations
    pub bridge: Arc<ModelBridge>,
    /// Cancelled when the server shuts down
    pub shutdown: CancellationToken,
}

/// Request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation turns, validated by the bridge
    #[serde(default)]
    pub messages: Value,
}

/// Response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Text or tool result content
    pub data: Value,
}

/// Answer a conversation
#[post("/chat", data = "<request>")]
pub async fn chat(
    state: &State<ChatState>,
    request: Result<Json<ChatRequest>, json::Error<'_>>,
) -> Result<Json<ChatResponse>, ApiError> {
    let messages = match request {
        Ok(request) => request.into_inner().messages,
        Err(e) => {
            debug!(error = %e, "Unreadable chat body");
            return Err(api_error(&Error::invalid_conversation(
                INVALID_MESSAGES_FORMAT,
            )));
        }
    };

    let cancel = state.shutdown.child_token();
    let output = state
        .bridge
        .respond(&messages, &cancel)
        .await
        .map_err(|e| api_error(&e))?;

    let data = match output {
        BridgeOutput::Text(text) | BridgeOutput::NoResponse(text) => Value::String(text),
        BridgeOutput::ToolResult { tool, result } => {
            info!(tool = %tool, items = result.content.len(), "Returning tool result");
            serde_json::to_value(&result.content).map_err(|e| api_error(&Error::from(e)))?
        }
    };
    Ok(Json(ChatResponse { data }))
}
