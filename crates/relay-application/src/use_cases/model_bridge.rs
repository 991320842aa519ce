//! Model Bridge Use Case
//!
//! Turns a conversation plus the live tool list into either model text or a
//! single resolved tool result.
//!
//! Per request the bridge moves through
//! `Received -> Sanitized -> ToolsFetched -> ModelQueried` and then either
//! `TextResult` or `ToolDelegated -> ToolResolved` before `Responded`. Any
//! failure short-circuits.
//!
//! Only the first fragment of the first candidate is considered; further
//! candidates and fragments are ignored.

use relay_domain::constants::NO_VALID_MESSAGE_PARTS;
use relay_domain::error::{Error, Result};
use relay_domain::ports::{LanguageModel, ToolInvoker};
use relay_domain::value_objects::{
    ConversationTurn, FunctionDeclaration, ModelRequest, Part, ToolResult, decode_conversation,
    sanitize,
};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default behavioral instruction prepended to every conversation
pub const DEFAULT_SYSTEM_PREAMBLE: &str = "You are a helpful assistant with access to tools. \
Answer concisely in plain text without markdown formatting. When a request matches one of the \
available tools, call that tool instead of describing what you would do.";

/// Default text returned when the model produced nothing usable
pub const DEFAULT_NO_RESPONSE_MARKER: &str = "No response from model";

/// Tunables of the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Instruction turn inserted before the caller's turns
    pub system_preamble: String,
    /// Text returned when the first fragment carries no text
    pub no_response_marker: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            system_preamble: DEFAULT_SYSTEM_PREAMBLE.to_string(),
            no_response_marker: DEFAULT_NO_RESPONSE_MARKER.to_string(),
        }
    }
}

/// What one bridge request resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeOutput {
    /// Plain model text
    Text(String),
    /// The model called a tool and this is its result
    ToolResult {
        /// Tool that was called
        tool: String,
        /// Its result, unmodified
        result: ToolResult,
    },
    /// The model answered without usable text
    NoResponse(String),
}

/// Bridges a function-calling model to the tool invoker
pub struct ModelBridge {
    model: Arc<dyn LanguageModel>,
    tools: Arc<dyn ToolInvoker>,
    settings: BridgeSettings,
}

impl ModelBridge {
    /// Create a bridge
    pub fn new(
        model: Arc<dyn LanguageModel>,
        tools: Arc<dyn ToolInvoker>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            model,
            tools,
            settings,
        }
    }

    /// Active settings
    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Answer a conversation given as caller JSON
    ///
    /// Malformed input fails with [`Error::InvalidConversation`] before the
    /// model or the tools are contacted.
    pub async fn respond(&self, messages: &Value, cancel: &CancellationToken) -> Result<BridgeOutput> {
        let turns = decode_conversation(messages)?;
        self.respond_turns(turns, cancel).await
    }

    /// Answer already typed turns
    ///
    /// Cancelling `cancel` stops the wait on the model. A tool call that has
    /// already been dispatched is allowed to finish.
    pub async fn respond_turns(
        &self,
        turns: Vec<ConversationTurn>,
        cancel: &CancellationToken,
    ) -> Result<BridgeOutput> {
        let request_id = Uuid::new_v4();
        let turns = sanitize(turns);
        if turns.is_empty() {
            return Err(Error::invalid_conversation(NO_VALID_MESSAGE_PARTS));
        }
        debug!(%request_id, turns = turns.len(), "Conversation sanitized");

        let descriptors = self.tools.list_tools().await?;
        let functions: Vec<FunctionDeclaration> =
            descriptors.iter().map(FunctionDeclaration::from).collect();
        debug!(%request_id, tools = functions.len(), "Tools fetched");

        let request = ModelRequest {
            turns: self.with_preamble(turns),
            functions,
        };

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(%request_id, "Request cancelled while waiting on the model");
                return Err(Error::cancelled("model request aborted by caller"));
            }
            response = self.model.generate(request) => response?,
        };
        debug!(%request_id, model = self.model.model_name(), candidates = response.candidates.len(), "Model queried");

        match response.first_part() {
            Some(Part::FunctionCall(call)) => {
                debug!(%request_id, tool = %call.name, "Delegating function call");
                let result = self
                    .tools
                    .call_tool(&call.name, call.args.clone())
                    .await
                    .map_err(|err| {
                        warn!(%request_id, tool = %call.name, error = %err, "Delegated tool call failed");
                        into_tool_execution(&call.name, err)
                    })?;
                debug!(%request_id, tool = %call.name, items = result.content.len(), "Tool resolved");
                Ok(BridgeOutput::ToolResult {
                    tool: call.name.clone(),
                    result,
                })
            }
            Some(Part::Text(text)) => {
                debug!(%request_id, "Text result");
                Ok(BridgeOutput::Text(text.clone()))
            }
            Some(Part::InlineData(_)) | None => {
                debug!(%request_id, "Model returned no text");
                Ok(BridgeOutput::NoResponse(
                    self.settings.no_response_marker.clone(),
                ))
            }
        }
    }

    fn with_preamble(&self, turns: Vec<ConversationTurn>) -> Vec<ConversationTurn> {
        let preamble = self.settings.system_preamble.trim();
        if preamble.is_empty() {
            return turns;
        }
        let mut full = Vec::with_capacity(turns.len() + 1);
        full.push(ConversationTurn::model_text(preamble));
        full.extend(turns);
        full
    }
}

fn into_tool_execution(tool: &str, err: Error) -> Error {
    match err {
        Error::ToolExecution { .. } => err,
        other => Error::tool_execution_with_source(tool, other),
    }
}
