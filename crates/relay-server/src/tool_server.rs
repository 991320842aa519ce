//! Tool Server
//!
//! Exposes the tool registry over the SSE transport. Every accepted stream
//! gets its own session and a worker task that answers that session's
//! messages one at a time, in arrival order.
//!
//! # Supported Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | `initialize` | Handshake, returns server info and capabilities |
//! | `tools/list` | Registered tools with their input schemas |
//! | `tools/call` | Validate and run one tool |
//! | `ping` | Health check |

use std::sync::Arc;

use relay_application::ToolRegistry;
use relay_domain::error::{Error, Result};
use relay_domain::value_objects::{ToolArguments, ToolDescriptor, ToolResult};
use rmcp::model::{
    Implementation, JsonObject, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::constants::{
    JSONRPC_INTERNAL_ERROR, JSONRPC_INVALID_PARAMS, JSONRPC_METHOD_NOT_FOUND, MESSAGES_PATH,
    SERVER_NAME, SESSION_OUTBOX_CAPACITY, SESSION_QUERY_PARAM,
};
use crate::session::{OpenedSession, SessionGuard, SessionTransportManager};
use crate::transport::types::{JsonRpcRequest, JsonRpcResponse};

/// Serves registered tools to remote clients
pub struct ToolServer {
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionTransportManager>,
}

/// Server side of one SSE stream
///
/// Holding it keeps the session open; dropping it closes the session.
#[derive(Debug)]
pub struct SessionConnection {
    session_id: String,
    frames: mpsc::Receiver<JsonRpcResponse>,
    _guard: SessionGuard,
}

impl SessionConnection {
    /// Id of the session
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Relative URL the client posts call messages to
    pub fn endpoint(&self) -> String {
        format!("{MESSAGES_PATH}?{SESSION_QUERY_PARAM}={}", self.session_id)
    }

    /// Next reply frame for the stream, `None` once the session is closed
    pub async fn next_frame(&mut self) -> Option<JsonRpcResponse> {
        self.frames.recv().await
    }
}

impl ToolServer {
    /// Create a server over a registry and a session table
    pub fn new(registry: Arc<ToolRegistry>, sessions: Arc<SessionTransportManager>) -> Self {
        Self { registry, sessions }
    }

    /// Registry served to clients
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Session table
    pub fn sessions(&self) -> &Arc<SessionTransportManager> {
        &self.sessions
    }

    /// Open a session for a new event stream and start its worker
    pub fn accept_connection(&self) -> SessionConnection {
        let OpenedSession {
            id,
            mut inbox,
            guard,
        } = self.sessions.open_session();
        let (frames_tx, frames) = mpsc::channel(SESSION_OUTBOX_CAPACITY);
        let registry = Arc::clone(&self.registry);
        let worker_session = id.clone();

        tokio::spawn(async move {
            while let Some(request) = inbox.recv().await {
                let Some(response) = handle_request(&registry, request).await else {
                    continue;
                };
                if frames_tx.send(response).await.is_err() {
                    debug!(session_id = %worker_session, "Stream gone, dropping reply");
                    break;
                }
            }
            debug!(session_id = %worker_session, "Session worker stopped");
        });

        SessionConnection {
            session_id: id,
            frames,
            _guard: guard,
        }
    }

    /// Accept a raw call message posted for a session
    ///
    /// Unknown sessions are rejected before the payload is parsed.
    pub async fn accept_call_message(&self, session_id: &str, payload: &str) -> Result<()> {
        if !self.sessions.contains(session_id) {
            return Err(Error::unknown_session(session_id));
        }
        let request: JsonRpcRequest = serde_json::from_str(payload)
            .map_err(|e| Error::invalid_argument(format!("Invalid JSON-RPC message: {e}")))?;
        self.sessions.route(session_id, request).await
    }

    /// Answer one request directly, outside of any session
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        handle_request(&self.registry, request).await
    }
}

/// Handshake payload of this server
pub fn server_info() -> ServerInfo {
    ServerInfo {
        protocol_version: ProtocolVersion::V_2024_11_05,
        capabilities: ServerCapabilities::builder().enable_tools().build(),
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        },
        instructions: None,
    }
}

/// Wire form of a registered tool
pub fn to_protocol_tool(descriptor: &ToolDescriptor) -> Tool {
    let schema = match descriptor.schema.to_json_schema() {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool::new(
        descriptor.name.clone(),
        descriptor.description.clone(),
        Arc::new(schema),
    )
}

async fn handle_request(
    registry: &ToolRegistry,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        debug!(method = %request.method, "Notification received");
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        "initialize" => to_success(id, &server_info()),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => handle_tools_list(registry, id),
        "tools/call" => handle_tools_call(registry, id, request.params).await,
        other => JsonRpcResponse::error(
            id,
            JSONRPC_METHOD_NOT_FOUND,
            format!("Unknown method: {other}"),
        ),
    };
    Some(response)
}

fn to_success<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            JSONRPC_INTERNAL_ERROR,
            format!("Failed to serialize result: {e}"),
        ),
    }
}

fn handle_tools_list(registry: &ToolRegistry, id: Option<Value>) -> JsonRpcResponse {
    let tools: Vec<Tool> = registry.list().iter().map(to_protocol_tool).collect();
    to_success(id, &json!({ "tools": tools }))
}

async fn handle_tools_call(
    registry: &ToolRegistry,
    id: Option<Value>,
    params: Option<Value>,
) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::error(
            id,
            JSONRPC_INVALID_PARAMS,
            "Missing params for tools/call",
        );
    };
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(
            id,
            JSONRPC_INVALID_PARAMS,
            "Missing 'name' parameter for tools/call",
        );
    };
    let arguments: ToolArguments = match params.get("arguments") {
        None | Some(Value::Null) => ToolArguments::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::error(
                id,
                JSONRPC_INVALID_PARAMS,
                "'arguments' must be an object",
            );
        }
    };

    match registry.invoke(name, arguments).await {
        Ok(result) => to_success(id, &result),
        Err(err) => error_response(id, &err),
    }
}

/// Protocol form of a failed invocation
///
/// Tool failures travel as an `isError` result; lookup and validation
/// failures as invalid-params errors tagged with the error kind.
fn error_response(id: Option<Value>, err: &Error) -> JsonRpcResponse {
    match err {
        Error::ToolNotFound { name } => JsonRpcResponse::error_with_data(
            id,
            JSONRPC_INVALID_PARAMS,
            err.to_string(),
            Some(json!({ "kind": err.kind(), "tool": name })),
        ),
        Error::SchemaValidation {
            tool,
            field,
            message,
        } => JsonRpcResponse::error_with_data(
            id,
            JSONRPC_INVALID_PARAMS,
            err.to_string(),
            Some(json!({ "kind": err.kind(), "tool": tool, "field": field, "reason": message })),
        ),
        Error::ToolExecution { message, .. } => to_success(id, &ToolResult::error(message.clone())),
        other => {
            warn!(error = %other, "Tool call failed");
            JsonRpcResponse::error_with_data(
                id,
                JSONRPC_INTERNAL_ERROR,
                other.to_string(),
                Some(json!({ "kind": other.kind() })),
            )
        }
    }
}
