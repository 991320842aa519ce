//! Tool Client
//!
//! Connects to a tool server over the SSE transport: opens the event stream,
//! waits for the `endpoint` event, then posts JSON-RPC requests to that
//! endpoint and correlates replies arriving on the stream by request id.
//!
//! Every wait is bounded. The handshake fails with
//! [`Error::Connection`] when it does not finish in time, and a call fails
//! with [`Error::Timeout`] when no reply arrives within the call timeout.
//! A reply that arrives after its call timed out is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use eventsource_stream::{Event, Eventsource};
use futures::{Stream, StreamExt};
use relay_domain::error::{Error, Result};
use relay_domain::ports::ToolInvoker;
use relay_domain::value_objects::{ParameterSchema, ToolArguments, ToolDescriptor, ToolResult};
use reqwest::Url;
use rmcp::model::{Implementation, ProtocolVersion, ServerInfo, Tool};
use serde_json::{Value, json};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::constants::{
    CLIENT_NAME, ENDPOINT_EVENT, JSONRPC_INTERNAL_ERROR, MESSAGE_EVENT, SESSION_QUERY_PARAM,
    SSE_PATH,
};

type PendingCalls = Arc<DashMap<u64, oneshot::Sender<JsonRpcResponse>>>;

/// Tool client settings
#[derive(Debug, Clone)]
pub struct ToolClientConfig {
    /// Tool server base URL, e.g. `http://127.0.0.1:4000`
    pub server_url: String,
    /// Bound on opening the stream plus the initialize exchange
    pub handshake_timeout: Duration,
    /// Bound on waiting for each reply
    pub call_timeout: Duration,
}

/// Connected tool client
///
/// Dropping the client stops its stream reader, which closes the session on
/// the server.
pub struct ToolClient {
    http: reqwest::Client,
    messages_url: Url,
    session_id: Option<String>,
    pending: PendingCalls,
    next_id: AtomicU64,
    closed: Arc<AtomicBool>,
    reader: JoinHandle<()>,
    call_timeout: Duration,
}

impl std::fmt::Debug for ToolClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolClient")
            .field("messages_url", &self.messages_url.as_str())
            .field("session_id", &self.session_id)
            .field("pending", &self.pending.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Drop for ToolClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl ToolClient {
    /// Connect and complete the handshake
    pub async fn connect(config: ToolClientConfig, http: reqwest::Client) -> Result<Self> {
        let bound = config.handshake_timeout;
        match tokio::time::timeout(bound, Self::establish(config, http)).await {
            Ok(Ok(client)) => Ok(client),
            Ok(Err(err @ Error::Connection { .. })) => Err(err),
            Ok(Err(err)) => Err(Error::connection_with_source(
                "Tool server handshake failed",
                err,
            )),
            Err(_) => Err(Error::connection(format!(
                "Tool server handshake did not finish within {}ms",
                bound.as_millis()
            ))),
        }
    }

    async fn establish(config: ToolClientConfig, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(&config.server_url).map_err(|e| {
            Error::connection_with_source(
                format!("Invalid tool server URL '{}'", config.server_url),
                e,
            )
        })?;
        let sse_url = base
            .join(SSE_PATH)
            .map_err(|e| Error::connection_with_source("Invalid event stream URL", e))?;

        debug!(url = %sse_url, "Opening tool server event stream");
        let response = http
            .get(sse_url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| Error::connection_with_source("Failed to open event stream", e))?;
        if !response.status().is_success() {
            return Err(Error::connection(format!(
                "Event stream rejected with status {}",
                response.status()
            )));
        }

        let mut events = Box::pin(response.bytes_stream().eventsource());
        let endpoint = read_endpoint(&mut events).await?;
        let messages_url = base.join(&endpoint).map_err(|e| {
            Error::connection_with_source(format!("Invalid endpoint '{endpoint}'"), e)
        })?;
        let session_id = messages_url
            .query_pairs()
            .find(|(key, _)| key == SESSION_QUERY_PARAM)
            .map(|(_, value)| value.into_owned());

        let pending: PendingCalls = Arc::new(DashMap::new());
        let closed = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(read_frames(
            events,
            Arc::clone(&pending),
            Arc::clone(&closed),
        ));

        let client = Self {
            http,
            messages_url,
            session_id,
            pending,
            next_id: AtomicU64::new(1),
            closed,
            reader,
            call_timeout: config.call_timeout,
        };
        client.initialize(config.handshake_timeout).await?;
        Ok(client)
    }

    async fn initialize(&self, bound: Duration) -> Result<()> {
        let client_info = Implementation {
            name: CLIENT_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        };
        let params = json!({
            "protocolVersion": ProtocolVersion::V_2024_11_05,
            "capabilities": {},
            "clientInfo": client_info,
        });
        let response = self
            .request("initialize", Some(params), "initialize reply", bound)
            .await?;
        let info: ServerInfo = serde_json::from_value(expect_result(response)?)
            .map_err(|e| Error::connection_with_source("Invalid initialize result", e))?;
        self.post(&JsonRpcRequest::notification("notifications/initialized", None))
            .await?;

        info!(
            server = %info.server_info.name,
            version = %info.server_info.version,
            session_id = self.session_id.as_deref().unwrap_or("-"),
            "Connected to tool server"
        );
        Ok(())
    }

    /// Session id assigned by the server, when it supplied one
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether the event stream has ended
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of calls waiting for a reply
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Stop reading the stream and fail all waiting calls
    pub fn close(&self) {
        self.reader.abort();
        self.closed.store(true, Ordering::SeqCst);
        self.pending.clear();
    }

    /// Tools offered by the server, fetched fresh on every call
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let response = self
            .request("tools/list", Some(json!({})), "tool list", self.call_timeout)
            .await?;
        let result = expect_result(response)?;
        let tools: Vec<Tool> =
            serde_json::from_value(result.get("tools").cloned().unwrap_or_default())
                .map_err(|e| protocol_error(format!("Malformed tools/list result: {e}")))?;
        tools.iter().map(from_protocol_tool).collect()
    }

    /// Call a tool and wait for its result
    pub async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult> {
        let params = json!({ "name": name, "arguments": arguments });
        let operation = format!("result of tool '{name}'");
        let response = self
            .request("tools/call", Some(params), &operation, self.call_timeout)
            .await?;
        if let Some(error) = response.error {
            return Err(call_error(name, error));
        }

        let result: ToolResult = serde_json::from_value(response.result.unwrap_or_default())
            .map_err(|e| protocol_error(format!("Malformed tools/call result: {e}")))?;
        if result.is_error {
            return Err(Error::tool_execution(name, result.joined_text()));
        }
        Ok(result)
    }

    async fn request(
        &self,
        method: &str,
        params: Option<Value>,
        operation: &str,
        bound: Duration,
    ) -> Result<JsonRpcResponse> {
        if self.is_closed() {
            return Err(Error::connection("Tool server connection is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        // The reader may have cleared the table just before the insert
        if self.is_closed() {
            self.pending.remove(&id);
            return Err(Error::connection("Tool server connection is closed"));
        }
        let message = JsonRpcRequest::new(id, method, params);

        let exchange = async {
            self.post(&message).await?;
            rx.await.map_err(|_| {
                Error::connection(format!(
                    "Tool server connection closed while waiting for {operation}"
                ))
            })
        };
        match tokio::time::timeout(bound, exchange).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => {
                self.pending.remove(&id);
                Err(err)
            }
            Err(_) => {
                self.pending.remove(&id);
                warn!(id, method, timeout = ?bound, "Tool server reply timed out");
                Err(Error::timeout(operation, bound))
            }
        }
    }

    async fn post(&self, message: &JsonRpcRequest) -> Result<()> {
        let response = self
            .http
            .post(self.messages_url.clone())
            .json(message)
            .send()
            .await
            .map_err(|e| {
                Error::connection_with_source("Failed to post message to tool server", e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::BAD_REQUEST {
            // The server no longer knows this session
            self.closed.store(true, Ordering::SeqCst);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::connection(format!(
            "Tool server rejected message ({status}): {body}"
        )))
    }
}

#[async_trait]
impl ToolInvoker for ToolClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        ToolClient::list_tools(self).await
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult> {
        ToolClient::call_tool(self, name, arguments).await
    }
}

/// Descriptor of a tool announced by a server
pub fn from_protocol_tool(tool: &Tool) -> Result<ToolDescriptor> {
    let input_schema = Value::Object(tool.input_schema.as_ref().clone());
    let schema = ParameterSchema::from_json_schema(&input_schema)?;
    Ok(ToolDescriptor::new(
        tool.name.to_string(),
        tool.description.as_deref().unwrap_or_default(),
        schema,
    ))
}

fn protocol_error(message: String) -> Error {
    Error::Protocol {
        code: JSONRPC_INTERNAL_ERROR,
        message,
    }
}

fn expect_result(response: JsonRpcResponse) -> Result<Value> {
    if let Some(error) = response.error {
        return Err(Error::Protocol {
            code: error.code,
            message: error.message,
        });
    }
    response
        .result
        .ok_or_else(|| protocol_error("Reply carries neither result nor error".to_string()))
}

/// Typed error for a failed `tools/call` reply
fn call_error(name: &str, error: JsonRpcError) -> Error {
    let data = error.data.unwrap_or_default();
    let field = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);
    match field("kind").as_deref() {
        Some("tool_not_found") => {
            Error::tool_not_found(field("tool").unwrap_or_else(|| name.to_string()))
        }
        Some("schema_validation") => Error::schema_validation(
            field("tool").unwrap_or_else(|| name.to_string()),
            field("field").unwrap_or_default(),
            field("reason").unwrap_or(error.message),
        ),
        _ => Error::tool_execution(name, error.message),
    }
}

/// Wait for the `endpoint` event and return its data
///
/// Frames seen before the endpoint cannot answer anything yet and are skipped.
async fn read_endpoint<S, E>(events: &mut S) -> Result<String>
where
    S: Stream<Item = std::result::Result<Event, E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(event) = events.next().await {
        match event {
            Ok(event) if event.event == ENDPOINT_EVENT => return Ok(event.data),
            Ok(event) => debug!(event = %event.event, "Skipping event before endpoint"),
            Err(e) => {
                return Err(Error::connection(format!(
                    "Event stream failed during handshake: {e}"
                )));
            }
        }
    }
    Err(Error::connection("Event stream closed before the endpoint event"))
}

async fn read_frames<S, E>(mut events: S, pending: PendingCalls, closed: Arc<AtomicBool>)
where
    S: Stream<Item = std::result::Result<Event, E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => deliver(&pending, &event),
            Err(e) => {
                warn!(error = %e, "Tool server event stream failed");
                break;
            }
        }
    }
    closed.store(true, Ordering::SeqCst);
    pending.clear();
    info!("Tool server event stream closed");
}

fn deliver(pending: &PendingCalls, event: &Event) {
    if event.event != MESSAGE_EVENT {
        debug!(event = %event.event, "Ignoring event");
        return;
    }
    let response: JsonRpcResponse = match serde_json::from_str(&event.data) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Malformed frame on event stream");
            return;
        }
    };
    let Some(id) = response.numeric_id() else {
        debug!("Frame without a call id");
        return;
    };
    match pending.remove(&id) {
        Some((_, waiter)) => {
            let _ = waiter.send(response);
        }
        None => debug!(id, "Discarding late or unknown frame"),
    }
}
