//! Liveness endpoint

use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::{State, get};
use serde::Serialize;

use crate::tool_server::ToolServer;
use crate::transport::RelayToolClient;

/// State of the health endpoint
#[derive(Clone)]
pub struct HealthState {
    /// Tool server whose sessions are reported
    pub server: Arc<ToolServer>,
    /// Tool client of the model bridge, when it goes over the transport
    pub tool_client: Option<Arc<RelayToolClient>>,
}

/// Health report
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the server answers
    pub status: &'static str,
    /// Open tool sessions
    pub sessions: usize,
    /// Registered tools
    pub tools: usize,
    /// Whether the bridge's tool client holds a live connection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_client_connected: Option<bool>,
}

/// Report liveness and session counts
#[get("/health")]
pub fn health(state: &State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: state.server.sessions().session_count(),
        tools: state.server.registry().len(),
        tool_client_connected: state
            .tool_client
            .as_ref()
            .map(|client| client.is_connected()),
    })
}
