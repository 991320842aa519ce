//! Reconnecting tool client
//!
//! Owns at most one live [`ToolClient`]. The connection is made on first
//! use, or eagerly at startup, and remade with bounded retries once the
//! event stream closes.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use relay_domain::error::{Error, Result};
use relay_domain::ports::ToolInvoker;
use relay_domain::value_objects::{ToolArguments, ToolDescriptor, ToolResult};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::client::{ToolClient, ToolClientConfig};
use crate::constants::RECONNECT_DELAY;

/// [`ToolInvoker`] that keeps a tool server connection alive
pub struct RelayToolClient {
    config: ToolClientConfig,
    http: reqwest::Client,
    max_attempts: u32,
    current: ArcSwapOption<ToolClient>,
    connect_lock: Mutex<()>,
}

impl RelayToolClient {
    /// Create an unconnected client
    pub fn new(config: ToolClientConfig, http: reqwest::Client, max_attempts: u32) -> Self {
        Self {
            config,
            http,
            max_attempts: max_attempts.max(1),
            current: ArcSwapOption::empty(),
            connect_lock: Mutex::new(()),
        }
    }

    /// Tool server this client talks to
    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    /// Whether a live connection is held
    pub fn is_connected(&self) -> bool {
        self.live().is_some()
    }

    /// Live connection, connecting first if needed
    pub async fn connect(&self) -> Result<Arc<ToolClient>> {
        if let Some(client) = self.live() {
            return Ok(client);
        }

        let _guard = self.connect_lock.lock().await;
        if let Some(client) = self.live() {
            return Ok(client);
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match ToolClient::connect(self.config.clone(), self.http.clone()).await {
                Ok(client) => {
                    let client = Arc::new(client);
                    self.current.store(Some(Arc::clone(&client)));
                    info!(server = %self.config.server_url, attempt, "Tool client connected");
                    return Ok(client);
                }
                Err(err) => {
                    warn!(
                        server = %self.config.server_url,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Tool server connection attempt failed"
                    );
                    last_error = Some(err);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| Error::connection("Tool server connection failed")))
    }

    /// Drop the current connection
    pub fn disconnect(&self) {
        if let Some(client) = self.current.swap(None) {
            client.close();
            info!(server = %self.config.server_url, "Tool client disconnected");
        }
    }

    fn live(&self) -> Option<Arc<ToolClient>> {
        self.current.load_full().filter(|client| !client.is_closed())
    }
}

#[async_trait]
impl ToolInvoker for RelayToolClient {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        self.connect().await?.list_tools().await
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult> {
        self.connect().await?.call_tool(name, arguments).await
    }
}
