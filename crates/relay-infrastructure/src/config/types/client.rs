//! Tool client configuration

use crate::constants::{
    DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_HANDSHAKE_TIMEOUT_SECS, DEFAULT_MAX_RECONNECT_ATTEMPTS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the client the relay uses to reach its tool server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Tool server base URL; defaults to this process's own server
    pub server_url: Option<String>,
    /// Bound on connect plus initialize, in seconds
    pub handshake_timeout_secs: u64,
    /// Bound on waiting for one tool result, in seconds
    pub call_timeout_secs: u64,
    /// Reconnect attempts after the push stream closes
    pub max_reconnect_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            handshake_timeout_secs: DEFAULT_HANDSHAKE_TIMEOUT_SECS,
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl ClientConfig {
    /// Handshake bound
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    /// Result wait bound
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
