//! HTTP server configuration

use crate::constants::{DEFAULT_CORS_ORIGIN, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Origin allowed by the CORS fairing
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Address a local client should use to reach this server
    ///
    /// Wildcard bind addresses are replaced with loopback.
    pub fn local_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "" => "127.0.0.1",
            other => other,
        };
        format!("http://{host}:{}", self.port)
    }
}
