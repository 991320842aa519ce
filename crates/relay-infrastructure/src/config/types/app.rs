//! Main application configuration

use serde::{Deserialize, Serialize};

pub use super::bridge::BridgeConfig;
pub use super::client::ClientConfig;
pub use super::logging::LoggingConfig;
pub use super::model::{ModelConfig, ModelProvider};
pub use super::server::ServerConfig;
pub use super::tools::{MailConfig, SocialConfig, ToolsConfig};

/// Root configuration of the relay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server
    pub server: ServerConfig,
    /// Upstream language model
    pub model: ModelConfig,
    /// The relay's own tool client
    pub client: ClientConfig,
    /// Model bridge behaviour
    pub bridge: BridgeConfig,
    /// Side-effect services of the built-in tools
    pub tools: ToolsConfig,
    /// Logging
    pub logging: LoggingConfig,
}
