//! Model bridge configuration

use relay_application::{BridgeSettings, DEFAULT_NO_RESPONSE_MARKER, DEFAULT_SYSTEM_PREAMBLE};
use serde::{Deserialize, Serialize};

/// Model bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Instruction turn prepended to every conversation
    pub system_preamble: String,
    /// Text answered when the model returns nothing usable
    pub no_response_marker: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            system_preamble: DEFAULT_SYSTEM_PREAMBLE.to_string(),
            no_response_marker: DEFAULT_NO_RESPONSE_MARKER.to_string(),
        }
    }
}

impl From<&BridgeConfig> for BridgeSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            system_preamble: config.system_preamble.clone(),
            no_response_marker: config.no_response_marker.clone(),
        }
    }
}
