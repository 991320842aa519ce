//! Application use cases

/// Conversation to model to tool bridge
pub mod model_bridge;
/// Tool registration, listing and invocation
pub mod tool_registry;

pub use model_bridge::{
    BridgeOutput, BridgeSettings, DEFAULT_NO_RESPONSE_MARKER, DEFAULT_SYSTEM_PREAMBLE, ModelBridge,
};
pub use tool_registry::{ToolListing, ToolRegistry};
