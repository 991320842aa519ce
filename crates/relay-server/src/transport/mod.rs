//! Transport layer
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`http`] | Rocket routes of the SSE transport and the CORS fairing |
//! | [`client`] | Tool client over the SSE transport |
//! | [`relay_client`] | Reconnecting wrapper used by the model bridge |
//! | [`types`] | JSON-RPC message types |

pub mod client;
pub mod http;
pub mod relay_client;
pub mod types;

pub use client::{ToolClient, ToolClientConfig};
pub use relay_client::RelayToolClient;
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
