//! # Tool Relay Server
//!
//! Transport and HTTP layer of the tool relay.
//!
//! A [`ToolServer`] exposes the tool registry over Server-Sent Events: each
//! `GET /sse` opens a session whose first event names the endpoint for call
//! messages, and replies come back as `message` events on the same stream.
//! A [`ToolClient`] speaks the other side of that transport with bounded
//! waits, and the model bridge behind `POST /chat` uses one to run the tools
//! the model asks for.
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RelayServerBuilder`] | Assembles the Rocket application |
//! | [`SessionTransportManager`] | Open sessions and their inboxes |
//! | [`ToolServer`] | JSON-RPC dispatch per session |
//! | [`ToolClient`] | Client side of the SSE transport |
//! | [`RelayToolClient`] | Reconnecting tool client |

// Allow Rust 2024 compatibility issues from Rocket's EventStream macro
#![allow(rust_2024_compatibility)]

pub mod builder;
pub mod constants;
pub mod handlers;
pub mod init;
pub mod session;
pub mod tool_server;
pub mod transport;

pub use builder::{BuilderError, RelayServer, RelayServerBuilder};
pub use init::run_server;
pub use session::SessionTransportManager;
pub use tool_server::{SessionConnection, ToolServer};
pub use transport::{RelayToolClient, ToolClient, ToolClientConfig};
