//! Domain Port Interfaces
//!
//! Boundary contracts implemented by the provider and server layers.
//!
//! - **tools** - tool execution and invocation
//! - **model** - function-calling language model
//! - **services** - side effects performed by built-in tools

/// Function-calling language model port
pub mod model;
/// Side-effect ports for built-in tools
pub mod services;
/// Tool execution ports
pub mod tools;

pub use model::LanguageModel;
pub use services::{DocumentRenderer, MailTransport, OutgoingEmail, PublishedPost, SocialPublisher};
pub use tools::{ToolExecutor, ToolInvoker};
