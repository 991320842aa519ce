//! # Tool Relay - Provider Implementations
//!
//! Concrete adapters for the ports defined in `relay-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Language model | `LanguageModel` | Gemini, Null |
//! | Mail | `MailTransport` | SMTP, Disabled |
//! | Social | `SocialPublisher` | X API, Disabled |
//! | Documents | `DocumentRenderer` | lopdf |
//! | Tools | `ToolExecutor` | the built-in tool set |
//!
//! ## Usage
//!
//! ```ignore
//! use relay_providers::model::GeminiModel;
//! use relay_providers::tools::{builtin_tools, ToolServices};
//! ```

pub use relay_domain::error::{Error, Result};
pub use relay_domain::ports::{
    DocumentRenderer, LanguageModel, MailTransport, SocialPublisher, ToolExecutor,
};

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Language model providers
///
/// Implements `LanguageModel` for function-calling model APIs.
pub mod model;

/// Side-effect services used by tools
pub mod services;

/// Built-in tools
pub mod tools;

pub use model::{GeminiConfig, GeminiModel, NullModel};
pub use tools::{BuiltinTool, ToolServices, builtin_tools};
