//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain
//! layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | figment configuration: defaults, TOML, environment |
//! | [`constants`] | Centralized configuration constants |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers for foreign errors |
//! | [`bootstrap`] | Registry, tool services and model wiring |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::RelayComponents;
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
