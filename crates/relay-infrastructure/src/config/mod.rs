//! Configuration management
//!
//! Layered configuration with figment: defaults, then a TOML file, then
//! `RELAY_`-prefixed environment variables, then the unprefixed legacy
//! variables listed in [`crate::constants::LEGACY_ENV_MAPPINGS`].

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
