//! Configuration types module

pub mod app;
pub mod bridge;
pub mod client;
pub mod logging;
pub mod model;
pub mod server;
pub mod tools;

// Re-export main types
pub use app::*;
