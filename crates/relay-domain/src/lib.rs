//! # Tool Relay Domain
//!
//! Core types shared by every layer of the relay: tool descriptors and
//! their parameter schemas, tool results, conversation turns, the error
//! taxonomy and the port traits implemented further out.
//!
//! This crate has no I/O and no runtime dependencies beyond serde.

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{LanguageModel, ToolExecutor, ToolInvoker};
pub use value_objects::{
    ContentItem, ConversationTurn, ParamType, ParameterSchema, ParameterSpec, Part, Role,
    ToolArguments, ToolDescriptor, ToolResult,
};
