//! Domain Value Objects
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ToolDescriptor`] | Name, description and parameter schema of a tool |
//! | [`ParameterSchema`] | Typed parameters with validation rules |
//! | [`ToolResult`] | Ordered content produced by a tool |
//! | [`ConversationTurn`] | One role-tagged turn of a conversation |
//! | [`FunctionDeclaration`] | Tool as advertised to a function-calling model |

/// Tool result content
pub mod content;
/// Conversation turns and sanitization
pub mod conversation;
/// Language model request/response shapes
pub mod model;
/// Tool descriptors and parameter schemas
pub mod tool;

pub use content::{ContentItem, ToolResult};
pub use conversation::{
    ConversationTurn, FunctionCall, InlineData, Part, Role, decode_conversation, sanitize,
};
pub use model::{Candidate, FunctionDeclaration, ModelRequest, ModelResponse};
pub use tool::{
    ParamType, ParameterSchema, ParameterSpec, ToolArguments, ToolDescriptor, bytes_from_value,
};
