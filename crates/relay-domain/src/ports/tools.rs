//! Tool execution ports

use crate::error::Result;
use crate::value_objects::{ToolArguments, ToolDescriptor, ToolResult};
use async_trait::async_trait;

/// Concrete operation bound to a tool name
///
/// Arguments have already been validated against the tool's schema when
/// `execute` is called.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run the tool once
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult>;
}

/// Something that can list and call tools by name
///
/// Implemented by the protocol client and by the in-process registry
/// adapter, so callers do not care which side of the transport they are on.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Current tool descriptors, fetched fresh on every call
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Call one tool and wait for its result
    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult>;
}
