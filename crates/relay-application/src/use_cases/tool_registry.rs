//! Tool Registry Use Case
//!
//! Owns every tool descriptor and the executor bound to it. Arguments are
//! validated against the registered schema before an executor runs, and an
//! executor runs exactly once per successful validation.

use arc_swap::ArcSwap;
use async_trait::async_trait;
use relay_domain::error::{Error, Result};
use relay_domain::ports::{ToolExecutor, ToolInvoker};
use relay_domain::value_objects::{ParameterSchema, ToolArguments, ToolDescriptor, ToolResult};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

struct RegisteredTool {
    descriptor: ToolDescriptor,
    executor: Arc<dyn ToolExecutor>,
}

type Snapshot = Arc<Vec<Arc<RegisteredTool>>>;

/// Registry of callable tools
///
/// Reads take a lock-free snapshot, so listing and invocation never wait on
/// a concurrent registration.
pub struct ToolRegistry {
    tools: ArcSwap<Vec<Arc<RegisteredTool>>>,
    writer: Mutex<()>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Register a tool
    ///
    /// Fails with [`Error::DuplicateTool`] if the name is taken and with
    /// [`Error::InvalidArgument`] if the name or schema is malformed.
    pub fn register<N, D>(
        &self,
        name: N,
        description: D,
        schema: ParameterSchema,
        executor: Arc<dyn ToolExecutor>,
    ) -> Result<()>
    where
        N: Into<String>,
        D: Into<String>,
    {
        let descriptor = ToolDescriptor::new(name, description, schema);
        if descriptor.name.trim().is_empty() {
            return Err(Error::invalid_argument("tool name cannot be empty"));
        }
        descriptor.schema.check_structure()?;

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.tools.load_full();
        if current.iter().any(|t| t.descriptor.name == descriptor.name) {
            return Err(Error::duplicate_tool(descriptor.name));
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        info!(tool = %descriptor.name, params = descriptor.schema.len(), "Tool registered");
        next.push(Arc::new(RegisteredTool {
            descriptor,
            executor,
        }));
        self.tools.store(Arc::new(next));
        Ok(())
    }

    /// Registered descriptors in registration order
    pub fn list(&self) -> ToolListing {
        ToolListing {
            snapshot: self.tools.load_full(),
        }
    }

    /// Descriptor of one tool
    pub fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.find(name).map(|tool| tool.descriptor.clone())
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.load().len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate arguments and run the bound executor
    pub async fn invoke(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult> {
        let tool = self.find(name).ok_or_else(|| Error::tool_not_found(name))?;
        tool.descriptor.schema.validate(name, &arguments)?;

        debug!(tool = name, "Invoking tool");
        match tool.executor.execute(arguments).await {
            Ok(result) => Ok(result),
            Err(err @ (Error::ToolExecution { .. } | Error::SchemaValidation { .. })) => {
                warn!(tool = name, error = %err, "Tool failed");
                Err(err)
            }
            Err(err) => {
                warn!(tool = name, error = %err, "Tool failed");
                Err(Error::tool_execution_with_source(name, err))
            }
        }
    }

    fn find(&self, name: &str) -> Option<Arc<RegisteredTool>> {
        self.tools
            .load()
            .iter()
            .find(|tool| tool.descriptor.name == name)
            .cloned()
    }
}

/// Point-in-time view of the registered tools
///
/// Iterating never touches the registry again, so a listing can be walked
/// any number of times and always yields the same finite sequence.
#[derive(Clone)]
pub struct ToolListing {
    snapshot: Snapshot,
}

impl ToolListing {
    /// Iterate descriptors
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.snapshot.iter().map(|tool| &tool.descriptor)
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Whether the listing is empty
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Owned copies of the descriptors
    pub fn to_vec(&self) -> Vec<ToolDescriptor> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a ToolListing {
    type Item = &'a ToolDescriptor;
    type IntoIter = Box<dyn Iterator<Item = &'a ToolDescriptor> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Calls tools on a registry in the same process
#[async_trait]
impl ToolInvoker for ToolRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(self.list().to_vec())
    }

    async fn call_tool(&self, name: &str, arguments: ToolArguments) -> Result<ToolResult> {
        self.invoke(name, arguments).await
    }
}
