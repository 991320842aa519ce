//! Error handling types

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by the context-bearing variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the tool relay
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Caller supplied a conversation that cannot be sent upstream
    #[error("{message}")]
    InvalidConversation {
        /// Reason shown to the caller
        message: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// A tool with the same name is already registered
    #[error("Tool already registered: {name}")]
    DuplicateTool {
        /// Name of the conflicting tool
        name: String,
    },

    /// No tool with the requested name exists
    #[error("Tool not found: {name}")]
    ToolNotFound {
        /// Requested tool name
        name: String,
    },

    /// Tool arguments do not satisfy the registered schema
    #[error("Invalid arguments for tool '{tool}': field '{field}' {message}")]
    SchemaValidation {
        /// Tool whose schema was violated
        tool: String,
        /// Offending parameter name
        field: String,
        /// What was wrong with the field
        message: String,
    },

    /// The tool executor itself failed
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution {
        /// Tool that failed
        tool: String,
        /// Failure description
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// No open session with the given id
    #[error("No transport found for sessionId: {session_id}")]
    UnknownSession {
        /// Session id that was looked up
        session_id: String,
    },

    /// Transport connection or handshake failure
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// A bounded wait elapsed
    #[error("Timed out after {}ms waiting for {operation}", after.as_millis())]
    Timeout {
        /// What was being waited on
        operation: String,
        /// The bound that elapsed
        after: Duration,
    },

    /// Peer answered with a protocol-level error that has no richer mapping
    #[error("Protocol error {code}: {message}")]
    Protocol {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// Upstream language model failure
    #[error("Upstream model error: {message}")]
    Upstream {
        /// Description of the upstream failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// The caller aborted the request
    #[error("Request cancelled: {message}")]
    Cancelled {
        /// What was interrupted
        message: String,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Infrastructure error with context
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create an invalid conversation error
    pub fn invalid_conversation<S: Into<String>>(message: S) -> Self {
        Self::InvalidConversation {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a duplicate tool error
    pub fn duplicate_tool<S: Into<String>>(name: S) -> Self {
        Self::DuplicateTool { name: name.into() }
    }

    /// Create a tool not found error
    pub fn tool_not_found<S: Into<String>>(name: S) -> Self {
        Self::ToolNotFound { name: name.into() }
    }

    /// Create a schema validation error naming the offending field
    pub fn schema_validation<T, F, M>(tool: T, field: F, message: M) -> Self
    where
        T: Into<String>,
        F: Into<String>,
        M: Into<String>,
    {
        Self::SchemaValidation {
            tool: tool.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a tool execution error without a source
    pub fn tool_execution<T: Into<String>, M: Into<String>>(tool: T, message: M) -> Self {
        Self::ToolExecution {
            tool: tool.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wrap any error raised while executing a tool
    pub fn tool_execution_with_source<T, E>(tool: T, source: E) -> Self
    where
        T: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ToolExecution {
            tool: tool.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown session error
    pub fn unknown_session<S: Into<String>>(session_id: S) -> Self {
        Self::UnknownSession {
            session_id: session_id.into(),
        }
    }

    /// Create a connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection error with source
    pub fn connection_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Create an upstream model error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Create an upstream model error with source
    pub fn upstream_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification helpers used at protocol and HTTP boundaries
impl Error {
    /// Stable machine-readable kind, used in protocol error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IoSimple { .. } | Self::Io { .. } => "io",
            Self::Json { .. } => "json",
            Self::InvalidConversation { .. } => "invalid_conversation",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::DuplicateTool { .. } => "duplicate_tool",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::SchemaValidation { .. } => "schema_validation",
            Self::ToolExecution { .. } => "tool_execution",
            Self::UnknownSession { .. } => "unknown_session",
            Self::Connection { .. } => "connection",
            Self::Timeout { .. } => "timeout",
            Self::Protocol { .. } => "protocol",
            Self::Upstream { .. } => "upstream",
            Self::Cancelled { .. } => "cancelled",
            Self::Config { .. } | Self::Configuration { .. } => "configuration",
            Self::Infrastructure { .. } => "infrastructure",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether the error was caused by caller input rather than by the relay
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConversation { .. }
                | Self::InvalidArgument { .. }
                | Self::UnknownSession { .. }
                | Self::ToolNotFound { .. }
                | Self::SchemaValidation { .. }
        )
    }
}
