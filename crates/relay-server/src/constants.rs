//! Server-specific constants
//!
//! JSON-RPC error codes, SSE transport names and HTTP limits.

use std::time::Duration;

// ============================================================================
// JSON-RPC ERROR CODES (Standard)
// ============================================================================

/// JSON-RPC Method not found error code
pub const JSONRPC_METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC Invalid params error code
pub const JSONRPC_INVALID_PARAMS: i64 = -32602;

/// JSON-RPC Internal error code
pub const JSONRPC_INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// SSE TRANSPORT
// ============================================================================

/// Path of the long-lived event stream
pub const SSE_PATH: &str = "/sse";

/// Path clients post call messages to
pub const MESSAGES_PATH: &str = "/messages";

/// Query parameter carrying the session id
pub const SESSION_QUERY_PARAM: &str = "sessionId";

/// First event on every stream, carrying the message endpoint
pub const ENDPOINT_EVENT: &str = "endpoint";

/// Event name of JSON-RPC frames
pub const MESSAGE_EVENT: &str = "message";

/// Body of the `/messages` success response
pub const ACCEPTED_BODY: &str = "Accepted";

/// Queued inbound messages per session before senders wait
pub const SESSION_INBOX_CAPACITY: usize = 64;

/// Queued outbound frames per session before the worker waits
pub const SESSION_OUTBOX_CAPACITY: usize = 64;

/// Name the tool server reports in its handshake
pub const SERVER_NAME: &str = "tool-relay";

/// Name the tool client reports in its handshake
pub const CLIENT_NAME: &str = "relay-client";

/// Pause between tool client reconnect attempts
pub const RECONNECT_DELAY: Duration = Duration::from_millis(250);

// ============================================================================
// HTTP LIMITS
// ============================================================================

/// Largest accepted `/messages` body
pub const MAX_MESSAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Largest accepted JSON or form body, sized for base64 PDFs
pub const MAX_UPLOAD_BYTES: u64 = 32 * 1024 * 1024;

/// Text stamped on uploads that do not supply their own
pub const DEFAULT_UPLOAD_STAMP: &str = "Injected from upload 🚀";
