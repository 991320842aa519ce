//! Domain layer constants
//!
//! Caller-visible messages and fixed identifiers shared by every layer.

// ============================================================================
// CONVERSATION CONSTANTS
// ============================================================================

/// Error shown when `messages` is not an array
pub const INVALID_MESSAGES_FORMAT: &str = "Invalid messages format";

/// Error shown when sanitization leaves no turns
pub const NO_VALID_MESSAGE_PARTS: &str = "No valid message parts found.";

// ============================================================================
// DOCUMENT CONSTANTS
// ============================================================================

/// MIME type of generated and edited documents
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// File name returned by the document edit tool
pub const EDITED_PDF_NAME: &str = "edited.pdf";
