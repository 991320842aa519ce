//! Tool result content
//!
//! Serialized with the same `type`-tagged shape the tool protocol uses,
//! so results pass through the relay without reshaping.

use serde::{Deserialize, Serialize};

/// One item of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ContentItem {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Link to a resource, possibly a `data:` URI
    ResourceLink {
        /// Resource URI
        uri: String,
        /// Display name, e.g. a file name
        name: String,
        /// MIME type of the resource
        mime_type: String,
        /// Optional description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Inline file payload
    FileData {
        /// File name
        name: String,
        /// MIME type of the payload
        mime_type: String,
        /// Base64 encoded bytes
        data: String,
    },
}

impl ContentItem {
    /// Text item
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text { text: text.into() }
    }

    /// Text body if this is a text item
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Result of one tool execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Ordered content items
    pub content: Vec<ContentItem>,
    /// Whether the tool reported a failure
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// Successful result with the given items
    pub fn new(content: Vec<ContentItem>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// Successful result with a single text item
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::new(vec![ContentItem::text(text)])
    }

    /// Failed result carrying a description of the failure
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }

    /// All text items joined by newlines
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentItem::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
