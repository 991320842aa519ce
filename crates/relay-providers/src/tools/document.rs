//! Document tools: PDF generation and editing

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use relay_domain::constants::{EDITED_PDF_NAME, PDF_MIME_TYPE};
use relay_domain::error::{Error, Result};
use relay_domain::ports::{DocumentRenderer, ToolExecutor};
use relay_domain::value_objects::{
    ContentItem, ParamType, ParameterSchema, ParameterSpec, ToolArguments, ToolResult,
    bytes_from_value,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use super::args::parse_args;
use crate::constants::GENERATED_PDF_DESCRIPTION;

/// Tool name of [`GeneratePdf`]
pub const GENERATE_PDF: &str = "generatePdf";

/// Tool name of [`EditPdf`]
pub const EDIT_PDF: &str = "editPDF";

#[derive(Debug, Deserialize, Validate)]
struct GenerateArgs {
    #[validate(length(min = 1))]
    text: String,
}

/// Renders markdown or plain text into a PDF returned as a `data:` link
pub struct GeneratePdf {
    renderer: Arc<dyn DocumentRenderer>,
}

impl GeneratePdf {
    /// Create the tool over a renderer
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new().param(
            "text",
            ParameterSpec::required(ParamType::String)
                .with_description("Markdown or plain text content")
                .with_min_length(1),
        )
    }
}

#[async_trait]
impl ToolExecutor for GeneratePdf {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: GenerateArgs = parse_args(GENERATE_PDF, arguments)?;
        if args.text.trim().is_empty() {
            return Err(Error::tool_execution(
                GENERATE_PDF,
                "Text input is required to generate a PDF.",
            ));
        }

        let plain = markdown_to_plain_text(&args.text);
        let bytes = self.renderer.render_text(&plain)?;
        if bytes.is_empty() {
            return Err(Error::tool_execution(
                GENERATE_PDF,
                "PDF generation failed. Buffer is invalid.",
            ));
        }
        debug!(bytes = bytes.len(), "PDF generated");

        Ok(ToolResult::new(vec![ContentItem::ResourceLink {
            uri: format!("data:{PDF_MIME_TYPE};base64,{}", BASE64.encode(&bytes)),
            name: format!("{}.pdf", chrono::Utc::now().timestamp_millis()),
            mime_type: PDF_MIME_TYPE.to_string(),
            description: Some(GENERATED_PDF_DESCRIPTION.to_string()),
        }]))
    }
}

#[derive(Debug, Deserialize, Validate)]
struct EditArgs {
    file: Value,
    text: String,
}

/// Stamps text onto the first page of an uploaded PDF
pub struct EditPdf {
    renderer: Arc<dyn DocumentRenderer>,
}

impl EditPdf {
    /// Create the tool over a renderer
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .param(
                "file",
                ParameterSpec::required(ParamType::Bytes).with_description("PDF document"),
            )
            .param(
                "text",
                ParameterSpec::required(ParamType::String).with_description("Text to stamp"),
            )
    }
}

#[async_trait]
impl ToolExecutor for EditPdf {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: EditArgs = parse_args(EDIT_PDF, arguments)?;
        let document = bytes_from_value(&args.file)
            .ok_or_else(|| Error::schema_validation(EDIT_PDF, "file", "expected bytes"))?;

        let edited = self.renderer.stamp_text(&document, &args.text)?;
        debug!(input = document.len(), output = edited.len(), "PDF edited");

        Ok(ToolResult::new(vec![ContentItem::FileData {
            name: EDITED_PDF_NAME.to_string(),
            mime_type: PDF_MIME_TYPE.to_string(),
            data: BASE64.encode(&edited),
        }]))
    }
}

/// Flatten markdown into plain text suitable for a text-only page
///
/// Block elements end with a blank line, list items are bulleted, links
/// keep their target in parentheses and images become `[Image: alt] (src)`.
pub fn markdown_to_plain_text(markdown: &str) -> String {
    let mut out = String::new();
    let mut link_targets: Vec<String> = Vec::new();
    let mut list_depth: usize = 0;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Item) => {
                out.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                out.push_str("• ");
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => link_targets.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(target) = link_targets.pop() {
                    out.push_str(&format!(" ({target})"));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                out.push_str("[Image: ");
                link_targets.push(dest_url.to_string());
            }
            Event::End(TagEnd::Image) => {
                if let Some(target) = link_targets.pop() {
                    out.push_str(&format!("] ({target})"));
                }
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::CodeBlock) => {
                if list_depth == 0 {
                    out.push_str("\n\n");
                } else {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("\n----------\n\n"),
            _ => {}
        }
    }
    out.trim_end().to_string()
}
