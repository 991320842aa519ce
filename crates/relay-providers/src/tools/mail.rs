//! Email tool
//!
//! Delivery failures, an unusable recipient address included, are reported
//! as text content rather than as an error, so the caller always sees what
//! happened to the message.

use async_trait::async_trait;
use relay_domain::error::Result;
use relay_domain::ports::{MailTransport, OutgoingEmail, ToolExecutor};
use relay_domain::value_objects::{
    ParamType, ParameterSchema, ParameterSpec, ToolArguments, ToolResult,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::args::decode_args;

/// Tool name of [`SendEmail`]
pub const SEND_EMAIL: &str = "sendEmail";

#[derive(Debug, Deserialize, Validate)]
struct EmailArgs {
    #[validate(email)]
    to: String,
    subject: String,
    text: String,
}

/// Sends an email through the configured transport
pub struct SendEmail {
    transport: Arc<dyn MailTransport>,
}

impl SendEmail {
    /// Create the tool over a mail transport
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .param(
                "to",
                ParameterSpec::required(ParamType::String).with_description("Recipient address"),
            )
            .param("subject", ParameterSpec::required(ParamType::String))
            .param("text", ParameterSpec::required(ParamType::String))
    }
}

/// HTML body wrapping the plain text message
pub fn html_body(text: &str) -> String {
    format!(
        "<h3>Agent Status: ✅</h3><p>Your system is alive and kicking. 🔥</p>\n<p>Message: {}</p>",
        escape_html(text)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[async_trait]
impl ToolExecutor for SendEmail {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: EmailArgs = decode_args(SEND_EMAIL, arguments)?;
        if args.validate().is_err() {
            warn!(to = %args.to, "Rejected recipient address");
            return Ok(ToolResult::text(format!(
                "❌ Failed to send email: invalid recipient address '{}'",
                args.to
            )));
        }
        let email = OutgoingEmail {
            html: html_body(&args.text),
            to: args.to.clone(),
            subject: args.subject.clone(),
            text: args.text,
        };

        match self.transport.send(email).await {
            Ok(()) => {
                info!(to = %args.to, "Email sent");
                Ok(ToolResult::text(format!(
                    "📬 Email sent to {} with subject \"{}\"",
                    args.to, args.subject
                )))
            }
            Err(err) => {
                warn!(to = %args.to, error = %err, "Email failed");
                Ok(ToolResult::text(format!("❌ Failed to send email: {err}")))
            }
        }
    }
}
