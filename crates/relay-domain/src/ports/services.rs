//! Side-effect ports used by the built-in tools
//!
//! The tools only decide what to do; delivery, publishing and rendering
//! happen behind these traits.

use crate::error::Result;
use async_trait::async_trait;

/// A message ready to be delivered by a mail transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text: String,
    /// HTML body
    pub html: String,
}

/// Delivers email
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one message
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// A post accepted by the social network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    /// Identifier assigned by the network
    pub id: String,
    /// Text that was published
    pub text: String,
}

/// Publishes short status updates
#[async_trait]
pub trait SocialPublisher: Send + Sync {
    /// Publish a status update
    async fn publish(&self, status: &str) -> Result<PublishedPost>;
}

/// Produces and edits PDF documents
pub trait DocumentRenderer: Send + Sync {
    /// Render plain text into a new single-page document
    fn render_text(&self, text: &str) -> Result<Vec<u8>>;

    /// Stamp text onto the first page of an existing document
    fn stamp_text(&self, document: &[u8], text: &str) -> Result<Vec<u8>>;
}
