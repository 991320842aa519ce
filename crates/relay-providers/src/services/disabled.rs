//! Placeholders for side-effect services that are not configured
//!
//! The tools stay registered and listable; calling them reports which
//! setting is missing.

use async_trait::async_trait;
use relay_domain::error::{Error, Result};
use relay_domain::ports::{MailTransport, OutgoingEmail, PublishedPost, SocialPublisher};

/// Mail transport used when no SMTP credentials are configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl MailTransport for DisabledMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<()> {
        Err(Error::tool_execution(
            "sendEmail",
            "mail transport is not configured (set tools.mail.username and tools.mail.password)",
        ))
    }
}

/// Publisher used when no X bearer token is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPublisher;

#[async_trait]
impl SocialPublisher for DisabledPublisher {
    async fn publish(&self, _status: &str) -> Result<PublishedPost> {
        Err(Error::tool_execution(
            "createPost",
            "social publisher is not configured (set tools.social.bearer_token)",
        ))
    }
}
