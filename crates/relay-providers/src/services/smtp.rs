//! SMTP mail transport

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use relay_domain::error::{Error, Result};
use relay_domain::ports::{MailTransport, OutgoingEmail};
use tracing::debug;

/// SMTP connection settings
#[derive(Clone)]
pub struct SmtpSettings {
    /// Relay host, e.g. `smtp.gmail.com`
    pub host: String,
    /// Submission port
    pub port: u16,
    /// Login user
    pub username: String,
    /// Login password
    pub password: String,
    /// `From` header, e.g. `Relay Agent <agent@example.com>`
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Mail transport over authenticated SMTP with STARTTLS/TLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer; connections are opened lazily on first send
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| Error::configuration_with_source("Invalid mail sender address", e))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|e| Error::configuration_with_source("Invalid SMTP relay", e))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| Error::tool_execution_with_source("sendEmail", e))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| Error::tool_execution_with_source("sendEmail", e))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| Error::tool_execution_with_source("sendEmail", e))?;
        debug!(code = %response.code(), "SMTP accepted message");
        Ok(())
    }
}
