//! Tool service configuration

use crate::constants::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use serde::{Deserialize, Serialize};

/// Services behind the built-in tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// `sendEmail`
    pub mail: MailConfig,
    /// `createPost`
    pub social: SocialConfig,
}

/// SMTP settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Relay host
    pub smtp_host: String,
    /// Relay port
    pub smtp_port: u16,
    /// Login user
    pub username: Option<String>,
    /// Login password
    pub password: Option<String>,
    /// `From` header; the username is used when unset
    pub from: Option<String>,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            from: None,
        }
    }
}

impl MailConfig {
    /// Whether credentials are present
    pub fn is_configured(&self) -> bool {
        non_empty(self.username.as_deref()).is_some() && non_empty(self.password.as_deref()).is_some()
    }
}

/// X API settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// User-context bearer token
    pub bearer_token: Option<String>,
    /// API base URL override
    pub api_base: Option<String>,
}

impl std::fmt::Debug for SocialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialConfig")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SocialConfig {
    /// Bearer token, if non-empty
    pub fn bearer_token(&self) -> Option<&str> {
        non_empty(self.bearer_token.as_deref())
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
