//! Component wiring
//!
//! Builds the tool registry, the tool services and the language model from
//! an [`AppConfig`]. The HTTP surface and the tool client are assembled by
//! the server crate on top of these parts.

use std::sync::Arc;
use std::time::Duration;

use relay_application::{BridgeSettings, ToolRegistry};
use relay_domain::error::Result;
use relay_domain::ports::{LanguageModel, MailTransport, SocialPublisher};
use relay_providers::services::{
    DisabledMailer, DisabledPublisher, LopdfRenderer, SmtpMailer, SmtpSettings, XPublisher,
};
use relay_providers::tools::{ToolServices, builtin_tools};
use relay_providers::{GeminiConfig, GeminiModel, NullModel};
use tracing::{info, warn};

use crate::config::types::tools::non_empty;
use crate::config::{AppConfig, MailConfig, ModelConfig, ModelProvider, SocialConfig};
use crate::constants::DEFAULT_SOCIAL_TIMEOUT_SECS;
use crate::error_ext::ErrorContext;

/// Everything the server needs besides its own transport
pub struct RelayComponents {
    /// Loaded configuration
    pub config: AppConfig,
    /// Registry populated with the built-in tools
    pub registry: Arc<ToolRegistry>,
    /// Upstream model
    pub model: Arc<dyn LanguageModel>,
    /// Bridge tunables
    pub bridge_settings: BridgeSettings,
}

impl RelayComponents {
    /// Wire all components from configuration
    pub fn build(config: AppConfig) -> Result<Self> {
        let http = http_client()?;
        let services = build_tool_services(&config, &http)?;
        let registry = build_registry(&services)?;
        let model = build_model(&config.model, http)?;
        let bridge_settings = BridgeSettings::from(&config.bridge);
        Ok(Self {
            config,
            registry,
            model,
            bridge_settings,
        })
    }
}

/// Shared HTTP client for upstream APIs
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("tool-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .connection_context("Failed to build HTTP client")
}

/// Side-effect services for the built-in tools
///
/// Unconfigured services are replaced by placeholders that fail with a
/// descriptive message when used.
pub fn build_tool_services(config: &AppConfig, http: &reqwest::Client) -> Result<ToolServices> {
    Ok(ToolServices {
        mail: build_mailer(&config.tools.mail)?,
        social: build_publisher(&config.tools.social, http),
        documents: Arc::new(LopdfRenderer::new()),
    })
}

fn build_mailer(config: &MailConfig) -> Result<Arc<dyn MailTransport>> {
    let (Some(username), Some(password)) = (
        non_empty(config.username.as_deref()),
        non_empty(config.password.as_deref()),
    ) else {
        warn!("SMTP credentials not set; sendEmail will report failures");
        return Ok(Arc::new(DisabledMailer));
    };

    let from = non_empty(config.from.as_deref()).unwrap_or(username);
    let mailer = SmtpMailer::new(SmtpSettings {
        host: config.smtp_host.clone(),
        port: config.smtp_port,
        username: username.to_string(),
        password: password.to_string(),
        from: from.to_string(),
    })?;
    info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport configured");
    Ok(Arc::new(mailer))
}

fn build_publisher(config: &SocialConfig, http: &reqwest::Client) -> Arc<dyn SocialPublisher> {
    match config.bearer_token() {
        Some(token) => {
            info!("X publisher configured");
            Arc::new(XPublisher::new(
                token.to_string(),
                config.api_base.clone(),
                Duration::from_secs(DEFAULT_SOCIAL_TIMEOUT_SECS),
                http.clone(),
            ))
        }
        None => {
            warn!("X bearer token not set; createPost will report failures");
            Arc::new(DisabledPublisher)
        }
    }
}

/// Registry holding every built-in tool
pub fn build_registry(services: &ToolServices) -> Result<Arc<ToolRegistry>> {
    let registry = ToolRegistry::new();
    for tool in builtin_tools(services) {
        registry.register(tool.name, tool.description, tool.schema, tool.executor)?;
    }
    info!(tools = registry.len(), "Tool registry ready");
    Ok(Arc::new(registry))
}

/// Language model selected by configuration
pub fn build_model(config: &ModelConfig, http: reqwest::Client) -> Result<Arc<dyn LanguageModel>> {
    match config.provider {
        ModelProvider::Gemini => {
            let settings = GeminiConfig::new(config.api_key().unwrap_or_default())
                .with_base_url(&config.base_url)
                .with_model(&config.model)
                .with_timeout(config.timeout())
                .with_temperature(config.temperature)
                .with_max_output_tokens(config.max_output_tokens);
            let model = GeminiModel::new(settings, http)?;
            info!(model = %config.model, "Gemini model configured");
            Ok(Arc::new(model))
        }
        ModelProvider::Null => {
            warn!("No language model configured; /chat will answer with the no-response marker");
            Ok(Arc::new(NullModel::new()))
        }
    }
}
