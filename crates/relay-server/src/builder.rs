//! Relay Server Builder
//!
//! Builder pattern for assembling the relay's Rocket application.
//! Ensures all required dependencies are provided before construction.

use std::sync::Arc;

use relay_application::{BridgeSettings, ModelBridge, ToolRegistry};
use relay_domain::ports::{LanguageModel, ToolInvoker};
use relay_infrastructure::constants::DEFAULT_CORS_ORIGIN;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket, catchers, routes};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::constants::{MAX_MESSAGE_BYTES, MAX_UPLOAD_BYTES};
use crate::handlers::{ChatState, HealthState, UploadState, chat, error, health, upload};
use crate::session::{SessionTransportManager, create_session_manager};
use crate::tool_server::ToolServer;
use crate::transport::RelayToolClient;
use crate::transport::http::{Cors, TransportState, handle_message, handle_sse, preflight};

/// Builder for [`RelayServer`]
pub struct RelayServerBuilder {
    registry: Option<Arc<ToolRegistry>>,
    model: Option<Arc<dyn LanguageModel>>,
    tool_client: Option<Arc<RelayToolClient>>,
    tool_invoker: Option<Arc<dyn ToolInvoker>>,
    sessions: Option<Arc<SessionTransportManager>>,
    bridge_settings: BridgeSettings,
    cors_origin: String,
    shutdown: CancellationToken,
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self {
            registry: None,
            model: None,
            tool_client: None,
            tool_invoker: None,
            sessions: None,
            bridge_settings: BridgeSettings::default(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            shutdown: CancellationToken::new(),
        }
    }
}

impl RelayServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tool registry served over the transport
    pub fn with_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the language model behind `/chat`
    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Route bridge tool calls through a transport client
    ///
    /// The client is connected at liftoff and dropped at shutdown.
    pub fn with_tool_client(mut self, client: Arc<RelayToolClient>) -> Self {
        self.tool_client = Some(client);
        self
    }

    /// Route bridge tool calls through any invoker
    ///
    /// Ignored when a tool client is set.
    pub fn with_tool_invoker(mut self, invoker: Arc<dyn ToolInvoker>) -> Self {
        self.tool_invoker = Some(invoker);
        self
    }

    /// Share an existing session table
    pub fn with_sessions(mut self, sessions: Arc<SessionTransportManager>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Set the bridge tunables
    pub fn with_bridge_settings(mut self, settings: BridgeSettings) -> Self {
        self.bridge_settings = settings;
        self
    }

    /// Set the browser origin allowed by CORS
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }

    /// Token cancelled when the server shuts down
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Build the relay server
    ///
    /// # Errors
    /// Returns `BuilderError::MissingDependency` if the registry, the model
    /// or a tool client is not provided
    pub fn build(self) -> Result<RelayServer, BuilderError> {
        let registry = self
            .registry
            .ok_or(BuilderError::MissingDependency("tool registry"))?;
        let model = self
            .model
            .ok_or(BuilderError::MissingDependency("language model"))?;
        let invoker: Arc<dyn ToolInvoker> = match (&self.tool_client, self.tool_invoker) {
            (Some(client), _) => Arc::clone(client) as Arc<dyn ToolInvoker>,
            (None, Some(invoker)) => invoker,
            (None, None) => return Err(BuilderError::MissingDependency("tool client")),
        };

        let sessions = self.sessions.unwrap_or_else(create_session_manager);
        let tool_server = Arc::new(ToolServer::new(Arc::clone(&registry), sessions));
        let bridge = Arc::new(ModelBridge::new(model, invoker, self.bridge_settings));

        Ok(RelayServer {
            tool_server,
            bridge,
            registry,
            tool_client: self.tool_client,
            cors_origin: self.cors_origin,
            shutdown: self.shutdown,
        })
    }
}

/// Assembled relay: tool server, model bridge and HTTP surface
pub struct RelayServer {
    tool_server: Arc<ToolServer>,
    bridge: Arc<ModelBridge>,
    registry: Arc<ToolRegistry>,
    tool_client: Option<Arc<RelayToolClient>>,
    cors_origin: String,
    shutdown: CancellationToken,
}

impl RelayServer {
    /// Tool server behind `/sse` and `/messages`
    pub fn tool_server(&self) -> &Arc<ToolServer> {
        &self.tool_server
    }

    /// Bridge behind `/chat`
    pub fn bridge(&self) -> &Arc<ModelBridge> {
        &self.bridge
    }

    /// Token cancelled at shutdown
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Rocket application with Rocket's default configuration sources
    pub fn rocket(&self) -> Rocket<Build> {
        self.rocket_with(rocket::Config::figment())
    }

    /// Rocket application over the given figment
    ///
    /// Body limits are raised to fit base64 encoded PDFs.
    pub fn rocket_with(&self, figment: Figment) -> Rocket<Build> {
        let limits = Limits::default()
            .limit("string", MAX_MESSAGE_BYTES.bytes())
            .limit("json", MAX_UPLOAD_BYTES.bytes())
            .limit("file", MAX_UPLOAD_BYTES.bytes())
            .limit("data-form", MAX_UPLOAD_BYTES.bytes());

        let mut rocket = rocket::custom(figment.merge(("limits", limits)))
            .manage(TransportState {
                server: Arc::clone(&self.tool_server),
            })
            .manage(ChatState {
                bridge: Arc::clone(&self.bridge),
                shutdown: self.shutdown.clone(),
            })
            .manage(UploadState {
                registry: Arc::clone(&self.registry),
            })
            .manage(HealthState {
                server: Arc::clone(&self.tool_server),
                tool_client: self.tool_client.clone(),
            })
            .mount("/", routes![handle_sse, handle_message, preflight])
            .mount("/", routes![chat::chat, upload::upload_pdf, health::health])
            .register("/", catchers![error::default_catcher])
            .attach(Cors::new(self.cors_origin.clone()));

        if let Some(client) = self.tool_client.clone() {
            rocket = rocket.attach(AdHoc::on_liftoff("Tool client connect", |_| {
                Box::pin(async move {
                    tokio::spawn(async move {
                        if let Err(e) = client.connect().await {
                            warn!(error = %e, "Tool client not connected at startup");
                        }
                    });
                })
            }));
        }

        let shutdown = self.shutdown.clone();
        let sessions = Arc::clone(self.tool_server.sessions());
        let tool_client = self.tool_client.clone();
        rocket.attach(AdHoc::on_shutdown("Relay shutdown", |_| {
            Box::pin(async move {
                info!("Shutting down relay");
                shutdown.cancel();
                if let Some(client) = tool_client {
                    client.disconnect();
                }
                sessions.close_all();
            })
        }))
    }
}

/// Errors that can occur during server building
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// A required dependency was not provided
    #[error("Missing required dependency: {0}")]
    MissingDependency(&'static str),
}
