//! Server Initialization
//!
//! Loads configuration, installs logging, wires the components and launches
//! Rocket. The model bridge reaches the tools through a tool client
//! connected to this process's own SSE transport, or to the tool server
//! named by `client.server_url`.

use std::path::Path;
use std::sync::Arc;

use relay_infrastructure::bootstrap::http_client;
use relay_infrastructure::config::loader::validate_app_config;
use relay_infrastructure::logging::init_logging;
use relay_infrastructure::{AppConfig, ConfigLoader, RelayComponents};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::builder::RelayServerBuilder;
use crate::transport::{RelayToolClient, ToolClientConfig};

/// Run the relay server until it is shut down
///
/// `port` overrides the configured listen port.
pub async fn run_server(
    config_path: Option<&Path>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, port)?;
    init_logging(&config.logging)?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        provider = ?config.model.provider,
        "Starting tool relay"
    );

    let host = config.server.host.clone();
    let listen_port = config.server.port;
    let components = RelayComponents::build(config)?;
    let tool_client = Arc::new(create_tool_client(&components.config)?);
    info!(server = %tool_client.server_url(), "Tool client target");

    let server = RelayServerBuilder::new()
        .with_registry(Arc::clone(&components.registry))
        .with_model(Arc::clone(&components.model))
        .with_tool_client(tool_client)
        .with_bridge_settings(components.bridge_settings.clone())
        .with_cors_origin(components.config.server.cors_origin.clone())
        .with_shutdown_token(CancellationToken::new())
        .build()?;

    let figment = rocket::Config::figment()
        .merge(("address", host))
        .merge(("port", listen_port));

    server.rocket_with(figment).launch().await?;
    info!("Tool relay stopped");
    Ok(())
}

/// Load configuration from optional path
fn load_config(
    config_path: Option<&Path>,
    port: Option<u16>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;
    if let Some(port) = port {
        config.server.port = port;
        validate_app_config(&config)?;
    }
    Ok(config)
}

/// Tool client for the model bridge
pub fn create_tool_client(config: &AppConfig) -> relay_domain::error::Result<RelayToolClient> {
    let server_url = config
        .client
        .server_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.server.local_url());
    let http = http_client()?;

    Ok(RelayToolClient::new(
        ToolClientConfig {
            server_url,
            handshake_timeout: config.client.handshake_timeout(),
            call_timeout: config.client.call_timeout(),
        },
        http,
        config.client.max_reconnect_attempts,
    ))
}
