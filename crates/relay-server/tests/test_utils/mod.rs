//! Shared fixtures for relay-server tests

#![allow(dead_code)]

use async_trait::async_trait;
use relay_application::ToolRegistry;
use relay_domain::error::Result;
use relay_domain::ports::{LanguageModel, ToolExecutor};
use relay_domain::value_objects::{
    FunctionCall, ModelRequest, ModelResponse, ParamType, ParameterSchema, ParameterSpec, Part,
    ToolArguments, ToolResult,
};
use relay_infrastructure::bootstrap::build_registry;
use relay_providers::services::{DisabledMailer, DisabledPublisher, LopdfRenderer};
use relay_providers::tools::ToolServices;
use relay_server::{RelayServer, RelayServerBuilder};
use rocket::Shutdown;
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Name of the test-only slow tool
pub const SLOW_ECHO: &str = "slowEcho";

/// Model that replays queued responses and counts calls
pub struct ScriptedModel {
    responses: Mutex<VecDeque<ModelResponse>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ModelResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::new(vec![ModelResponse::single(vec![Part::Text(text.into())])])
    }

    pub fn function_call(name: &str, args: serde_json::Value) -> Arc<Self> {
        let args = match args {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self::new(vec![ModelResponse::single(vec![Part::FunctionCall(
            FunctionCall {
                name: name.into(),
                args,
            },
        )])])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, _request: ModelRequest) -> Result<ModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Tool that waits before echoing its `text` argument, counting executions
pub struct SlowEcho {
    delay: Duration,
    executions: AtomicUsize,
}

impl SlowEcho {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            executions: AtomicUsize::new(0),
        })
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    pub fn schema() -> ParameterSchema {
        ParameterSchema::new().param("text", ParameterSpec::required(ParamType::String))
    }
}

#[async_trait]
impl ToolExecutor for SlowEcho {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let text = arguments
            .get("text")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        Ok(ToolResult::text(format!("echo: {text}")))
    }
}

/// Registry with the built-in tools backed by offline services
pub fn builtin_registry() -> Arc<ToolRegistry> {
    let services = ToolServices {
        mail: Arc::new(DisabledMailer),
        social: Arc::new(DisabledPublisher),
        documents: Arc::new(LopdfRenderer::new()),
    };
    build_registry(&services).expect("built-in registry")
}

/// Built-in registry plus the slow echo tool
pub fn registry_with_slow_echo(delay: Duration) -> (Arc<ToolRegistry>, Arc<SlowEcho>) {
    let registry = builtin_registry();
    let slow = SlowEcho::new(delay);
    registry
        .register(SLOW_ECHO, "Echo text after a delay", SlowEcho::schema(), slow.clone())
        .expect("register slow echo");
    (registry, slow)
}

/// Server whose bridge calls the registry in process
pub fn in_process_server(registry: Arc<ToolRegistry>, model: Arc<ScriptedModel>) -> RelayServer {
    RelayServerBuilder::new()
        .with_registry(Arc::clone(&registry))
        .with_model(model)
        .with_tool_invoker(registry)
        .build()
        .expect("relay server")
}

/// Get a free port for testing
pub fn get_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to port 0");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();
    drop(listener);
    port
}

/// Launch a server on a free loopback port and wait until it accepts
pub async fn launch(server: &RelayServer, port: u16) -> Shutdown {
    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port))
        .merge(("log_level", "off"));
    let rocket = server
        .rocket_with(figment)
        .ignite()
        .await
        .expect("ignite rocket");
    let shutdown = rocket.shutdown();
    tokio::spawn(rocket.launch());

    for _ in 0..100 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return shutdown;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on port {port} did not start");
}

/// Base URL of a launched server
pub fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{port}")
}
