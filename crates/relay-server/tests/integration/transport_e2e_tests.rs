//! End-to-end tests over a real listening port

use crate::test_utils::{
    SLOW_ECHO, ScriptedModel, base_url, builtin_registry, get_free_port, in_process_server,
    launch, registry_with_slow_echo,
};
use relay_domain::error::Error;
use relay_domain::value_objects::ToolArguments;
use relay_server::{RelayServerBuilder, RelayToolClient, ToolClient, ToolClientConfig};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn client_config(port: u16, call_timeout: Duration) -> ToolClientConfig {
    ToolClientConfig {
        server_url: base_url(port),
        handshake_timeout: Duration::from_secs(5),
        call_timeout,
    }
}

fn args(value: Value) -> ToolArguments {
    match value {
        Value::Object(map) => map,
        _ => ToolArguments::new(),
    }
}

async fn connect(port: u16, call_timeout: Duration) -> ToolClient {
    ToolClient::connect(client_config(port, call_timeout), reqwest::Client::new())
        .await
        .expect("connect tool client")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_listing_over_transport_matches_registry() {
    let registry = builtin_registry();
    let server = in_process_server(Arc::clone(&registry), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    assert!(client.session_id().is_some());

    let listed = client.list_tools().await.expect("list tools");
    assert_eq!(listed, registry.list().to_vec());

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_call_over_transport_returns_sum() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    let result = client
        .call_tool("addTwoNumbers", args(json!({"a": 2, "b": 3})))
        .await
        .expect("call");

    assert!(!result.is_error);
    assert_eq!(result.joined_text(), "Sum is 5");
    assert_eq!(client.pending_calls(), 0);

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_tool_over_transport() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    let err = client
        .call_tool("doesNotExist", ToolArguments::new())
        .await
        .expect_err("unknown tool");

    assert!(matches!(err, Error::ToolNotFound { ref name } if name == "doesNotExist"));

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_arguments_over_transport_never_execute() {
    let (registry, slow) = registry_with_slow_echo(Duration::ZERO);
    let server = in_process_server(registry, ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    let err = client
        .call_tool(SLOW_ECHO, ToolArguments::new())
        .await
        .expect_err("missing field");

    assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "text"));
    assert_eq!(slow.executions(), 0);

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_height_over_transport_is_schema_error() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    let err = client
        .call_tool("calculate-bmi", args(json!({"weightKg": 70, "heightM": 0})))
        .await
        .expect_err("zero height");

    assert!(matches!(
        err,
        Error::SchemaValidation { ref tool, ref field, .. } if tool == "calculate-bmi" && field == "heightM"
    ));
    assert_eq!(client.pending_calls(), 0);

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tool_failure_over_transport() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(5)).await;
    let err = client
        .call_tool("createPost", args(json!({"status": "hello"})))
        .await
        .expect_err("publisher disabled");

    assert!(matches!(err, Error::ToolExecution { ref tool, .. } if tool == "createPost"));

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_call_times_out_and_late_reply_is_discarded() {
    let (registry, slow) = registry_with_slow_echo(Duration::from_millis(600));
    let server = in_process_server(registry, ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_millis(150)).await;
    let err = client
        .call_tool(SLOW_ECHO, args(json!({"text": "late"})))
        .await
        .expect_err("timeout");

    assert!(matches!(err, Error::Timeout { .. }));
    assert_eq!(client.pending_calls(), 0);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(slow.executions(), 1);
    assert!(!client.is_closed());

    let result = client
        .call_tool("addTwoNumbers", args(json!({"a": 1, "b": 1})))
        .await
        .expect("session still usable");
    assert_eq!(result.joined_text(), "Sum is 2");

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closed_client_fails_fast_without_pending_entries() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let client = connect(port, Duration::from_secs(30)).await;
    client.close();
    let err = tokio::time::timeout(
        Duration::from_secs(2),
        client.call_tool("addTwoNumbers", args(json!({"a": 1, "b": 2}))),
    )
    .await
    .expect("closed client answers without waiting for the call timeout")
    .expect_err("closed");

    assert_eq!(err.kind(), "connection");
    assert!(client.is_closed());
    assert_eq!(client.pending_calls(), 0);

    shutdown.notify();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sessions_are_isolated() {
    let server = in_process_server(builtin_registry(), ScriptedModel::text("unused"));
    let port = get_free_port();
    let shutdown = launch(&server, port).await;

    let first = connect(port, Duration::from_secs(5)).await;
    let second = connect(port, Duration::from_secs(5)).await;
    assert_ne!(first.session_id(), second.session_id());
    assert_eq!(server.tool_server().sessions().session_count(), 2);

    let (a, b) = tokio::join!(
        first.call_tool("addTwoNumbers", args(json!({"a": 10, "b": 1}))),
        second.call_tool("addTwoNumbers", args(json!({"a": 20, "b": 2}))),
    );

    assert_eq!(a.expect("first").joined_text(), "Sum is 11");
    assert_eq!(b.expect("second").joined_text(), "Sum is 22");

    shutdown.notify();
}

#[tokio::test]
async fn test_handshake_against_closed_port_fails() {
    let port = get_free_port();

    let err = ToolClient::connect(
        client_config(port, Duration::from_secs(1)),
        reqwest::Client::new(),
    )
    .await
    .expect_err("nothing listening");

    assert!(matches!(err, Error::Connection { .. }));
}

#[tokio::test]
async fn test_relay_client_gives_up_after_bounded_attempts() {
    let port = get_free_port();
    let relay = RelayToolClient::new(
        client_config(port, Duration::from_secs(1)),
        reqwest::Client::new(),
        2,
    );

    let err = relay.connect().await.expect_err("nothing listening");

    assert!(matches!(err, Error::Connection { .. }));
    assert!(!relay.is_connected());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_chat_generates_pdf_through_transport() {
    let port = get_free_port();
    let tool_client = Arc::new(RelayToolClient::new(
        client_config(port, Duration::from_secs(10)),
        reqwest::Client::new(),
        3,
    ));
    let model =
        ScriptedModel::function_call("generatePdf", json!({"text": "# Invoice\n\nTotal: 42"}));
    let server = RelayServerBuilder::new()
        .with_registry(builtin_registry())
        .with_model(model.clone())
        .with_tool_client(Arc::clone(&tool_client))
        .build()
        .expect("relay server");
    let shutdown = launch(&server, port).await;

    let response = reqwest::Client::new()
        .post(format!("{}/chat", base_url(port)))
        .json(&json!({
            "messages": [{"role": "user", "parts": [{"text": "make me an invoice pdf"}]}]
        }))
        .send()
        .await
        .expect("chat request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.expect("json body");
    let item = &body["data"][0];
    assert_eq!(item["type"], "resource_link");
    assert!(item["uri"].as_str().is_some_and(|uri| !uri.is_empty()));
    assert!(item["name"].as_str().is_some_and(|name| name.ends_with(".pdf")));
    assert_eq!(model.calls(), 1);
    assert!(tool_client.is_connected());

    shutdown.notify();
}
