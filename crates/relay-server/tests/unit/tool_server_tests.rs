//! Tool server dispatch tests

use crate::test_utils::{SLOW_ECHO, builtin_registry, registry_with_slow_echo};
use relay_domain::error::Error;
use relay_server::ToolServer;
use relay_server::constants::{JSONRPC_INVALID_PARAMS, JSONRPC_METHOD_NOT_FOUND};
use relay_server::session::create_session_manager;
use relay_server::tool_server::to_protocol_tool;
use relay_server::transport::JsonRpcRequest;
use relay_server::transport::client::from_protocol_tool;
use serde_json::{Value, json};
use std::time::Duration;

fn server() -> ToolServer {
    ToolServer::new(builtin_registry(), create_session_manager())
}

fn call(id: u64, name: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(
        id,
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    )
}

#[tokio::test]
async fn test_initialize_reports_tools_capability() {
    let response = server()
        .handle(JsonRpcRequest::new(1, "initialize", Some(json!({}))))
        .await
        .expect("reply");
    let result = response.result.expect("result");

    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "tool-relay");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_ping_returns_empty_object() {
    let response = server()
        .handle(JsonRpcRequest::new(2, "ping", None))
        .await
        .expect("reply");
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn test_list_returns_tools_in_registration_order() {
    let response = server()
        .handle(JsonRpcRequest::new(3, "tools/list", Some(json!({}))))
        .await
        .expect("reply");
    let result = response.result.expect("result");
    let names: Vec<&str> = result["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();

    assert_eq!(
        names,
        vec!["addTwoNumbers", "calculate-bmi", "createPost", "sendEmail", "generatePdf", "editPDF"]
    );
    let add = &result["tools"][0];
    assert_eq!(add["inputSchema"]["type"], "object");
    assert_eq!(add["inputSchema"]["required"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_call_returns_tool_content() {
    let response = server()
        .handle(call(4, "addTwoNumbers", json!({"a": 2, "b": 3})))
        .await
        .expect("reply");

    assert_eq!(response.id, Some(json!(4)));
    assert_eq!(
        response.result,
        Some(json!({"content": [{"type": "text", "text": "Sum is 5"}], "isError": false}))
    );
}

#[tokio::test]
async fn test_call_unknown_tool_is_tagged() {
    let response = server()
        .handle(call(5, "doesNotExist", json!({})))
        .await
        .expect("reply");
    let error = response.error.expect("error");

    assert_eq!(error.code, JSONRPC_INVALID_PARAMS);
    let data = error.data.expect("data");
    assert_eq!(data["kind"], "tool_not_found");
    assert_eq!(data["tool"], "doesNotExist");
}

#[tokio::test]
async fn test_call_with_missing_field_never_executes() {
    let (registry, slow) = registry_with_slow_echo(Duration::ZERO);
    let server = ToolServer::new(registry, create_session_manager());

    let response = server
        .handle(call(6, SLOW_ECHO, json!({})))
        .await
        .expect("reply");
    let error = response.error.expect("error");

    assert_eq!(error.code, JSONRPC_INVALID_PARAMS);
    let data = error.data.expect("data");
    assert_eq!(data["kind"], "schema_validation");
    assert_eq!(data["field"], "text");
    assert_eq!(slow.executions(), 0);
}

#[tokio::test]
async fn test_call_with_zero_height_is_schema_error() {
    let response = server()
        .handle(call(16, "calculate-bmi", json!({"weightKg": 70, "heightM": 0})))
        .await
        .expect("reply");
    let error = response.error.expect("error");

    assert_eq!(error.code, JSONRPC_INVALID_PARAMS);
    let data = error.data.expect("data");
    assert_eq!(data["kind"], "schema_validation");
    assert_eq!(data["tool"], "calculate-bmi");
    assert_eq!(data["field"], "heightM");
}

#[tokio::test]
async fn test_send_email_bad_address_is_plain_content() {
    let response = server()
        .handle(call(17, "sendEmail", json!({"to": "nobody", "subject": "Hi", "text": "x"})))
        .await
        .expect("reply");
    let result = response.result.expect("result");

    assert_ne!(result["isError"], true);
    assert!(
        result["content"][0]["text"]
            .as_str()
            .is_some_and(|t| t.starts_with("❌ Failed to send email"))
    );
}

#[tokio::test]
async fn test_tool_failure_becomes_error_result() {
    let response = server()
        .handle(call(7, "createPost", json!({"status": "hello"})))
        .await
        .expect("reply");
    let result = response.result.expect("result");

    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_call_without_name_is_invalid_params() {
    let response = server()
        .handle(JsonRpcRequest::new(8, "tools/call", Some(json!({}))))
        .await
        .expect("reply");
    assert_eq!(response.error.expect("error").code, JSONRPC_INVALID_PARAMS);
}

#[tokio::test]
async fn test_unknown_method() {
    let response = server()
        .handle(JsonRpcRequest::new(9, "resources/list", None))
        .await
        .expect("reply");
    assert_eq!(response.error.expect("error").code, JSONRPC_METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let reply = server()
        .handle(JsonRpcRequest::notification("notifications/initialized", None))
        .await;
    assert!(reply.is_none());
}

#[tokio::test]
async fn test_accept_rejects_unknown_session_before_parsing() {
    let err = server()
        .accept_call_message("nope", "not json")
        .await
        .expect_err("unknown session");
    assert!(matches!(err, Error::UnknownSession { .. }));
}

#[tokio::test]
async fn test_accept_rejects_malformed_message() {
    let server = server();
    let connection = server.accept_connection();

    let err = server
        .accept_call_message(connection.session_id(), "{not json")
        .await
        .expect_err("malformed");
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_connection_replies_in_order() {
    let server = server();
    let mut connection = server.accept_connection();
    assert!(connection.endpoint().starts_with("/messages?sessionId="));

    for id in 1..=3 {
        let payload = serde_json::to_string(&call(id, "addTwoNumbers", json!({"a": id, "b": 1})))
            .expect("serialize");
        server
            .accept_call_message(connection.session_id(), &payload)
            .await
            .expect("accepted");
    }

    for id in 1..=3u64 {
        let frame = connection.next_frame().await.expect("frame");
        assert_eq!(frame.numeric_id(), Some(id));
        let text = frame.result.expect("result")["content"][0]["text"].clone();
        assert_eq!(text, json!(format!("Sum is {}", id + 1)));
    }
}

#[tokio::test]
async fn test_dropping_connection_closes_session() {
    let server = server();
    let connection = server.accept_connection();
    let id = connection.session_id().to_string();
    assert!(server.sessions().contains(&id));

    drop(connection);

    assert!(!server.sessions().contains(&id));
}

#[test]
fn test_protocol_tool_round_trip_keeps_descriptors() {
    let registry = builtin_registry();
    for descriptor in registry.list().iter() {
        let back = from_protocol_tool(&to_protocol_tool(descriptor)).expect("decode");
        assert_eq!(&back, descriptor);
    }
}
