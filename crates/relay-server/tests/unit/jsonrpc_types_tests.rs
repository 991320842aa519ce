//! JSON-RPC message type tests

use relay_server::constants::{JSONRPC_INVALID_PARAMS, JSONRPC_METHOD_NOT_FOUND};
use relay_server::transport::{JsonRpcRequest, JsonRpcResponse};
use serde_json::json;

#[test]
fn test_request_defaults_version() {
    let request: JsonRpcRequest =
        serde_json::from_value(json!({"method": "tools/list", "id": 7})).expect("parse");

    assert_eq!(request.jsonrpc, "2.0");
    assert_eq!(request.id, Some(json!(7)));
    assert!(request.params.is_none());
    assert!(!request.is_notification());
}

#[test]
fn test_notification_omits_id() {
    let notification = JsonRpcRequest::notification("notifications/initialized", None);
    let value = serde_json::to_value(&notification).expect("serialize");

    assert!(notification.is_notification());
    assert_eq!(
        value,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"})
    );
}

#[test]
fn test_success_response_shape() {
    let response = JsonRpcResponse::success(Some(json!(3)), json!({"ok": true}));
    let value = serde_json::to_value(&response).expect("serialize");

    assert_eq!(value, json!({"jsonrpc": "2.0", "result": {"ok": true}, "id": 3}));
    assert_eq!(response.numeric_id(), Some(3));
}

#[test]
fn test_error_response_carries_data() {
    let response = JsonRpcResponse::error_with_data(
        Some(json!(4)),
        JSONRPC_INVALID_PARAMS,
        "bad",
        Some(json!({"kind": "tool_not_found"})),
    );
    let value = serde_json::to_value(&response).expect("serialize");

    assert_eq!(value["error"]["code"], -32602);
    assert_eq!(value["error"]["data"]["kind"], "tool_not_found");
    assert!(value.get("result").is_none());
}

#[test]
fn test_error_without_data_omits_field() {
    let response = JsonRpcResponse::error(None, JSONRPC_METHOD_NOT_FOUND, "nope");
    let value = serde_json::to_value(&response).expect("serialize");

    assert!(value["error"].get("data").is_none());
    assert_eq!(value["id"], serde_json::Value::Null);
}

#[test]
fn test_string_id_is_not_numeric() {
    let response = JsonRpcResponse::success(Some(json!("abc")), json!({}));
    assert_eq!(response.numeric_id(), None);
}
