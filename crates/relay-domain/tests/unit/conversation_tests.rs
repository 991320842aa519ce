//! Conversation decoding and sanitization tests

use relay_domain::error::Error;
use relay_domain::value_objects::{
    ConversationTurn, FunctionCall, Part, Role, decode_conversation, sanitize,
};
use serde_json::{Map, json};

#[test]
fn test_non_array_is_invalid_format() {
    let err = decode_conversation(&json!("not-an-array")).expect_err("must fail");
    match err {
        Error::InvalidConversation { message } => assert_eq!(message, "Invalid messages format"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_only_empty_parts_is_rejected() {
    let messages = json!([
        {"role": "user", "parts": [{"text": "   "}, {"text": null}]},
        {"role": "user"},
        {"parts": [{"text": "no role"}]}
    ]);
    let err = decode_conversation(&messages).expect_err("must fail");
    assert_eq!(err.to_string(), "No valid message parts found.");
}

#[test]
fn test_decode_keeps_precedence_and_trims() {
    let messages = json!([
        {"role": "user", "parts": [
            {"text": "  hello  "},
            {"text": "", "functionCall": {"name": "addTwoNumbers", "args": {"a": 1}}},
            {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
            {"unrelated": true}
        ]},
        {"role": "assistant", "parts": [{"text": "hi"}]}
    ]);
    let turns = decode_conversation(&messages).expect("decode");
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].parts.len(), 3);
    assert_eq!(turns[0].parts[0], Part::Text("hello".into()));
    assert!(matches!(&turns[0].parts[1], Part::FunctionCall(call) if call.name == "addTwoNumbers"));
    assert!(matches!(&turns[0].parts[2], Part::InlineData(data) if data.mime_type == "image/png"));
    assert_eq!(turns[1].role, Role::Model);
}

#[test]
fn test_sanitize_is_idempotent() {
    let turns = vec![
        ConversationTurn::new(
            Role::User,
            vec![
                Part::Text("  padded ".into()),
                Part::Text(String::new()),
                Part::FunctionCall(FunctionCall {
                    name: "generatePdf".into(),
                    args: Map::new(),
                }),
            ],
        ),
        ConversationTurn::new(Role::Model, vec![Part::Text("\n".into())]),
    ];
    let once = sanitize(turns);
    let twice = sanitize(once.clone());
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].parts[0], Part::Text("padded".into()));
}

#[test]
fn test_part_serializes_in_model_shape() {
    let part = Part::FunctionCall(FunctionCall {
        name: "generatePdf".into(),
        args: json!({"text": "hello"}).as_object().cloned().unwrap_or_default(),
    });
    let value = serde_json::to_value(&part).expect("serialize");
    assert_eq!(
        value,
        json!({"functionCall": {"name": "generatePdf", "args": {"text": "hello"}}})
    );
    let text = serde_json::to_value(Part::Text("hi".into())).expect("serialize");
    assert_eq!(text, json!({"text": "hi"}));
}

#[test]
fn test_part_decoding_tolerates_extra_keys() {
    let part: Part = serde_json::from_value(json!({
        "functionCall": {"name": "addTwoNumbers", "args": {"a": 2, "b": 3}},
        "thoughtSignature": "opaque"
    }))
    .expect("deserialize");
    assert!(matches!(part, Part::FunctionCall(call) if call.args["b"] == 3));
}

#[test]
fn test_malformed_field_falls_through_to_next_kind() {
    let messages = json!([
        {"role": "user", "parts": [
            {"text": 5, "functionCall": {"name": "calculate-bmi", "args": {"weightKg": 70}}},
            {"functionCall": "oops", "inlineData": {"mimeType": "image/png", "data": "AAAA"}},
            {"text": ["nope"]}
        ]}
    ]);
    let turns = decode_conversation(&messages).expect("decode");
    assert_eq!(turns[0].parts.len(), 2);
    assert!(matches!(&turns[0].parts[0], Part::FunctionCall(call) if call.name == "calculate-bmi"));
    assert!(matches!(&turns[0].parts[1], Part::InlineData(data) if data.data == "AAAA"));
}
