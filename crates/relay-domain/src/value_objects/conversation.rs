//! Conversation turns exchanged with the language model
//!
//! Callers send loosely shaped JSON. [`decode_conversation`] turns it into
//! typed [`ConversationTurn`]s, dropping anything that cannot carry content,
//! and [`sanitize`] enforces the "no empty parts, no empty turns" rule.

use crate::constants::{INVALID_MESSAGES_FORMAT, NO_VALID_MESSAGE_PARTS};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    User,
    /// The language model
    #[serde(alias = "assistant")]
    Model,
}

/// Structured function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// Call arguments
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Inline binary payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64 encoded bytes
    pub data: String,
}

/// One content fragment of a turn
///
/// Serializes as `{"text": ..}`, `{"functionCall": ..}` or
/// `{"inlineData": ..}`. Decoding tolerates extra keys and picks the first
/// usable fragment in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPart")]
pub enum Part {
    /// Plain text
    Text(String),
    /// Function call
    FunctionCall(FunctionCall),
    /// Inline binary data
    InlineData(InlineData),
}

impl Part {
    /// Text body if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Loosely shaped part as it arrives on the wire
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    function_call: Option<FunctionCall>,
    #[serde(default, deserialize_with = "lenient")]
    inline_data: Option<InlineData>,
}

/// Read a field as absent when its value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

impl RawPart {
    fn into_part(self) -> Option<Part> {
        if let Some(text) = self.text {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(Part::Text(trimmed.to_string()));
            }
        }
        if let Some(call) = self.function_call {
            return Some(Part::FunctionCall(call));
        }
        self.inline_data.map(Part::InlineData)
    }
}

impl TryFrom<RawPart> for Part {
    type Error = String;

    fn try_from(raw: RawPart) -> std::result::Result<Self, Self::Error> {
        raw.into_part()
            .ok_or_else(|| "part carries no text, functionCall or inlineData".to_string())
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Author
    pub role: Role,
    /// Ordered fragments
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    /// Create a turn
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Single-text user turn
    pub fn user_text<S: Into<String>>(text: S) -> Self {
        Self::new(Role::User, vec![Part::Text(text.into())])
    }

    /// Single-text model turn
    pub fn model_text<S: Into<String>>(text: S) -> Self {
        Self::new(Role::Model, vec![Part::Text(text.into())])
    }
}

/// Drop empty text parts and turns left without parts
///
/// Text is trimmed; function-call and inline-data parts are kept verbatim.
/// Applying it twice yields the same result as applying it once.
pub fn sanitize(turns: Vec<ConversationTurn>) -> Vec<ConversationTurn> {
    turns
        .into_iter()
        .filter_map(|turn| {
            let parts: Vec<Part> = turn
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    Part::Text(text) => {
                        let trimmed = text.trim();
                        (!trimmed.is_empty()).then(|| Part::Text(trimmed.to_string()))
                    }
                    other => Some(other),
                })
                .collect();
            (!parts.is_empty()).then_some(ConversationTurn::new(turn.role, parts))
        })
        .collect()
}

/// Decode caller JSON into sanitized turns
///
/// Fails with [`Error::InvalidConversation`] when `messages` is not an
/// array, or when nothing usable remains after sanitization. Entries
/// without a known role or without a `parts` array are skipped.
pub fn decode_conversation(messages: &Value) -> Result<Vec<ConversationTurn>> {
    let entries = messages
        .as_array()
        .ok_or_else(|| Error::invalid_conversation(INVALID_MESSAGES_FORMAT))?;

    let turns: Vec<ConversationTurn> = entries.iter().filter_map(decode_turn).collect();
    let turns = sanitize(turns);
    if turns.is_empty() {
        return Err(Error::invalid_conversation(NO_VALID_MESSAGE_PARTS));
    }
    Ok(turns)
}

fn decode_turn(entry: &Value) -> Option<ConversationTurn> {
    let role = serde_json::from_value::<Role>(entry.get("role")?.clone()).ok()?;
    let parts = entry
        .get("parts")?
        .as_array()?
        .iter()
        .filter_map(|part| serde_json::from_value::<RawPart>(part.clone()).ok())
        .filter_map(RawPart::into_part)
        .collect();
    Some(ConversationTurn::new(role, parts))
}
