//! Language model request and response shapes

use super::conversation::{ConversationTurn, Part};
use super::tool::{ParamType, ToolDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Tool declaration in the shape function-calling models expect
///
/// `parameters` is `{type: "object", properties, required}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Function name, identical to the tool name
    pub name: String,
    /// Function description
    pub description: String,
    /// Parameter schema object
    pub parameters: Value,
}

impl From<&ToolDescriptor> for FunctionDeclaration {
    fn from(descriptor: &ToolDescriptor) -> Self {
        // Models accept a narrower schema dialect than tool clients, so only
        // type, format and description are carried per property.
        let properties: Map<String, Value> = descriptor
            .schema
            .iter()
            .map(|(name, spec)| {
                let mut property = Map::new();
                property.insert("type".into(), json!(spec.param_type.json_type()));
                if spec.param_type == ParamType::Bytes {
                    property.insert("format".into(), json!("byte"));
                }
                if let Some(description) = &spec.description {
                    property.insert("description".into(), json!(description));
                }
                (name.to_string(), Value::Object(property))
            })
            .collect();

        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": descriptor.schema.required(),
            }),
        }
    }
}

/// Everything sent to the model in one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Full turn sequence, preamble included
    pub turns: Vec<ConversationTurn>,
    /// Callable functions
    pub functions: Vec<FunctionDeclaration>,
}

/// One candidate answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    /// Candidate content fragments
    pub parts: Vec<Part>,
}

/// Model answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    /// Candidates in the order the model returned them
    pub candidates: Vec<Candidate>,
}

impl ModelResponse {
    /// Response with a single candidate
    pub fn single(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate { parts }],
        }
    }

    /// First fragment of the first candidate
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates.first().and_then(|c| c.parts.first())
    }
}
