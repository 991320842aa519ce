//! Tool Descriptor Value Objects
//!
//! A tool is described by its name, a human readable description and a
//! typed parameter schema. The schema is the single source of truth for
//! argument validation and for the JSON Schema shape advertised to
//! protocol clients and to the language model.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Arguments of a tool call, keyed by parameter name
pub type ToolArguments = Map<String, Value>;

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// UTF-8 string
    String,
    /// Any JSON number
    Number,
    /// Whole JSON number
    Integer,
    /// `true` or `false`
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// Binary payload, base64 string or array of byte values on the wire
    Bytes,
}

impl ParamType {
    /// JSON Schema `type` keyword for this parameter type
    pub fn json_type(self) -> &'static str {
        match self {
            Self::String | Self::Bytes => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Whether `value` has this type
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Bytes => bytes_from_value(value).is_some(),
        }
    }
}

/// Declaration of a single tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Whether the argument must be present
    pub required: bool,
    /// Optional description shown to clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minimum string length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Inclusive lower bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Exclusive lower bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    /// Inclusive upper bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ParameterSpec {
    /// A required parameter of the given type
    pub fn required(param_type: ParamType) -> Self {
        Self {
            param_type,
            required: true,
            description: None,
            min_length: None,
            max_length: None,
            minimum: None,
            exclusive_minimum: None,
            maximum: None,
        }
    }

    /// An optional parameter of the given type
    pub fn optional(param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(param_type)
        }
    }

    /// Attach a description
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Require a minimum string length
    pub fn with_min_length(mut self, min_length: u64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Cap the string length
    pub fn with_max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Require values strictly greater than `bound`
    pub fn with_exclusive_minimum(mut self, bound: f64) -> Self {
        self.exclusive_minimum = Some(bound);
        self
    }

    /// Require a numeric lower bound
    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Require a numeric upper bound
    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Check a present, non-null value against type and constraints
    fn check(&self, value: &Value) -> std::result::Result<(), String> {
        if !self.param_type.accepts(value) {
            return Err(format!("expected {}", type_label(self.param_type)));
        }
        if let Some(text) = value.as_str() {
            let length = text.chars().count() as u64;
            if let Some(min) = self.min_length.filter(|min| length < *min) {
                return Err(format!("must be at least {min} characters"));
            }
            if let Some(max) = self.max_length.filter(|max| length > *max) {
                return Err(format!("must be at most {max} characters"));
            }
        }
        if let Some(number) = value.as_f64() {
            if let Some(min) = self.minimum {
                if number < min {
                    return Err(format!("must be >= {min}"));
                }
            }
            if let Some(bound) = self.exclusive_minimum {
                if number <= bound {
                    return Err(format!("must be > {bound}"));
                }
            }
            if let Some(max) = self.maximum {
                if number > max {
                    return Err(format!("must be <= {max}"));
                }
            }
        }
        Ok(())
    }

    fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.param_type.json_type()));
        if self.param_type == ParamType::Bytes {
            schema.insert("format".into(), json!("byte"));
        }
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        if let Some(min_length) = self.min_length {
            schema.insert("minLength".into(), json!(min_length));
        }
        if let Some(max_length) = self.max_length {
            schema.insert("maxLength".into(), json!(max_length));
        }
        if let Some(minimum) = self.minimum {
            schema.insert("minimum".into(), json!(minimum));
        }
        if let Some(bound) = self.exclusive_minimum {
            schema.insert("exclusiveMinimum".into(), json!(bound));
        }
        if let Some(maximum) = self.maximum {
            schema.insert("maximum".into(), json!(maximum));
        }
        Value::Object(schema)
    }

    fn from_json_schema(property: &Value, required: bool) -> Option<Self> {
        let param_type = match (
            property.get("type").and_then(Value::as_str)?,
            property.get("format").and_then(Value::as_str),
        ) {
            ("string", Some("byte")) => ParamType::Bytes,
            ("string", _) => ParamType::String,
            ("number", _) => ParamType::Number,
            ("integer", _) => ParamType::Integer,
            ("boolean", _) => ParamType::Boolean,
            ("object", _) => ParamType::Object,
            ("array", _) => ParamType::Array,
            _ => return None,
        };
        Some(Self {
            param_type,
            required,
            description: property
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            min_length: property.get("minLength").and_then(Value::as_u64),
            max_length: property.get("maxLength").and_then(Value::as_u64),
            minimum: property.get("minimum").and_then(Value::as_f64),
            exclusive_minimum: property.get("exclusiveMinimum").and_then(Value::as_f64),
            maximum: property.get("maximum").and_then(Value::as_f64),
        })
    }
}

fn type_label(param_type: ParamType) -> &'static str {
    match param_type {
        ParamType::Bytes => "bytes (base64 string or byte array)",
        other => other.json_type(),
    }
}

/// Named parameters accepted by a tool, kept sorted by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    parameters: BTreeMap<String, ParameterSpec>,
}

impl ParameterSchema {
    /// Empty schema (a tool with no parameters)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous one with the same name
    pub fn param<S: Into<String>>(mut self, name: S, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    /// Iterate parameters by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterSpec)> {
        self.parameters
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// Look up one parameter
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    /// Names of the required parameters
    pub fn required(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the schema declares no parameters
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Structural check performed at registration time
    pub fn check_structure(&self) -> Result<()> {
        for (name, spec) in self.iter() {
            if name.trim().is_empty() {
                return Err(Error::invalid_argument("parameter names cannot be empty"));
            }
            if let (Some(min), Some(max)) = (spec.minimum, spec.maximum) {
                if min > max {
                    return Err(Error::invalid_argument(format!(
                        "parameter '{name}' has minimum {min} greater than maximum {max}"
                    )));
                }
            }
            if let (Some(min), Some(max)) = (spec.min_length, spec.max_length) {
                if min > max {
                    return Err(Error::invalid_argument(format!(
                        "parameter '{name}' has minLength {min} greater than maxLength {max}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate call arguments, naming the first offending field
    ///
    /// Unknown extra arguments are ignored. A `null` optional argument is
    /// treated as absent.
    pub fn validate(&self, tool: &str, arguments: &ToolArguments) -> Result<()> {
        for (name, spec) in self.iter() {
            match arguments.get(name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(Error::schema_validation(tool, name, "is required"));
                }
                None | Some(Value::Null) => {}
                Some(value) => spec
                    .check(value)
                    .map_err(|message| Error::schema_validation(tool, name, message))?,
            }
        }
        Ok(())
    }

    /// JSON Schema object (`{type, properties, required}`)
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .iter()
            .map(|(name, spec)| (name.to_string(), spec.to_json_schema()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }

    /// Rebuild a schema from a JSON Schema object
    ///
    /// Properties with types outside [`ParamType`] are rejected.
    pub fn from_json_schema(schema: &Value) -> Result<Self> {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let mut parsed = Self::new();
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                let spec = ParameterSpec::from_json_schema(property, required.contains(&name.as_str()))
                    .ok_or_else(|| {
                        Error::invalid_argument(format!("unsupported schema for parameter '{name}'"))
                    })?;
                parsed = parsed.param(name.clone(), spec);
            }
        }
        Ok(parsed)
    }
}

/// Public description of a registered tool
///
/// Carries no executor; this is what `list` hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Parameter schema
    pub schema: ParameterSchema,
}

impl ToolDescriptor {
    /// Create a descriptor
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        description: D,
        schema: ParameterSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
        }
    }
}

/// Decode a byte parameter from a base64 string or an array of byte values
pub fn bytes_from_value(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::String(encoded) => BASE64.decode(encoded.trim()).ok(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
            .collect(),
        _ => None,
    }
}
