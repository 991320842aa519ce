//! Typed argument parsing for tool executors

use relay_domain::error::{Error, Result};
use relay_domain::value_objects::ToolArguments;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// Deserialize and validate tool arguments into `T`
///
/// The registry has already checked the arguments against the schema; this
/// catches the tool-specific rules the schema cannot express. Fields are
/// reported under their camelCase wire names.
pub fn parse_args<T>(tool: &str, arguments: ToolArguments) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let args: T = decode_args(tool, arguments)?;
    args.validate().map_err(|errors| {
        Error::schema_validation(tool, first_field(&errors), errors.to_string())
    })?;
    Ok(args)
}

/// Deserialize tool arguments into `T` without running its validation rules
pub fn decode_args<T: DeserializeOwned>(tool: &str, arguments: ToolArguments) -> Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| Error::tool_execution(tool, format!("Failed to parse arguments: {e}")))
}

/// Wire name of the first field that failed validation
pub fn first_field(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .keys()
        .next()
        .map_or_else(|| "arguments".to_string(), |field| wire_name(field))
}

/// `height_m` -> `heightM`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            name.extend(ch.to_uppercase());
            upper = false;
        } else {
            name.push(ch);
        }
    }
    name
}
