//! Arithmetic tools

use async_trait::async_trait;
use relay_domain::error::Result;
use relay_domain::ports::ToolExecutor;
use relay_domain::value_objects::{
    ParamType, ParameterSchema, ParameterSpec, ToolArguments, ToolResult,
};
use serde::Deserialize;
use validator::Validate;

use super::args::parse_args;

/// Tool name of [`AddTwoNumbers`]
pub const ADD_TWO_NUMBERS: &str = "addTwoNumbers";

/// Tool name of [`CalculateBmi`]
pub const CALCULATE_BMI: &str = "calculate-bmi";

#[derive(Debug, Deserialize, Validate)]
struct SumArgs {
    a: f64,
    b: f64,
}

/// Adds two numbers
pub struct AddTwoNumbers;

impl AddTwoNumbers {
    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .param("a", ParameterSpec::required(ParamType::Number))
            .param("b", ParameterSpec::required(ParamType::Number))
    }
}

#[async_trait]
impl ToolExecutor for AddTwoNumbers {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: SumArgs = parse_args(ADD_TWO_NUMBERS, arguments)?;
        Ok(ToolResult::text(format!("Sum is {}", format_number(args.a + args.b))))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BmiArgs {
    weight_kg: f64,
    #[validate(range(exclusive_min = 0.0))]
    height_m: f64,
}

/// Body mass index from weight and height
pub struct CalculateBmi;

impl CalculateBmi {
    /// Parameter schema
    pub fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .param(
                "weightKg",
                ParameterSpec::required(ParamType::Number).with_description("Weight in kilograms"),
            )
            .param(
                "heightM",
                ParameterSpec::required(ParamType::Number)
                    .with_description("Height in metres")
                    .with_exclusive_minimum(0.0),
            )
    }
}

#[async_trait]
impl ToolExecutor for CalculateBmi {
    async fn execute(&self, arguments: ToolArguments) -> Result<ToolResult> {
        let args: BmiArgs = parse_args(CALCULATE_BMI, arguments)?;
        let bmi = args.weight_kg / (args.height_m * args.height_m);
        Ok(ToolResult::text(format_number(bmi)))
    }
}

/// Render whole numbers without a trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
