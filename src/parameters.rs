//! Parameter declarations and value coercion
//!
//! Caller-supplied values are plain strings. Each is coerced according to the
//! `Type` declared in the template's `Parameters` section the first time a
//! `Ref` needs it.

use serde_json::{Number, Value as JsonValue};
use std::collections::HashMap;

use crate::error::ResolveError;

/// Flat name → raw string mapping supplied by the caller
pub type ParameterValues = HashMap<String, String>;

/// Declared parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Number,
    CommaDelimitedList,
    NumberList,
}

impl ParameterType {
    /// Parse a declared `Type`. Provider-specific types (`AWS::EC2::VPC::Id`,
    /// `List<AWS::EC2::Subnet::Id>`) behave like their generic counterparts.
    pub fn parse(declared: &str) -> Option<Self> {
        match declared {
            "String" => Some(Self::String),
            "Number" => Some(Self::Number),
            "CommaDelimitedList" => Some(Self::CommaDelimitedList),
            "List<Number>" => Some(Self::NumberList),
            d if d.starts_with("List<AWS::") && d.ends_with('>') => Some(Self::CommaDelimitedList),
            d if d.starts_with("AWS::") => Some(Self::String),
            _ => None,
        }
    }

    /// Coerce a raw value.
    pub fn coerce(self, parameter: &str, raw: &str) -> Result<JsonValue, ResolveError> {
        match self {
            Self::String => Ok(JsonValue::String(raw.to_string())),
            Self::Number => parse_number(parameter, raw).map(JsonValue::Number),
            Self::CommaDelimitedList => Ok(JsonValue::Array(
                split_list(raw)
                    .map(|item| JsonValue::String(item.to_string()))
                    .collect(),
            )),
            Self::NumberList => split_list(raw)
                .map(|item| parse_number(parameter, item).map(JsonValue::Number))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
        }
    }
}

/// Items are kept exactly as written between the commas.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
}

fn parse_number(parameter: &str, raw: &str) -> Result<Number, ResolveError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ResolveError::InvalidParameterValue {
            parameter: parameter.to_string(),
            value: raw.to_string(),
            reason: "not a number".to_string(),
        })
}

/// Resolve one declared parameter to its coerced value.
///
/// The supplied value wins over the declaration's `Default`.
pub fn coerce_parameter(
    name: &str,
    declaration: &JsonValue,
    supplied: Option<&str>,
) -> Result<JsonValue, ResolveError> {
    let declared = declaration
        .get("Type")
        .and_then(JsonValue::as_str)
        .unwrap_or("<missing>");
    let param_type =
        ParameterType::parse(declared).ok_or_else(|| ResolveError::UnsupportedParameterType {
            parameter: name.to_string(),
            declared: declared.to_string(),
        })?;

    let raw = match supplied {
        Some(value) => value.to_string(),
        None => match declaration.get("Default") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Number(n)) => n.to_string(),
            Some(JsonValue::Bool(b)) => b.to_string(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            _ => return Err(ResolveError::MissingParameterValue(name.to_string())),
        },
    };

    param_type.coerce(name, &raw)
}
