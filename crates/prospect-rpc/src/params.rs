//! Coercion of loosely typed request params into core inputs.
//!
//! Sliders and text fields deliver numbers as strings, so a value may arrive
//! either as a JSON number or as decimal text. Anything else is rejected here
//! and never reaches the store.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ParamError(pub String);

pub fn required_str<'a>(params: &'a Value, field: &str) -> Result<&'a str, ParamError> {
    params
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ParamError(format!("missing string param: {field}")))
}

pub fn required_number(params: &Value, field: &str) -> Result<f64, ParamError> {
    let raw = params
        .get(field)
        .ok_or_else(|| ParamError(format!("missing param: {field}")))?;
    coerce_number(raw).ok_or_else(|| ParamError(format!("{field} must be a finite number, got {raw}")))
}

pub fn coerce_number(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}
