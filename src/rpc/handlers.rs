//! Built-in method handlers
//!
//! Each handler owns its parameter-shape validation and reports a mismatch as a [`HandlerError`]
//! rather than trusting the caller.

use serde::Deserialize;
use serde_json::{json, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
    pub data: Option<Value>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Deserialize)]
struct EchoParams {
    text: String,
}

/// `echo` returns `params.text` unchanged.
pub fn echo(params: Option<Value>) -> Result<Value, HandlerError> {
    let raw_params = match params {
        Some(object @ Value::Object(_)) => object,
        Some(_) => {
            return Err(HandlerError::new(
                "echo params must be an object with a string `text`",
            ))
        }
        None => return Err(HandlerError::new("echo requires params.text")),
    };

    let params: EchoParams = serde_json::from_value(raw_params).map_err(|err| {
        HandlerError::new("echo params must be an object with a string `text`")
            .with_data(json!({ "reason": err.to_string() }))
    })?;

    Ok(Value::String(params.text))
}

/// `add` returns the sum of a two-element numeric array.
///
/// Two integers whose sum fits in `i64` or `u64` produce an integer; anything else is summed as
/// `f64`.
pub fn add(params: Option<Value>) -> Result<Value, HandlerError> {
    let operands = match params {
        Some(Value::Array(items)) if items.len() == 2 => items,
        _ => {
            return Err(HandlerError::new(
                "add params must be an array of exactly two numbers",
            ))
        }
    };

    let (Value::Number(left), Value::Number(right)) = (&operands[0], &operands[1]) else {
        return Err(HandlerError::new("add operands must both be numbers"));
    };

    if let Some(sum) = integer_sum(left, right) {
        return Ok(Value::Number(sum));
    }

    let sum = as_f64(left) + as_f64(right);
    Number::from_f64(sum)
        .map(Value::Number)
        .ok_or_else(|| HandlerError::new("add result is not a finite number"))
}

fn integer_sum(left: &Number, right: &Number) -> Option<Number> {
    let sum = as_i128(left)? + as_i128(right)?;
    i64::try_from(sum)
        .map(Number::from)
        .or_else(|_| u64::try_from(sum).map(Number::from))
        .ok()
}

fn as_i128(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn as_f64(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}
