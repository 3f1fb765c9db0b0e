//! JSON-RPC 2.0 wire types and the payload codec
//!
//! Decoding distinguishes payloads that are not JSON at all (parse error) from JSON that is not a
//! valid request (invalid request). Encoding is plain `serde_json` over the typed structs, so field
//! order on the wire is always `jsonrpc`, `id`, then `result` or `error`.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

/// The `"jsonrpc": "2.0"` marker. Deserialization rejects any other value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoPointZero;

impl Serialize for TwoPointZero {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for TwoPointZero {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let version = String::deserialize(deserializer)?;
        if version == JSONRPC_VERSION {
            Ok(TwoPointZero)
        } else {
            Err(de::Error::invalid_value(
                de::Unexpected::Str(&version),
                &JSONRPC_VERSION,
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// The fixed error vocabulary every failed cycle is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    HandlerFailure,
}

impl ErrorCode {
    pub fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::HandlerFailure => -32000,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::HandlerFailure => "Server error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<ErrorCode> for RpcError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code, code.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub jsonrpc: TwoPointZero,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: TwoPointZero,
            id,
            method: method.into(),
            params,
        }
    }
}

/// Exactly one of `result` or `error`; the enum makes carrying both unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse")]
pub struct Response {
    pub jsonrpc: TwoPointZero,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Response as it appears on the wire, before the result/error exclusivity is checked.
#[derive(Deserialize)]
struct RawResponse {
    jsonrpc: TwoPointZero,
    #[serde(default)]
    id: Option<RequestId>,
    // `"result": null` is a result, so presence is tracked separately from the value.
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawResponse> for Response {
    type Error = &'static str;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        let outcome = match (raw.result, raw.error) {
            (Some(result), None) => Outcome::Result(result),
            (None, Some(error)) => Outcome::Error(error),
            (Some(_), Some(_)) => return Err("response carries both result and error"),
            (None, None) => return Err("response carries neither result nor error"),
        };

        Ok(Self {
            jsonrpc: raw.jsonrpc,
            id: raw.id,
            outcome,
        })
    }
}

impl Response {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: TwoPointZero,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn failure(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: TwoPointZero,
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    pub fn error_code(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Error(error) => Some(error.code),
            Outcome::Result(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            Outcome::Result(value) => Ok(value),
            Outcome::Error(error) => Err(error),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::ParseError,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
        }
    }
}

/// Decode one payload into a dispatchable request.
pub fn decode(payload: &[u8]) -> Result<Request, DecodeError> {
    let value: Value = serde_json::from_slice(payload).map_err(DecodeError::Parse)?;
    let Value::Object(object) = value else {
        return Err(DecodeError::InvalidRequest("request must be a JSON object"));
    };

    request_from_object(object)
}

fn request_from_object(mut object: Map<String, Value>) -> Result<Request, DecodeError> {
    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(DecodeError::InvalidRequest("jsonrpc must be \"2.0\""));
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) if !method.trim().is_empty() => method,
        _ => {
            return Err(DecodeError::InvalidRequest(
                "method must be a non-empty string",
            ))
        }
    };

    let id = match object.remove("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(RequestId::String(value)),
        Some(Value::Number(number)) => Some(RequestId::Number(number.as_i64().ok_or(
            DecodeError::InvalidRequest("numeric id must be an integer"),
        )?)),
        Some(_) => {
            return Err(DecodeError::InvalidRequest(
                "id must be an integer, a string or null",
            ))
        }
    };

    Ok(Request {
        jsonrpc: TwoPointZero,
        id,
        method,
        params: object.remove("params"),
    })
}

/// Serialize a request or response to its single-line payload form.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(message)
}

/// Decode a payload received by a client role.
pub fn decode_response(payload: &[u8]) -> Result<Response, serde_json::Error> {
    serde_json::from_slice(payload)
}
