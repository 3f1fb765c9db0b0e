use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::rpc::codec::{ErrorCode, RequestId, Response as RpcResponse};

/// Failures of the carrier itself. These end the affected stream or connection and never produce
/// a JSON-RPC response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("stream i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame exceeds {max_bytes} bytes")]
    FrameTooLarge { max_bytes: usize },
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("peer sent a malformed response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("peer closed the stream before responding")]
    Closed,
    #[error("response id {actual:?} does not match request id {expected:?}")]
    Correlation {
        expected: Option<RequestId>,
        actual: Option<RequestId>,
    },
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status {0}")]
    UnexpectedStatus(u16),
}

/// Rejections raised by the HTTP adapter before the dispatcher runs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("request body is not utf-8 text")]
    NonTextBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NonTextBody => {
                tracing::warn!(error = %self, "rejecting request before dispatch");
                (
                    StatusCode::BAD_REQUEST,
                    Json(RpcResponse::failure(None, ErrorCode::ParseError.into())),
                )
                    .into_response()
            }
        }
    }
}
