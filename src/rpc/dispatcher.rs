//! One decode → resolve → invoke → respond cycle
//!
//! Every branch terminates in a [`Response`]; only transport failures, which happen outside this
//! module, can end a cycle without one.

use std::{future::Future, sync::Arc};

use serde_json::Value;
use tracing::{debug, info};

use super::codec::{self, ErrorCode, Request, RequestId, Response, RpcError};
use super::handlers::HandlerError;
use super::registry::MethodRegistry;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Run a full cycle over a raw payload. Undecodable payloads answer with `id: null`.
    pub async fn dispatch(&self, payload: &[u8]) -> Response {
        match codec::decode(payload) {
            Ok(request) => self.dispatch_request(request).await,
            Err(err) => {
                debug!(error = %err, "payload rejected before dispatch");
                let response = Response::failure(None, err.code().into());
                audit("-", None, &response);
                response
            }
        }
    }

    /// Resolve and invoke an already decoded request.
    ///
    /// Requests without an id still get a response; notifications are not suppressed.
    pub async fn dispatch_request(&self, request: Request) -> Response {
        let Request {
            id, method, params, ..
        } = request;

        let response = match self.registry.resolve(&method) {
            Err(_) => Response::failure(id.clone(), ErrorCode::MethodNotFound.into()),
            Ok(resolved) => {
                match isolate(resolved.name(), resolved.invoke(params)).await {
                    Ok(result) => Response::success(id.clone(), result),
                    Err(err) => Response::failure(id.clone(), handler_failure(err)),
                }
            }
        };

        audit(&method, id.as_ref(), &response);
        response
    }
}

/// Run handler work on its own task so that a panic surfaces as a [`HandlerError`].
async fn isolate<F>(method: &str, work: F) -> Result<Value, HandlerError>
where
    F: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(outcome) => outcome,
        Err(join_error) if join_error.is_panic() => {
            Err(HandlerError::new(format!("{method} handler panicked")))
        }
        Err(_) => Err(HandlerError::new(format!("{method} handler was cancelled"))),
    }
}

fn handler_failure(err: HandlerError) -> RpcError {
    let HandlerError { message, data } = err;
    let error = RpcError::new(ErrorCode::HandlerFailure, message);
    match data {
        Some(data) => error.with_data(data),
        None => error,
    }
}

fn audit(method: &str, id: Option<&RequestId>, response: &Response) {
    info!(
        method = %method,
        id = ?id,
        outcome = if response.is_error() { "failure" } else { "success" },
        code = ?response.error_code(),
        "rpc call audited"
    );
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rpc::codec::encode;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MethodRegistry::new()))
    }

    async fn dispatch_line(line: &str) -> String {
        let response = dispatcher().dispatch(line.as_bytes()).await;
        String::from_utf8(encode(&response).expect("serializable")).expect("utf-8")
    }

    #[tokio::test]
    async fn echo_scenario() {
        assert_eq!(
            dispatch_line(r#"{"jsonrpc":"2.0","id":1,"method":"echo","params":{"text":"hi"}}"#)
                .await,
            r#"{"jsonrpc":"2.0","id":1,"result":"hi"}"#
        );
    }

    #[tokio::test]
    async fn add_scenario() {
        assert_eq!(
            dispatch_line(r#"{"jsonrpc":"2.0","id":2,"method":"add","params":[10,15]}"#).await,
            r#"{"jsonrpc":"2.0","id":2,"result":25}"#
        );
    }

    #[tokio::test]
    async fn unknown_method_scenario() {
        assert_eq!(
            dispatch_line(r#"{"jsonrpc":"2.0","id":3,"method":"nope"}"#).await,
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"Method not found"}}"#
        );
    }

    #[tokio::test]
    async fn parse_error_scenario() {
        assert_eq!(
            dispatch_line("not json").await,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }

    #[tokio::test]
    async fn empty_payload_is_parse_error() {
        let response = dispatcher().dispatch(b"").await;
        assert_eq!(response.id, None);
        assert_eq!(response.error_code(), Some(-32700));
    }

    #[tokio::test]
    async fn invalid_request_answers_with_null_id() {
        for line in [
            r#"{"jsonrpc":"1.0","id":4,"method":"echo"}"#,
            r#"{"jsonrpc":"2.0","id":4}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":""}"#,
        ] {
            let response = dispatcher().dispatch(line.as_bytes()).await;
            assert_eq!(response.id, None, "line: {line}");
            assert_eq!(response.error_code(), Some(-32600), "line: {line}");
        }
    }

    #[tokio::test]
    async fn handler_failure_carries_request_id_and_message() {
        let response = dispatcher()
            .dispatch(br#"{"jsonrpc":"2.0","id":"x","method":"add","params":[1,"2"]}"#)
            .await;

        assert_eq!(response.id, Some(RequestId::from("x")));
        let error = response.into_result().expect_err("handler failure");
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "add operands must both be numbers");
    }

    #[tokio::test]
    async fn handler_data_is_forwarded() {
        let response = dispatcher()
            .dispatch(br#"{"jsonrpc":"2.0","id":5,"method":"echo","params":{}}"#)
            .await;

        let error = response.into_result().expect_err("handler failure");
        assert_eq!(error.code, -32000);
        assert!(error.data.is_some());
    }

    #[tokio::test]
    async fn request_without_id_still_gets_response() {
        let response = dispatcher()
            .dispatch(br#"{"jsonrpc":"2.0","method":"echo","params":{"text":"n"}}"#)
            .await;

        assert_eq!(response, Response::success(None, json!("n")));
    }

    #[tokio::test]
    async fn identical_requests_produce_identical_responses() {
        let line = br#"{"jsonrpc":"2.0","id":9,"method":"add","params":[1,2]}"#;
        let dispatcher = dispatcher();

        assert_eq!(dispatcher.dispatch(line).await, dispatcher.dispatch(line).await);
    }

    fn exploding_handler() -> Result<Value, HandlerError> {
        panic!("exploded")
    }

    #[tokio::test]
    async fn panicking_handler_work_becomes_handler_error() {
        let outcome = isolate("boom", async { exploding_handler() }).await;

        let err = outcome.expect_err("panic must be caught");
        assert_eq!(err.message, "boom handler panicked");
    }
}
