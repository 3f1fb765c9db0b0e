//! Caller side of the protocol, shared by the stdio and HTTP client roles

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::errors::TransportError;
use crate::rpc::{Request, RequestId, Response, RpcError};

/// Carries one request to a peer and brings back its response.
#[async_trait]
pub trait Transport: Send {
    async fn round_trip(&mut self, request: &Request) -> Result<Response, TransportError>;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("remote error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl From<RpcError> for ClientError {
    fn from(error: RpcError) -> Self {
        Self::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

/// Issues requests with increasing integer ids and unwraps their results.
pub struct RpcClient<T> {
    transport: T,
    last_id: i64,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_id: 0,
        }
    }

    /// Call `method`, returning its result or failing locally when the peer answers with an error.
    pub async fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        self.last_id += 1;
        let request = Request::new(Some(RequestId::Number(self.last_id)), method, params);
        let response = self.transport.round_trip(&request).await?;
        Ok(response.into_result()?)
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// A response belongs to the in-flight request when the ids match. A null id is accepted on error
/// responses, where the peer could not read the request id.
pub(crate) fn check_correlation(
    request: &Request,
    response: &Response,
) -> Result<(), TransportError> {
    if response.id == request.id || (response.id.is_none() && response.is_error()) {
        return Ok(());
    }

    Err(TransportError::Correlation {
        expected: request.id.clone(),
        actual: response.id.clone(),
    })
}
