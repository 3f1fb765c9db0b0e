use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};
use tracing::debug;

use crate::client::{check_correlation, Transport};
use crate::errors::TransportError;
use crate::rpc::{codec, Request, Response};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client role that POSTs each request to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    endpoint: Url,
}

impl HttpClient {
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(endpoint, client)
    }

    pub fn with_client(endpoint: &str, client: Client) -> Result<Self, TransportError> {
        let endpoint =
            Url::parse(endpoint).map_err(|err| TransportError::InvalidEndpoint(err.to_string()))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TransportError::InvalidEndpoint(format!(
                "unsupported scheme `{}`",
                endpoint.scheme()
            )));
        }

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn round_trip(&mut self, request: &Request) -> Result<Response, TransportError> {
        let body = codec::encode(request).map_err(TransportError::Encode)?;

        let reply = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = reply.status();
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "rpc reply received");
        // 400 still carries a JSON-RPC parse error body.
        if status != StatusCode::OK && status != StatusCode::BAD_REQUEST {
            return Err(TransportError::UnexpectedStatus(status.as_u16()));
        }

        let bytes = reply.bytes().await?;
        let response = codec::decode_response(&bytes).map_err(TransportError::InvalidResponse)?;

        check_correlation(request, &response)?;
        Ok(response)
    }
}
