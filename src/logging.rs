use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::http::handlers::RPC_PATH;

/// Install the global subscriber. Output goes to stderr; stdout belongs to the stdio transport.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Summarise each HTTP exchange; verbs rejected before dispatch are logged with what is allowed.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let rpc_call = path == RPC_PATH;
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        rpc_call,
        status = status.as_u16(),
        duration_ms = started_at.elapsed().as_millis(),
        "request summary"
    );

    if let Some(allow) = rejected_verb_allow(&response) {
        warn!(
            method = %method,
            path = %path,
            allow = %allow,
            "http verb rejected before dispatch"
        );
    }

    response
}

/// The `Allow` header of a 405 response, or `None` for any other status.
fn rejected_verb_allow(response: &Response) -> Option<String> {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return None;
    }

    Some(
        response
            .headers()
            .get(header::ALLOW)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-")
            .to_string(),
    )
}
