//! Axum HTTP handlers for the web server
//!
//! Provides the JSON-RPC endpoint and general metadata endpoints.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::rpc::Response;
use crate::AppState;

pub const RPC_PATH: &str = "/rpc";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DiscoveryResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub rpc_endpoint: &'static str,
    pub methods: Vec<&'static str>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn discovery(State(state): State<AppState>) -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rpc_endpoint: RPC_PATH,
        methods: state.dispatcher.registry().names(),
    })
}

/// Runs exactly one dispatch cycle over the request body.
pub async fn rpc_endpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Response>, AppError> {
    if std::str::from_utf8(&body).is_err() {
        return Err(AppError::NonTextBody);
    }

    Ok(Json(state.dispatcher.dispatch(&body).await))
}
