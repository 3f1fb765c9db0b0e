use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod rpc;
pub mod stdio;

use rpc::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, max_body_bytes: usize) -> Self {
        Self {
            dispatcher,
            max_body_bytes,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/rpc", get(http::handlers::discovery))
        .route(
            http::handlers::RPC_PATH,
            post(http::handlers::rpc_endpoint),
        )
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
