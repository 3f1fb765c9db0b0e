use std::sync::Arc;

use dual_transport_rpc::{
    build_app,
    config::{Config, TransportMode},
    logging,
    rpc::{Dispatcher, MethodRegistry},
    stdio::server::serve_stdio,
    AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let dispatcher = Dispatcher::new(Arc::new(MethodRegistry::new()));

    match config.transport {
        TransportMode::Stdio => {
            info!(
                max_frame_bytes = config.max_frame_bytes,
                "stdio server starting"
            );
            serve_stdio(&dispatcher, config.max_frame_bytes).await?;
        }
        TransportMode::Http => {
            let bind_socket = config.bind_socket()?;
            let state = AppState::new(dispatcher, config.max_frame_bytes);
            let app = build_app(state);
            let listener = tokio::net::TcpListener::bind(bind_socket).await?;

            info!(
                bind_addr = %config.bind_addr,
                bind_port = config.bind_port,
                "http server starting"
            );

            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}
