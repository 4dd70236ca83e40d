mod config;
mod registry;
mod relay;
mod signaling;

pub use config::*;
pub use registry::*;
pub use relay::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Creates the signaling service and spawns the relay task behind it.
pub fn spawn_relay(config: &ServerConfig) -> SignalingService {
    let (relay_tx, relay_rx) = mpsc::channel::<RelayCommand>(config.relay_queue_capacity);
    let service = SignalingService::new(relay_tx, config.ice_servers.clone());

    let relay = SignalingRelay::new(relay_rx, Arc::new(service.clone()));
    tokio::spawn(relay.run());

    service
}

pub fn router(service: SignalingService) -> Router {
    // Browser clients are served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_handler))
        .route("/ws", get(ws_handler))
        .route("/rooms/{room_id}/members", get(roster_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve_with_listener(listener, config).await
}

pub async fn serve_with_listener(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let service = spawn_relay(&config);
    let app = router(service);

    info!("Signaling server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
