pub mod connection_tests;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::Level;

use tandem_server::{RelayCommand, ServerConfig, SignalingRelay};

use crate::utils::{Delivery, MockSignalingOutput};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_relay() -> (
    mpsc::Sender<RelayCommand>,
    mpsc::UnboundedReceiver<Delivery>,
    MockSignalingOutput,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RelayCommand>(100);
    let (signaling, signal_rx) = MockSignalingOutput::new();

    let relay = SignalingRelay::new(cmd_rx, Arc::new(signaling.clone()));

    tokio::spawn(async move {
        relay.run().await;
    });

    (cmd_tx, signal_rx, signaling)
}

/// Real axum server on an ephemeral port.
pub async fn spawn_test_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local addr");

    let config = ServerConfig {
        host: addr.ip(),
        port: addr.port(),
        ..ServerConfig::default()
    };

    tokio::spawn(async move {
        let _ = tandem_server::serve_with_listener(listener, config).await;
    });

    addr
}
