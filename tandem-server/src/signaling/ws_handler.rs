use crate::{RelayCommand, SignalingOutput, SignalingService};
use axum::Json;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::{ConnectionId, RoomId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, service))
}

pub async fn health_handler() -> &'static str {
    "tandem signaling server is running"
}

pub async fn roster_handler(
    Path(room_id): Path<String>,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    match service.roster(RoomId::from(room_id)).await {
        Some(members) => Json(members).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, service: SignalingService) {
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(connection_id.clone(), tx);
    service
        .send_signal(
            connection_id.clone(),
            SignalMessage::Welcome {
                connection_id: connection_id.clone(),
                ice_servers: service.get_ice_servers(),
            },
        )
        .await;

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let connection_id = connection_id.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(message) => {
                            debug!("{} from {}", message.kind(), connection_id);
                            let cmd = RelayCommand::Inbound {
                                connection_id: connection_id.clone(),
                                message,
                            };
                            if !service.relay(cmd).await {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid SignalMessage from {}: {:?}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Whichever half finished first, the relay must forget this connection.
    service
        .relay(RelayCommand::Disconnect {
            connection_id: connection_id.clone(),
        })
        .await;
    service.remove_peer(&connection_id);
    info!("WebSocket disconnected: {}", connection_id);
}
