use crate::relay::RelayCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, IceServerConfig, Participant, RoomId, SignalMessage};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Owns the live sockets and the sending side of the relay's command queue.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) relay_tx: mpsc::Sender<RelayCommand>,
}

impl SignalingService {
    pub fn new(relay_tx: mpsc::Sender<RelayCommand>, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
                ice_servers,
            }),
            relay_tx,
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_peer(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(connection_id, tx);
    }

    pub fn remove_peer(&self, connection_id: &ConnectionId) {
        self.inner.peers.remove(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub async fn relay(&self, cmd: RelayCommand) -> bool {
        match self.relay_tx.send(cmd).await {
            Ok(()) => true,
            Err(e) => {
                error!("Relay died: {}", e);
                false
            }
        }
    }

    /// `None` when the relay task is gone.
    pub async fn roster(&self, room_id: RoomId) -> Option<Vec<Participant>> {
        let (reply, rx) = oneshot::channel();
        if !self.relay(RelayCommand::Roster { room_id, reply }).await {
            return None;
        }
        rx.await.ok()
    }

    fn push(&self, connection_id: &ConnectionId, msg: &SignalMessage) {
        let Some(peer) = self.inner.peers.get(connection_id) else {
            warn!(
                "Attempted to send {} to disconnected connection {}",
                msg.kind(),
                connection_id
            );
            return;
        };

        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = peer.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", connection_id, e);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_signal(&self, connection_id: ConnectionId, msg: SignalMessage) {
        self.push(&connection_id, &msg);
    }
}
