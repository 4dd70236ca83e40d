use async_trait::async_trait;
use tandem_core::{ConnectionId, SignalMessage};

/// Outbound half of the signaling transport. The relay only ever talks to
/// clients through this trait, which keeps it testable without sockets.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Best-effort delivery to one connection. Unknown connections are
    /// dropped by the implementation.
    async fn send_signal(&self, connection_id: ConnectionId, msg: SignalMessage);
}
