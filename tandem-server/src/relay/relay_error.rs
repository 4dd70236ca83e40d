use tandem_core::{ConnectionId, RoomId};

/// Reasons a client frame was not forwarded. None of these are reported
/// back to the sender.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("target {0} is not connected")]
    UnresolvedTarget(ConnectionId),

    #[error("sender {0} has not joined a room")]
    UnregisteredSender(ConnectionId),

    #[error("target {target} is not in room {room}")]
    OutsideRoom { target: ConnectionId, room: RoomId },

    #[error("`{kind}` is a server-to-client message")]
    UnexpectedMessage { kind: &'static str },
}

impl RelayError {
    /// Unresolved targets are routine (peer left mid-negotiation).
    pub fn is_routine(&self) -> bool {
        matches!(self, RelayError::UnresolvedTarget(_))
    }
}
