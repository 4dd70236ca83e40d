use tandem_core::{ConnectionId, Participant, RoomId, SignalMessage};
use tokio::sync::oneshot;

/// Commands fed to the relay by the socket layer. Commands from one
/// connection arrive in the order that connection produced them.
#[derive(Debug)]
pub enum RelayCommand {
    /// A parsed frame from a client socket.
    Inbound {
        connection_id: ConnectionId,
        message: SignalMessage,
    },

    /// The socket closed or errored.
    Disconnect { connection_id: ConnectionId },

    /// Read-only roster query.
    Roster {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<Participant>>,
    },
}
