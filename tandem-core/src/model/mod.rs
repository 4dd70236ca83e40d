mod connection;
mod ice;
mod media;
mod participant;
mod room;
mod signaling;

pub use connection::{ConnectionId, ParseConnectionIdError};
pub use ice::{IceCandidate, IceServerConfig};
pub use media::{MediaConstraints, TrackKind};
pub use participant::Participant;
pub use room::RoomId;
pub use signaling::SignalMessage;
