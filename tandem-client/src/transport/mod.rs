mod media;
mod peer_transport;
mod signal_sink;

pub use media::{MediaDevice, MediaStreamHandle};
pub use peer_transport::{
    PeerTransport, SdpKind, SessionConfig, SessionEnvelope, SessionEvent, SessionEventReceiver,
    SessionEvents, SessionId, TransportSession,
};
pub use signal_sink::SignalSink;
