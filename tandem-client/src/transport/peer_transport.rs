use crate::error::TransportError;
use crate::transport::MediaStreamHandle;
use async_trait::async_trait;
use futures::channel::mpsc;
use std::fmt;
use tandem_core::{IceCandidate, IceServerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Identifies one peer session inside an engine. Results and callbacks that
/// carry an id which is no longer current are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

#[derive(Debug, Clone)]
pub enum SessionEvent<R> {
    LocalCandidate(IceCandidate),
    RemoteTrack(R),
    ConnectionLost,
}

#[derive(Debug, Clone)]
pub struct SessionEnvelope<R> {
    pub session: SessionId,
    pub event: SessionEvent<R>,
}

pub type SessionEventReceiver<R> = mpsc::UnboundedReceiver<SessionEnvelope<R>>;

/// Handed to a transport when a session is opened. Transports report
/// asynchronous happenings (gathered candidates, arriving tracks, lost
/// connectivity) through it; the engine consumes them in order.
pub struct SessionEvents<R> {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEnvelope<R>>,
}

impl<R> Clone for SessionEvents<R> {
    fn clone(&self) -> Self {
        Self {
            session: self.session,
            tx: self.tx.clone(),
        }
    }
}

impl<R> SessionEvents<R> {
    pub fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEnvelope<R>>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn local_candidate(&self, candidate: IceCandidate) {
        self.emit(SessionEvent::LocalCandidate(candidate));
    }

    pub fn remote_track(&self, remote: R) {
        self.emit(SessionEvent::RemoteTrack(remote));
    }

    pub fn connection_lost(&self) {
        self.emit(SessionEvent::ConnectionLost);
    }

    fn emit(&self, event: SessionEvent<R>) {
        // The engine being gone just means nobody cares any more.
        let _ = self.tx.unbounded_send(SessionEnvelope {
            session: self.session,
            event,
        });
    }
}

/// Creates peer sessions bound to a local stream.
#[async_trait(?Send)]
pub trait PeerTransport: 'static {
    type Stream: MediaStreamHandle;
    /// Remote media as the platform represents it.
    type Remote: Clone + 'static;
    type Session: TransportSession;

    async fn open_session(
        &self,
        local: &Self::Stream,
        config: &SessionConfig,
        events: SessionEvents<Self::Remote>,
    ) -> Result<Self::Session, TransportError>;
}

#[async_trait(?Send)]
pub trait TransportSession: 'static {
    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<String, TransportError>;

    /// Creates an answer and installs it as the local description. Requires
    /// the remote offer to be set first.
    async fn create_answer(&self) -> Result<String, TransportError>;

    async fn set_remote_description(&self, kind: SdpKind, sdp: &str)
    -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<(), TransportError>;

    async fn close(&self);
}
