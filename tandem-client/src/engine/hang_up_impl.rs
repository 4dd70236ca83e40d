use crate::engine::{CallEngine, CallState, EngineEvent};
use crate::error::CallError;
use crate::transport::{MediaDevice, PeerTransport, SignalSink, TransportSession};
use tandem_core::ConnectionId;
use tracing::info;

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Ends the current call from any non-idle state, including while an
    /// offer or answer is still being negotiated.
    pub async fn hang_up(&self) -> Result<(), CallError> {
        if self.inner.borrow().session.is_none() {
            return self.reject("hang_up");
        }

        if let Some(peer) = self.end_session().await {
            info!("Hung up on {}", peer);
        }
        Ok(())
    }

    /// The server reported that `connection_id` left. Ends the call if it
    /// was our peer, otherwise nothing happens.
    pub async fn on_remote_left(&self, connection_id: &ConnectionId) {
        let is_peer = self
            .inner
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| &s.remote == connection_id);

        if is_peer {
            info!("Peer {} left, ending call", connection_id);
            self.end_session().await;
        }
    }

    /// Detaches the session before closing its transport, so any operation
    /// still awaiting on it finds itself stale when it resumes.
    pub(super) async fn end_session(&self) -> Option<ConnectionId> {
        let session = self.inner.borrow_mut().session.take()?;

        if let Some(transport) = &session.transport {
            transport.close().await;
        }

        if session.remote_stream.is_some() {
            self.emit(EngineEvent::RemoteStream(None));
        }
        self.emit(EngineEvent::StateChanged {
            state: CallState::Idle,
            peer: None,
        });
        Some(session.remote)
    }
}
