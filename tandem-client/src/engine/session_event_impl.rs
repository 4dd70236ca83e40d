use crate::engine::{CallEngine, CallState, EngineEvent};
use crate::transport::{
    MediaDevice, PeerTransport, SessionEnvelope, SessionEvent, SessionEventReceiver, SessionId,
    SignalSink,
};
use futures::StreamExt;
use tracing::{debug, info, warn};

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Feeds transport callbacks into the engine until every sender is gone.
    pub async fn run_session_events(&self, mut events: SessionEventReceiver<T::Remote>) {
        while let Some(envelope) = events.next().await {
            self.handle_session_event(envelope).await;
        }
        debug!("Session event stream closed");
    }

    pub async fn handle_session_event(&self, envelope: SessionEnvelope<T::Remote>) {
        let SessionEnvelope { session, event } = envelope;
        match event {
            SessionEvent::LocalCandidate(candidate) => self.on_local_candidate(session, candidate),
            SessionEvent::RemoteTrack(remote) => self.on_remote_track(session, remote),
            SessionEvent::ConnectionLost => self.on_connection_lost(session).await,
        }
    }

    /// Remote media arrived. A session whose descriptions are exchanged
    /// becomes `Active`; earlier states keep the stream until they get there.
    pub(super) fn on_remote_track(&self, id: SessionId, remote: T::Remote) {
        let activated = self.with_session(id, |s| {
            s.remote_stream = Some(remote.clone());
            if s.state == CallState::Connecting {
                s.state = CallState::Active;
                Some(s.remote.clone())
            } else {
                None
            }
        });

        let Some(activated) = activated else {
            debug!("Ignoring remote track of stale {}", id);
            return;
        };

        self.emit(EngineEvent::RemoteStream(Some(remote)));
        if let Some(peer) = activated {
            info!("Call with {} is active", peer);
            self.emit(EngineEvent::StateChanged {
                state: CallState::Active,
                peer: Some(peer),
            });
        }
    }

    async fn on_connection_lost(&self, id: SessionId) {
        if !self.is_current(id) {
            return;
        }

        warn!("Peer connection lost for {}", id);
        let peer = self.end_session().await;
        self.emit(EngineEvent::CallFailed {
            peer,
            reason: "peer connection lost".to_string(),
        });
    }
}
