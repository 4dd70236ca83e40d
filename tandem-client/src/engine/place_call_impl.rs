use crate::engine::{CallEngine, CallState};
use crate::error::CallError;
use crate::transport::{MediaDevice, PeerTransport, SessionId, SignalSink, TransportSession};
use tandem_core::{ConnectionId, SignalMessage};
use tracing::info;

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Calls `target`. Requires local media and an idle engine.
    ///
    /// The state is `Offering` from the moment this is invoked, so a
    /// `hang_up` issued while the offer is still being produced wins and the
    /// late offer is thrown away.
    pub async fn place_call(&self, target: ConnectionId) -> Result<(), CallError> {
        let Some(local) = self.local_stream() else {
            return Err(CallError::NoLocalMedia);
        };
        if self.inner.borrow().session.is_some() {
            return self.reject("place_call");
        }

        info!("Calling {}", target);
        let id = self.begin_session(target, CallState::Offering);
        let result = self.send_offer(id, &local).await;
        self.finish_negotiation(id, result).await
    }

    async fn send_offer(&self, id: SessionId, local: &M::Stream) -> Result<(), CallError> {
        let Some(session) = self.open_transport(id, local).await? else {
            return Ok(());
        };

        let sdp_offer = session.create_offer().await?;

        let Some(target_connection_id) = self.with_session(id, |s| s.remote.clone()) else {
            return Ok(());
        };
        self.send_required(SignalMessage::CallOffer {
            target_connection_id,
            sdp_offer,
        })
    }
}
