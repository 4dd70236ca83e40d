use crate::engine::{CallEngine, CallState};
use crate::error::CallError;
use crate::transport::{
    MediaDevice, PeerTransport, SdpKind, SessionId, SignalSink, TransportSession,
};
use tandem_core::{ConnectionId, SignalMessage};
use tracing::info;

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Accepts an offer from `from`. Requires local media and an idle
    /// engine; ends in `Connecting` once the answer went out.
    pub async fn receive_offer(&self, from: ConnectionId, sdp_offer: String) -> Result<(), CallError> {
        let Some(local) = self.local_stream() else {
            return Err(CallError::NoLocalMedia);
        };
        if self.inner.borrow().session.is_some() {
            return self.reject("receive_offer");
        }

        info!("Answering call from {}", from);
        let id = self.begin_session(from, CallState::Answering);
        let result = self.send_answer(id, &local, &sdp_offer).await;
        self.finish_negotiation(id, result).await
    }

    async fn send_answer(
        &self,
        id: SessionId,
        local: &M::Stream,
        sdp_offer: &str,
    ) -> Result<(), CallError> {
        let Some(session) = self.open_transport(id, local).await? else {
            return Ok(());
        };

        session
            .set_remote_description(SdpKind::Offer, sdp_offer)
            .await?;
        if !self.is_current(id) {
            return Ok(());
        }
        self.apply_pending_remote(id, &session).await;

        let sdp_answer = session.create_answer().await?;

        let Some(target_connection_id) = self.with_session(id, |s| s.remote.clone()) else {
            return Ok(());
        };
        self.send_required(SignalMessage::CallAnswer {
            target_connection_id,
            sdp_answer,
        })?;

        self.release_local_candidates(id);
        self.enter_connecting(id);
        Ok(())
    }
}
