use crate::engine::{CallEngine, CallState};
use crate::error::CallError;
use crate::transport::{
    MediaDevice, PeerTransport, SdpKind, SessionId, SignalSink, TransportSession,
};
use std::rc::Rc;
use tracing::info;

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Applies the callee's answer. Only valid while `Offering` with the
    /// offer already sent.
    pub async fn receive_answer(&self, sdp_answer: String) -> Result<(), CallError> {
        let claimed = {
            let mut inner = self.inner.borrow_mut();
            match inner.session.as_mut() {
                Some(s)
                    if s.state == CallState::Offering && !s.in_flight && s.transport.is_some() =>
                {
                    s.in_flight = true;
                    s.transport.clone().map(|t| (s.id, t))
                }
                _ => None,
            }
        };
        let Some((id, session)) = claimed else {
            return self.reject("receive_answer");
        };

        info!("Applying answer for {}", id);
        let result = self.apply_answer(id, &session, &sdp_answer).await;
        self.finish_negotiation(id, result).await
    }

    async fn apply_answer(
        &self,
        id: SessionId,
        session: &Rc<T::Session>,
        sdp_answer: &str,
    ) -> Result<(), CallError> {
        session
            .set_remote_description(SdpKind::Answer, sdp_answer)
            .await?;
        if !self.is_current(id) {
            return Ok(());
        }

        self.apply_pending_remote(id, session).await;
        self.release_local_candidates(id);
        self.enter_connecting(id);
        Ok(())
    }
}
