use crate::engine::CallEngine;
use crate::error::CallError;
use crate::transport::{MediaDevice, PeerTransport, SessionId, SignalSink, TransportSession};
use std::rc::Rc;
use tandem_core::{IceCandidate, SignalMessage};
use tracing::{debug, warn};

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Remote candidate from the current peer. Queued until the remote
    /// description is applied, then handed to the transport in arrival order.
    pub async fn receive_ice_candidate(&self, candidate: IceCandidate) -> Result<(), CallError> {
        let ready = self.inner.borrow_mut().session.as_mut().map(|session| {
            match session.transport.clone() {
                Some(transport) if session.remote_description_set => Some(transport),
                _ => {
                    session.pending_remote.push_back(candidate.clone());
                    None
                }
            }
        });
        let Some(ready) = ready else {
            return self.reject("receive_ice_candidate");
        };

        if let Some(transport) = ready {
            if let Err(e) = transport.add_ice_candidate(&candidate).await {
                warn!("Remote candidate rejected: {}", e);
            }
        }
        Ok(())
    }

    /// Drains queued remote candidates into the transport. The session only
    /// starts accepting candidates directly once the queue is empty, so a
    /// candidate arriving mid-drain cannot overtake an earlier one.
    pub(super) async fn apply_pending_remote(&self, id: SessionId, transport: &Rc<T::Session>) {
        loop {
            let batch = self.with_session(id, |s| {
                if s.pending_remote.is_empty() {
                    s.remote_description_set = true;
                    None
                } else {
                    Some(s.pending_remote.drain(..).collect::<Vec<_>>())
                }
            });

            let Some(Some(batch)) = batch else {
                return;
            };

            debug!("Applying {} queued remote candidates for {}", batch.len(), id);
            for candidate in batch {
                if let Err(e) = transport.add_ice_candidate(&candidate).await {
                    warn!("Queued remote candidate rejected: {}", e);
                }
            }
        }
    }

    /// Candidate gathered by our transport. Held back until the peer has
    /// our description, otherwise sent right away.
    pub(super) fn on_local_candidate(&self, id: SessionId, candidate: IceCandidate) {
        let target = self.with_session(id, |s| {
            if s.local_ready {
                Some(s.remote.clone())
            } else {
                s.pending_local.push_back(candidate.clone());
                None
            }
        });

        match target {
            Some(Some(target_connection_id)) => self.send_signal(SignalMessage::IceCandidate {
                target_connection_id,
                candidate,
            }),
            Some(None) => {}
            None => debug!("Dropping local candidate of stale {}", id),
        }
    }

    pub(super) fn release_local_candidates(&self, id: SessionId) {
        let Some((target, batch)) = self.with_session(id, |s| {
            s.local_ready = true;
            (
                s.remote.clone(),
                s.pending_local.drain(..).collect::<Vec<_>>(),
            )
        }) else {
            return;
        };

        for candidate in batch {
            self.send_signal(SignalMessage::IceCandidate {
                target_connection_id: target.clone(),
                candidate,
            });
        }
    }
}
