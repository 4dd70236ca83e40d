use crate::engine::{CallEngine, CallState, EngineEvent};
use crate::error::CallError;
use crate::roster::RosterEntry;
use crate::transport::{MediaDevice, PeerTransport, SignalSink};
use tandem_core::{ConnectionId, SignalMessage};
use tracing::{debug, info, warn};

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Dispatches one message received from the signaling server.
    pub async fn handle_signal(&self, msg: SignalMessage) {
        match msg {
            SignalMessage::Welcome {
                connection_id,
                ice_servers,
            } => {
                info!(
                    "Connected as {} ({} ICE servers offered)",
                    connection_id,
                    ice_servers.len()
                );
                let mut inner = self.inner.borrow_mut();
                inner.self_id = Some(connection_id);
                if !ice_servers.is_empty() {
                    inner.ice_servers = Some(ice_servers);
                }
            }

            SignalMessage::Joined { room_id, members } => {
                let expected = self
                    .inner
                    .borrow()
                    .membership
                    .as_ref()
                    .is_some_and(|m| m.room_id == room_id);
                if !expected {
                    debug!("Ignoring roster for '{}', not our room", room_id);
                    return;
                }

                info!("Joined '{}' with {} other members", room_id, members.len());
                {
                    let mut inner = self.inner.borrow_mut();
                    let self_id = inner.self_id.clone();
                    inner.roster.replace(
                        members
                            .into_iter()
                            .filter(|p| Some(&p.connection_id) != self_id.as_ref())
                            .map(RosterEntry::from),
                    );
                }
                self.emit_roster();
            }

            SignalMessage::MemberJoined {
                display_name,
                connection_id,
            } => {
                if self.is_self(&connection_id) {
                    return;
                }
                let changed = self.inner.borrow_mut().roster.upsert(RosterEntry {
                    display_name,
                    connection_id,
                });
                if changed {
                    self.emit_roster();
                }
            }

            SignalMessage::MemberLeft {
                connection_id,
                display_name,
            } => {
                debug!("'{}' ({}) left", display_name, connection_id);
                let removed = self.inner.borrow_mut().roster.remove(&connection_id);
                if removed.is_some() {
                    self.emit_roster();
                }
                self.on_remote_left(&connection_id).await;
            }

            SignalMessage::IncomingCall {
                from_display_name,
                from_connection_id,
                sdp_offer,
            } => {
                if self.state() != CallState::Idle {
                    warn!(
                        "Busy, ignoring call from '{}' ({})",
                        from_display_name, from_connection_id
                    );
                    self.emit(EngineEvent::IncomingCallIgnored {
                        from: from_connection_id,
                        display_name: from_display_name,
                    });
                    return;
                }

                info!("Incoming call from '{}'", from_display_name);
                match self
                    .receive_offer(from_connection_id.clone(), sdp_offer)
                    .await
                {
                    Ok(()) => {}
                    Err(e @ CallError::NoLocalMedia) => {
                        warn!("Cannot answer {}: {}", from_connection_id, e);
                        self.emit(EngineEvent::CallFailed {
                            peer: Some(from_connection_id),
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => warn!("Answering {} failed: {}", from_connection_id, e),
                }
            }

            SignalMessage::AnswerMade {
                from_connection_id,
                sdp_answer,
            } => {
                if !self.is_peer(&from_connection_id) {
                    debug!("Ignoring answer from {}, not our peer", from_connection_id);
                    return;
                }
                if let Err(e) = self.receive_answer(sdp_answer).await {
                    warn!("Answer from {} not applied: {}", from_connection_id, e);
                }
            }

            SignalMessage::IceCandidateRelayed {
                from_connection_id,
                candidate,
            } => {
                if !self.is_peer(&from_connection_id) {
                    debug!("Ignoring candidate from {}, not our peer", from_connection_id);
                    return;
                }
                if let Err(e) = self.receive_ice_candidate(candidate).await {
                    warn!("Candidate from {} not applied: {}", from_connection_id, e);
                }
            }

            other => warn!("Unexpected {} from server", other.kind()),
        }
    }

    fn is_self(&self, connection_id: &ConnectionId) -> bool {
        self.inner.borrow().self_id.as_ref() == Some(connection_id)
    }

    fn is_peer(&self, connection_id: &ConnectionId) -> bool {
        self.inner
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| &s.remote == connection_id)
    }
}
