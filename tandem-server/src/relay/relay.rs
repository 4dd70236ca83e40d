use crate::registry::RoomRegistry;
use crate::relay::relay_command::RelayCommand;
use crate::relay::relay_error::RelayError;
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tandem_core::{ConnectionId, Participant, RoomId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Single task that owns the registry. Every join, leave and forward runs
/// to completion (including its broadcasts) before the next command is
/// looked at, so notifications never reference a member that a concurrent
/// command already removed.
pub struct SignalingRelay {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RelayCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl SignalingRelay {
    pub fn new(command_rx: mpsc::Receiver<RelayCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!(
            "Command channel closed. Relay stopped with {} rooms, {} connections",
            self.registry.room_count(),
            self.registry.connection_count()
        );
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Inbound {
                connection_id,
                message,
            } => {
                let kind = message.kind();
                if let Err(e) = self.handle_message(&connection_id, message).await {
                    if e.is_routine() {
                        debug!("Dropped {} from {}: {}", kind, connection_id, e);
                    } else {
                        warn!("Dropped {} from {}: {}", kind, connection_id, e);
                    }
                }
            }

            RelayCommand::Disconnect { connection_id } => {
                info!("Connection {} disconnected", connection_id);
                self.remove_with_notify(&connection_id).await;
            }

            RelayCommand::Roster { room_id, reply } => {
                let _ = reply.send(self.registry.members_of(&room_id));
            }
        }
    }

    async fn handle_message(
        &mut self,
        from: &ConnectionId,
        message: SignalMessage,
    ) -> Result<(), RelayError> {
        match message {
            SignalMessage::Join {
                display_name,
                room_id,
            } => {
                self.join(from, room_id, display_name).await;
                Ok(())
            }

            SignalMessage::Leave => {
                self.remove_with_notify(from).await;
                Ok(())
            }

            SignalMessage::CallOffer {
                target_connection_id,
                sdp_offer,
            } => {
                let sender = self.route(from, &target_connection_id)?;
                let msg = SignalMessage::IncomingCall {
                    from_display_name: sender.display_name,
                    from_connection_id: from.clone(),
                    sdp_offer,
                };
                self.signaling.send_signal(target_connection_id, msg).await;
                Ok(())
            }

            SignalMessage::CallAnswer {
                target_connection_id,
                sdp_answer,
            } => {
                self.route(from, &target_connection_id)?;
                let msg = SignalMessage::AnswerMade {
                    from_connection_id: from.clone(),
                    sdp_answer,
                };
                self.signaling.send_signal(target_connection_id, msg).await;
                Ok(())
            }

            SignalMessage::IceCandidate {
                target_connection_id,
                candidate,
            } => {
                self.route(from, &target_connection_id)?;
                let msg = SignalMessage::IceCandidateRelayed {
                    from_connection_id: from.clone(),
                    candidate,
                };
                self.signaling.send_signal(target_connection_id, msg).await;
                Ok(())
            }

            other => Err(RelayError::UnexpectedMessage { kind: other.kind() }),
        }
    }

    async fn join(&mut self, from: &ConnectionId, room_id: RoomId, display_name: String) {
        info!("{} joins room '{}' as '{}'", from, room_id, display_name);

        let outcome = self
            .registry
            .join(room_id.clone(), display_name.clone(), from.clone());

        if let Some(previous) = outcome.replaced.filter(|p| p.room_id != room_id) {
            self.broadcast_left(&previous).await;
        }

        let peers: Vec<ConnectionId> = outcome
            .members
            .iter()
            .map(|p| p.connection_id.clone())
            .collect();

        self.signaling
            .send_signal(
                from.clone(),
                SignalMessage::Joined {
                    room_id,
                    members: outcome.members,
                },
            )
            .await;

        for peer in peers {
            let msg = SignalMessage::MemberJoined {
                display_name: display_name.clone(),
                connection_id: from.clone(),
            };
            self.signaling.send_signal(peer, msg).await;
        }
    }

    /// Both ends must be registered in the same room.
    fn route(&self, from: &ConnectionId, target: &ConnectionId) -> Result<Participant, RelayError> {
        let sender = self
            .registry
            .resolve(from)
            .cloned()
            .ok_or_else(|| RelayError::UnregisteredSender(from.clone()))?;

        let receiver = self
            .registry
            .resolve(target)
            .ok_or_else(|| RelayError::UnresolvedTarget(target.clone()))?;

        if receiver.room_id != sender.room_id {
            return Err(RelayError::OutsideRoom {
                target: target.clone(),
                room: sender.room_id,
            });
        }

        debug!("Routing {} -> {} in '{}'", from, target, sender.room_id);
        Ok(sender)
    }

    async fn remove_with_notify(&mut self, connection_id: &ConnectionId) {
        let Some(participant) = self.registry.leave(connection_id) else {
            return;
        };

        info!(
            "'{}' ({}) left room '{}'",
            participant.display_name, participant.connection_id, participant.room_id
        );
        self.broadcast_left(&participant).await;
    }

    async fn broadcast_left(&self, participant: &Participant) {
        for peer in self.registry.members_of(&participant.room_id) {
            if peer.connection_id == participant.connection_id {
                continue;
            }
            let msg = SignalMessage::MemberLeft {
                connection_id: participant.connection_id.clone(),
                display_name: participant.display_name.clone(),
            };
            self.signaling.send_signal(peer.connection_id, msg).await;
        }
    }
}
