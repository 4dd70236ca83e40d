use crate::engine::{CallEngine, Membership};
use crate::transport::{MediaDevice, PeerTransport, SignalSink};
use tandem_core::{RoomId, SignalMessage};
use tracing::{info, warn};

impl<M, T, S> CallEngine<M, T, S>
where
    M: MediaDevice,
    T: PeerTransport<Stream = M::Stream>,
    S: SignalSink,
{
    /// Enters `room_id`. The membership is remembered and replayed after a
    /// reconnect. Moving to another room ends any call: the server routes
    /// only within a room, and the old room already saw us leave.
    pub async fn join_room(&self, room_id: impl Into<RoomId>, display_name: impl Into<String>) {
        let membership = Membership {
            room_id: room_id.into(),
            display_name: display_name.into(),
        };
        info!(
            "Joining '{}' as '{}'",
            membership.room_id, membership.display_name
        );

        let previous = self
            .inner
            .borrow_mut()
            .membership
            .replace(membership.clone());
        if previous.is_some_and(|p| p.room_id != membership.room_id) {
            if let Some(peer) = self.end_session().await {
                info!("Dropped call with {} on room change", peer);
            }
            self.inner.borrow_mut().roster.clear();
            self.emit_roster();
        }

        self.send_signal(SignalMessage::Join {
            display_name: membership.display_name,
            room_id: membership.room_id,
        });
    }

    /// Hangs up, forgets the room and tells the server.
    pub async fn leave_room(&self) {
        self.end_session().await;

        let was_member = {
            let mut inner = self.inner.borrow_mut();
            inner.roster.clear();
            inner.membership.take().is_some()
        };
        self.emit_roster();

        if was_member {
            self.send_signal(SignalMessage::Leave);
        }
    }

    /// The signaling socket was re-established. The server treated the old
    /// socket as gone, so any call in progress is dead: tear it down, then
    /// re-join the remembered room under the new connection.
    pub async fn on_transport_reconnected(&self) {
        if let Some(peer) = self.end_session().await {
            warn!("Dropped call with {} after signaling reconnect", peer);
        }

        let membership = {
            let mut inner = self.inner.borrow_mut();
            inner.roster.clear();
            inner.membership.clone()
        };
        self.emit_roster();

        if let Some(m) = membership {
            info!("Re-joining '{}' after reconnect", m.room_id);
            self.send_signal(SignalMessage::Join {
                display_name: m.display_name,
                room_id: m.room_id,
            });
        }
    }
}
