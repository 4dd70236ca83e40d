use std::collections::HashMap;
use tandem_core::{ConnectionId, Participant, RoomId};

/// Result of registering a connection in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Room roster as seen by the entrant (the entrant itself is excluded).
    pub members: Vec<Participant>,
    /// Entry the connection had before this join, if it was already registered.
    pub replaced: Option<Participant>,
}

/// Room membership and the connection directory, kept in one place so they
/// cannot disagree.
///
/// Every entry is addressed by connection id. Display names are carried
/// along as metadata only: two connections may share a name, in the same
/// room or in different rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Vec<Participant>>,
    connections: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `connection_id` in `room_id`. A connection that is already
    /// registered anywhere is replaced, never duplicated.
    pub fn join(
        &mut self,
        room_id: RoomId,
        display_name: impl Into<String>,
        connection_id: ConnectionId,
    ) -> JoinOutcome {
        let participant = Participant::new(room_id.clone(), display_name, connection_id.clone());

        let current_room = self.connections.get(&connection_id).cloned();
        let replaced = match current_room {
            Some(current) if current == room_id => {
                let members = self.rooms.entry(room_id.clone()).or_default();
                members
                    .iter_mut()
                    .find(|p| p.connection_id == connection_id)
                    .map(|slot| std::mem::replace(slot, participant.clone()))
            }
            Some(_) => self.leave(&connection_id),
            None => None,
        };

        let members = self.rooms.entry(room_id.clone()).or_default();
        if !members.iter().any(|p| p.connection_id == connection_id) {
            members.push(participant);
        }
        self.connections.insert(connection_id.clone(), room_id.clone());

        JoinOutcome {
            members: members
                .iter()
                .filter(|p| p.connection_id != connection_id)
                .cloned()
                .collect(),
            replaced,
        }
    }

    /// Removes the connection's entry. Returns `None` when there was nothing
    /// to remove, which happens when a disconnect races an explicit leave.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let room_id = self.connections.remove(connection_id)?;
        let members = self.rooms.get_mut(&room_id)?;

        let index = members
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        let participant = members.remove(index);

        if members.is_empty() {
            self.rooms.remove(&room_id);
        }

        Some(participant)
    }

    pub fn resolve(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        let room_id = self.connections.get(connection_id)?;
        self.rooms
            .get(room_id)?
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    pub fn members_of(&self, room_id: &RoomId) -> Vec<Participant> {
        self.rooms.get(room_id).cloned().unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
