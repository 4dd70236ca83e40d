use serde::Serialize;
use tandem_core::{ConnectionId, Participant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub display_name: String,
    pub connection_id: ConnectionId,
}

impl From<Participant> for RosterEntry {
    fn from(p: Participant) -> Self {
        Self {
            display_name: p.display_name,
            connection_id: p.connection_id,
        }
    }
}

/// Client-side view of the other people in the room, in arrival order.
/// Keyed by connection id: the server may announce the same member twice
/// (a re-join) and that must not produce a second entry.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, members: impl IntoIterator<Item = RosterEntry>) {
        self.entries.clear();
        for entry in members {
            self.upsert(entry);
        }
    }

    /// Returns `true` if the roster changed.
    pub fn upsert(&mut self, entry: RosterEntry) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.connection_id == entry.connection_id)
        {
            Some(existing) if *existing == entry => false,
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<RosterEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| &e.connection_id == connection_id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&RosterEntry> {
        self.entries
            .iter()
            .find(|e| &e.connection_id == connection_id)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
