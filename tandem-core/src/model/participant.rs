use crate::model::{ConnectionId, RoomId};
use serde::{Deserialize, Serialize};

/// One connection registered in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub display_name: String,
    pub connection_id: ConnectionId,
    pub room_id: RoomId,
}

impl Participant {
    pub fn new(
        room_id: RoomId,
        display_name: impl Into<String>,
        connection_id: ConnectionId,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            connection_id,
            room_id,
        }
    }
}
