use crate::model::{ConnectionId, IceCandidate, IceServerConfig, Participant, RoomId};
use serde::{Deserialize, Serialize};

/// Everything that travels over the signaling socket, in both directions.
///
/// On the wire each message is `{"type": "<variant>", "payload": {...}}` with
/// camelCase names, e.g. `{"type":"callOffer","payload":{"targetConnectionId":..,"sdpOffer":..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum SignalMessage {
    /// Client asks to enter (or re-enter) a room.
    Join {
        display_name: String,
        room_id: RoomId,
    },
    /// Client leaves its room without closing the socket.
    Leave,
    /// First frame on every socket: who you are and which ICE servers to use.
    Welcome {
        connection_id: ConnectionId,
        ice_servers: Vec<IceServerConfig>,
    },
    /// Roster for the joiner, excluding the joiner.
    Joined {
        room_id: RoomId,
        members: Vec<Participant>,
    },
    MemberJoined {
        display_name: String,
        connection_id: ConnectionId,
    },
    CallOffer {
        target_connection_id: ConnectionId,
        sdp_offer: String,
    },
    IncomingCall {
        from_display_name: String,
        from_connection_id: ConnectionId,
        sdp_offer: String,
    },
    CallAnswer {
        target_connection_id: ConnectionId,
        sdp_answer: String,
    },
    AnswerMade {
        from_connection_id: ConnectionId,
        sdp_answer: String,
    },
    IceCandidate {
        target_connection_id: ConnectionId,
        candidate: IceCandidate,
    },
    IceCandidateRelayed {
        from_connection_id: ConnectionId,
        candidate: IceCandidate,
    },
    MemberLeft {
        connection_id: ConnectionId,
        display_name: String,
    },
}

impl SignalMessage {
    /// Target of a message the relay forwards to exactly one peer.
    pub fn relay_target(&self) -> Option<&ConnectionId> {
        match self {
            SignalMessage::CallOffer {
                target_connection_id,
                ..
            }
            | SignalMessage::CallAnswer {
                target_connection_id,
                ..
            }
            | SignalMessage::IceCandidate {
                target_connection_id,
                ..
            } => Some(target_connection_id),
            _ => None,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Join { .. } => "join",
            SignalMessage::Leave => "leave",
            SignalMessage::Welcome { .. } => "welcome",
            SignalMessage::Joined { .. } => "joined",
            SignalMessage::MemberJoined { .. } => "memberJoined",
            SignalMessage::CallOffer { .. } => "callOffer",
            SignalMessage::IncomingCall { .. } => "incomingCall",
            SignalMessage::CallAnswer { .. } => "callAnswer",
            SignalMessage::AnswerMade { .. } => "answerMade",
            SignalMessage::IceCandidate { .. } => "iceCandidate",
            SignalMessage::IceCandidateRelayed { .. } => "iceCandidateRelayed",
            SignalMessage::MemberLeft { .. } => "memberLeft",
        }
    }
}
