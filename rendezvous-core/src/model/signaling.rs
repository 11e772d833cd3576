use crate::model::peer::{ConnectionId, ParticipantInfo};
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
    Control,
}

/// Point-to-point signaling message. `payload` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEnvelope {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub to_connection_id: ConnectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_connection_id: Option<ConnectionId>,
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamType {
    Camera,
    Screen,
}

/// Room-wide notifications that ride on the same room membership as signaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum RoomEvent {
    ChatMessage {
        text: String,
        /// Set by the server on broadcast; ignored when sent by a client.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sent_at_ms: Option<u64>,
    },
    RaiseHand,
    StreamChanged {
        stream_type: StreamType,
    },
    MuteRequest {
        participant_id: ConnectionId,
    },
    /// Asks the room to drop `participant_id`. Membership is not changed by
    /// the server; the named client is expected to leave on its own.
    RemoveRequest {
        participant_id: ConnectionId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    DuplicateConnection,
    NotJoined,
    MeetingNotFound,
    InvalidDisplayName,
}

/// Frames sent by a browser to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinRoom { room_id: RoomId, display_name: String },
    LeaveRoom,
    Signal(SignalEnvelope),
    RoomEvent(RoomEvent),
}

/// Frames sent by the server to a browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Welcome {
        connection_id: ConnectionId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    /// Members that were present before the recipient joined.
    AllUsers(Vec<ParticipantInfo>),
    UserJoined(ParticipantInfo),
    Signal(SignalEnvelope),
    UserLeft {
        connection_id: ConnectionId,
    },
    RoomEvent {
        from: ParticipantInfo,
        event: RoomEvent,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}
