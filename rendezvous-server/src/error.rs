use rendezvous_core::{ConnectionId, ErrorCode, RoomId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalingError {
    #[error("connection {0} is already a member of a room")]
    DuplicateConnection(ConnectionId),

    /// Leave or lookup for a connection that has no room. Expected during
    /// disconnect races, never surfaced to clients.
    #[error("connection {0} is not a member of any room")]
    RoomNotFound(ConnectionId),

    #[error("join a room before sending signaling or room events")]
    NotJoined,

    #[error("peer {0} is not reachable")]
    PeerUnreachable(ConnectionId),

    #[error("meeting '{0}' does not exist")]
    MeetingNotFound(RoomId),

    #[error("display name must not be empty")]
    InvalidDisplayName,
}

impl SignalingError {
    /// Wire code for errors that are reported back to the offending client.
    /// `None` for errors that are only logged.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::DuplicateConnection(_) => Some(ErrorCode::DuplicateConnection),
            Self::NotJoined => Some(ErrorCode::NotJoined),
            Self::MeetingNotFound(_) => Some(ErrorCode::MeetingNotFound),
            Self::InvalidDisplayName => Some(ErrorCode::InvalidDisplayName),
            Self::RoomNotFound(_) | Self::PeerUnreachable(_) => None,
        }
    }
}
