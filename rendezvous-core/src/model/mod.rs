mod peer;
mod room;
mod signaling;

pub use peer::{ConnectionId, ParticipantInfo};
pub use room::RoomId;
pub use signaling::{
    ClientMessage, ErrorCode, IceServerConfig, RoomEvent, ServerMessage, SignalEnvelope,
    SignalKind, StreamType,
};
