use rendezvous_core::{ClientMessage, RoomEvent, RoomId, SignalEnvelope};

/// Everything that can happen to one connection, from the client or from the
/// transport itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Join { room_id: RoomId, display_name: String },
    Leave,
    Signal(SignalEnvelope),
    RoomEvent(RoomEvent),
    /// Transport closed, cleanly or not.
    Disconnect,
}

impl From<ClientMessage> for ConnectionEvent {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::JoinRoom {
                room_id,
                display_name,
            } => Self::Join {
                room_id,
                display_name,
            },
            ClientMessage::LeaveRoom => Self::Leave,
            ClientMessage::Signal(envelope) => Self::Signal(envelope),
            ClientMessage::RoomEvent(event) => Self::RoomEvent(event),
        }
    }
}
