use crate::error::SignalingError;
use crate::lifecycle::ConnectionEvent;
use rendezvous_core::{ConnectionId, RoomEvent, RoomId, SignalEnvelope};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Transport is open, no join yet.
    #[default]
    Unjoined,
    Joined {
        room_id: RoomId,
    },
    /// Terminal.
    Closed,
}

/// Work a transition asks the handler to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add the connection to the room and announce it.
    Admit {
        room_id: RoomId,
        display_name: String,
    },
    /// Remove the connection from its room and tell the rest.
    Evict,
    Relay(SignalEnvelope),
    Broadcast(RoomEvent),
    /// Report an error to this connection only.
    Reject(SignalingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: ConnectionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: ConnectionState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

impl ConnectionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::Joined { room_id } => Some(room_id),
            _ => None,
        }
    }

    /// Pure transition function: no I/O, no registry access.
    pub fn on_event(&self, connection_id: ConnectionId, event: ConnectionEvent) -> Transition {
        use ConnectionEvent as Ev;

        match (self, event) {
            (Self::Closed, _) => Transition::to(Self::Closed, vec![]),

            (
                Self::Unjoined,
                Ev::Join {
                    room_id,
                    display_name,
                },
            ) => {
                let display_name = display_name.trim();
                if display_name.is_empty() {
                    return Transition::to(
                        Self::Unjoined,
                        vec![Effect::Reject(SignalingError::InvalidDisplayName)],
                    );
                }
                Transition::to(
                    Self::Joined {
                        room_id: room_id.clone(),
                    },
                    vec![Effect::Admit {
                        room_id,
                        display_name: display_name.to_owned(),
                    }],
                )
            }
            (Self::Unjoined, Ev::Leave | Ev::Signal(_) | Ev::RoomEvent(_)) => Transition::to(
                Self::Unjoined,
                vec![Effect::Reject(SignalingError::NotJoined)],
            ),
            (Self::Unjoined, Ev::Disconnect) => Transition::to(Self::Closed, vec![]),

            (Self::Joined { .. }, Ev::Join { .. }) => Transition::to(
                self.clone(),
                vec![Effect::Reject(SignalingError::DuplicateConnection(
                    connection_id,
                ))],
            ),
            (Self::Joined { .. }, Ev::Signal(mut envelope)) => {
                envelope.from_connection_id = Some(connection_id);
                Transition::to(self.clone(), vec![Effect::Relay(envelope)])
            }
            (Self::Joined { .. }, Ev::RoomEvent(event)) => {
                Transition::to(self.clone(), vec![Effect::Broadcast(event)])
            }
            (Self::Joined { .. }, Ev::Leave | Ev::Disconnect) => {
                Transition::to(Self::Closed, vec![Effect::Evict])
            }
        }
    }
}
