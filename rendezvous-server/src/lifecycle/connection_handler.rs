use crate::directory::MeetingDirectory;
use crate::error::SignalingError;
use crate::lifecycle::{ConnectionEvent, ConnectionState, Effect, Transition};
use crate::room::RoomRegistry;
use crate::signaling::{SignalingOutput, SignalingRelay};
use rendezvous_core::{ConnectionId, RoomId, ServerMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared pieces every connection handler works against.
#[derive(Clone)]
pub struct Coordinator {
    registry: RoomRegistry,
    relay: SignalingRelay,
    output: Arc<dyn SignalingOutput>,
    directory: Arc<dyn MeetingDirectory>,
}

impl Coordinator {
    pub fn new(output: Arc<dyn SignalingOutput>, directory: Arc<dyn MeetingDirectory>) -> Self {
        let registry = RoomRegistry::new();
        let relay = SignalingRelay::new(registry.clone(), output.clone());

        Self {
            registry,
            relay,
            output,
            directory,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Handler for a freshly accepted transport connection.
    pub fn connect(&self, connection_id: ConnectionId) -> ConnectionHandler {
        ConnectionHandler {
            connection_id,
            state: ConnectionState::Unjoined,
            coordinator: self.clone(),
        }
    }
}

/// Drives one connection through its state machine and carries out the
/// resulting effects.
pub struct ConnectionHandler {
    connection_id: ConnectionId,
    state: ConnectionState,
    coordinator: Coordinator,
}

impl ConnectionHandler {
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Applies `event`. Errors are returned for the caller's benefit; the ones
    /// meant for the client have already been sent to it.
    pub async fn handle(&mut self, event: ConnectionEvent) -> Result<(), SignalingError> {
        if let (
            ConnectionState::Unjoined,
            ConnectionEvent::Join {
                room_id,
                display_name,
            },
        ) = (&self.state, &event)
            && !display_name.trim().is_empty()
        {
            // Meeting lookup is external I/O and happens before any room lock.
            // Blank names are rejected by the transition without a lookup.
            if !self.coordinator.directory.meeting_exists(room_id).await {
                return self.reject(SignalingError::MeetingNotFound(room_id.clone()));
            }
        }

        let Transition { next, effects } = self.state.on_event(self.connection_id, event);
        let previous = std::mem::replace(&mut self.state, next);

        let mut result = Ok(());
        for effect in effects {
            let admitting = matches!(effect, Effect::Admit { .. });
            if let Err(e) = self.execute(effect) {
                if admitting {
                    self.state = previous.clone();
                }
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    fn execute(&self, effect: Effect) -> Result<(), SignalingError> {
        match effect {
            Effect::Admit {
                room_id,
                display_name,
            } => self.admit(room_id, display_name),
            Effect::Evict => {
                self.evict();
                Ok(())
            }
            Effect::Relay(envelope) => {
                match self.coordinator.relay.relay(&self.connection_id, envelope) {
                    Ok(()) | Err(SignalingError::PeerUnreachable(_)) => Ok(()),
                    Err(e) => self.reject(e),
                }
            }
            Effect::Broadcast(event) => {
                match self.coordinator.relay.broadcast(&self.connection_id, event) {
                    Ok(_) => Ok(()),
                    Err(e) => self.reject(e),
                }
            }
            Effect::Reject(e) => self.reject(e),
        }
    }

    fn admit(&self, room_id: RoomId, display_name: String) -> Result<(), SignalingError> {
        let output = &self.coordinator.output;

        let admitted = self.coordinator.registry.join_with(
            room_id.clone(),
            self.connection_id,
            display_name,
            |joiner, existing| {
                // Joiner learns who is here before anyone learns about the joiner.
                let snapshot = existing.iter().map(|p| p.info()).collect();
                output.deliver(&joiner.connection_id, ServerMessage::AllUsers(snapshot));

                for member in existing {
                    output.deliver(&member.connection_id, ServerMessage::UserJoined(joiner.info()));
                }
            },
        );

        match admitted {
            Ok(existing) => {
                info!(
                    "Connection {} joined room {} ({} already present)",
                    self.connection_id,
                    room_id,
                    existing.len()
                );
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    fn evict(&self) {
        let output = &self.coordinator.output;

        let left = self
            .coordinator
            .registry
            .leave_with(&self.connection_id, |departed, remaining| {
                for member in remaining {
                    output.deliver(
                        &member.connection_id,
                        ServerMessage::UserLeft {
                            connection_id: departed.connection_id,
                        },
                    );
                }
            });

        match left {
            Ok((room_id, remaining)) => info!(
                "Connection {} left room {} ({} remaining)",
                self.connection_id,
                room_id,
                remaining.len()
            ),
            Err(e) => debug!("Evict for {}: {}", self.connection_id, e),
        }
    }

    fn reject(&self, error: SignalingError) -> Result<(), SignalingError> {
        match error.code() {
            Some(code) => {
                warn!("Rejected request from {}: {}", self.connection_id, error);
                self.coordinator
                    .output
                    .deliver(&self.connection_id, ServerMessage::error(code, error.to_string()));
            }
            None => debug!("Dropped request from {}: {}", self.connection_id, error),
        }
        Err(error)
    }
}
