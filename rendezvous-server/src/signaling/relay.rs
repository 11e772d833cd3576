use crate::error::SignalingError;
use crate::room::RoomRegistry;
use crate::signaling::SignalingOutput;
use rendezvous_core::{ConnectionId, RoomEvent, ServerMessage, SignalEnvelope};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Forwards envelopes between members of the same room. Holds no state of its
/// own; every target is resolved against the registry at send time.
#[derive(Clone)]
pub struct SignalingRelay {
    registry: RoomRegistry,
    output: Arc<dyn SignalingOutput>,
}

impl SignalingRelay {
    pub fn new(registry: RoomRegistry, output: Arc<dyn SignalingOutput>) -> Self {
        Self { registry, output }
    }

    /// Delivers `envelope` to `to_connection_id` only, stamped with the
    /// sender's id whatever the client put there. Targets outside the sender's room or
    /// already gone yield `PeerUnreachable`, which callers drop.
    pub fn relay(
        &self,
        sender: &ConnectionId,
        mut envelope: SignalEnvelope,
    ) -> Result<(), SignalingError> {
        let sender_room = self
            .registry
            .room_of(sender)
            .ok_or(SignalingError::NotJoined)?;
        let target = envelope.to_connection_id;

        if self.registry.room_of(&target).as_ref() != Some(&sender_room) {
            debug!(
                "Dropping {:?} from {} to {}: not in room {}",
                envelope.kind, sender, target, sender_room
            );
            return Err(SignalingError::PeerUnreachable(target));
        }

        envelope.from_connection_id = Some(*sender);
        let kind = envelope.kind;

        if !self.output.deliver(&target, ServerMessage::Signal(envelope)) {
            debug!("Dropping {:?} from {} to {}: peer gone", kind, sender, target);
            return Err(SignalingError::PeerUnreachable(target));
        }

        debug!("Relayed {:?} from {} to {}", kind, sender, target);
        Ok(())
    }

    /// Sends `event` to every other member of the sender's room and returns how
    /// many members it reached.
    pub fn broadcast(
        &self,
        sender: &ConnectionId,
        event: RoomEvent,
    ) -> Result<usize, SignalingError> {
        let from = self
            .registry
            .participant(sender)
            .ok_or(SignalingError::NotJoined)?;

        let event = match event {
            RoomEvent::ChatMessage { text, .. } => RoomEvent::ChatMessage {
                text,
                sent_at_ms: Some(now_ms()),
            },
            other => other,
        };

        let info = from.info();
        let mut delivered = 0;
        for member in self.registry.members_of(&from.room_id) {
            if &member.connection_id == sender {
                continue;
            }
            let msg = ServerMessage::RoomEvent {
                from: info.clone(),
                event: event.clone(),
            };
            if self.output.deliver(&member.connection_id, msg) {
                delivered += 1;
            }
        }

        debug!(
            "Broadcast room event from {} to {} member(s) of {}",
            sender, delivered, from.room_id
        );
        Ok(delivered)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
