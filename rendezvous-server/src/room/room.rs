use rendezvous_core::{ConnectionId, ParticipantInfo, RoomId};

/// A connection that has been admitted to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: String,
    pub room_id: RoomId,
}

impl Participant {
    pub fn info(&self) -> ParticipantInfo {
        ParticipantInfo {
            connection_id: self.connection_id,
            display_name: self.display_name.clone(),
        }
    }
}

/// Members of one meeting, kept in join order so that "who is already here"
/// is answered deterministically.
#[derive(Debug, Default)]
pub struct Room {
    members: Vec<Participant>,
}

impl Room {
    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn admit(&mut self, participant: Participant) {
        self.members.push(participant);
    }

    pub(crate) fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let index = self
            .members
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }
}
