use crate::error::SignalingError;
use crate::room::{Participant, Room};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rendezvous_core::{ConnectionId, RoomId};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct RegistryInner {
    rooms: DashMap<RoomId, Room>,
    memberships: DashMap<ConnectionId, RoomId>,
}

/// Room membership for every live connection.
///
/// Lock order is always `memberships` before `rooms`; no path holds a `rooms`
/// guard while touching `memberships`. Callbacks passed to [`join_with`] and
/// [`leave_with`] run while the room's shard is locked and must not call back
/// into the registry.
///
/// [`join_with`]: RoomRegistry::join_with
/// [`leave_with`]: RoomRegistry::leave_with
#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<RegistryInner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `connection_id` to `room_id` and returns the members that were
    /// present before it.
    pub fn join(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        display_name: String,
    ) -> Result<Vec<Participant>, SignalingError> {
        self.join_with(room_id, connection_id, display_name, |_, _| {})
    }

    /// Same as [`join`](Self::join), but runs `on_admit(joiner, existing)` inside
    /// the room's critical section, before the joiner becomes visible to others.
    pub fn join_with<F>(
        &self,
        room_id: RoomId,
        connection_id: ConnectionId,
        display_name: String,
        on_admit: F,
    ) -> Result<Vec<Participant>, SignalingError>
    where
        F: FnOnce(&Participant, &[Participant]),
    {
        let membership = match self.inner.memberships.entry(connection_id) {
            Entry::Occupied(_) => return Err(SignalingError::DuplicateConnection(connection_id)),
            Entry::Vacant(vacant) => vacant,
        };

        let mut room = self.inner.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            Room::default()
        });

        let participant = Participant {
            connection_id,
            display_name,
            room_id: room_id.clone(),
        };
        let existing = room.members().to_vec();

        on_admit(&participant, &existing);

        room.admit(participant);
        membership.insert(room_id);

        Ok(existing)
    }

    /// Removes `connection_id` from its room and returns the room together with
    /// the members still in it. The room is dropped once it is empty.
    pub fn leave(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<(RoomId, Vec<Participant>), SignalingError> {
        self.leave_with(connection_id, |_, _| {})
    }

    /// Same as [`leave`](Self::leave), but runs `on_depart(departed, remaining)`
    /// inside the room's critical section.
    pub fn leave_with<F>(
        &self,
        connection_id: &ConnectionId,
        on_depart: F,
    ) -> Result<(RoomId, Vec<Participant>), SignalingError>
    where
        F: FnOnce(&Participant, &[Participant]),
    {
        let Some((_, room_id)) = self.inner.memberships.remove(connection_id) else {
            debug!("Leave for {} ignored: not in any room", connection_id);
            return Err(SignalingError::RoomNotFound(*connection_id));
        };

        let Entry::Occupied(mut entry) = self.inner.rooms.entry(room_id.clone()) else {
            warn!(
                "Membership of {} pointed at missing room {}",
                connection_id, room_id
            );
            return Err(SignalingError::RoomNotFound(*connection_id));
        };

        let departed = entry.get_mut().remove(connection_id);
        let remaining = entry.get().members().to_vec();

        if let Some(departed) = &departed {
            on_depart(departed, &remaining);
        }

        if entry.get().is_empty() {
            entry.remove();
            info!("Room {} is empty, removing it", room_id);
        }

        Ok((room_id, remaining))
    }

    /// Snapshot of a room's members in join order. Empty for unknown rooms.
    pub fn members_of(&self, room_id: &RoomId) -> Vec<Participant> {
        self.inner
            .rooms
            .get(room_id)
            .map(|room| room.members().to_vec())
            .unwrap_or_default()
    }

    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.inner
            .memberships
            .get(connection_id)
            .map(|room_id| room_id.clone())
    }

    pub fn participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let room_id = self.room_of(connection_id)?;
        let room = self.inner.rooms.get(&room_id)?;
        room.members()
            .iter()
            .find(|p| &p.connection_id == connection_id)
            .cloned()
    }

    /// Every live room with its member count, sorted by room id.
    pub fn rooms(&self) -> Vec<(RoomId, usize)> {
        let mut rooms: Vec<_> = self
            .inner
            .rooms
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect();
        rooms.sort();
        rooms
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.inner.rooms.contains_key(room_id)
    }
}
