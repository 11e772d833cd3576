use async_trait::async_trait;
use rendezvous_core::RoomId;
use std::collections::HashSet;

/// Meeting store consulted once per join, before the room is touched.
#[async_trait]
pub trait MeetingDirectory: Send + Sync {
    async fn meeting_exists(&self, room_id: &RoomId) -> bool;
}

/// Accepts every room id. Rooms are created on first join.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenDirectory;

#[async_trait]
impl MeetingDirectory for OpenDirectory {
    async fn meeting_exists(&self, _room_id: &RoomId) -> bool {
        true
    }
}

/// Accepts only a fixed set of meeting ids.
#[derive(Debug, Default, Clone)]
pub struct AllowListDirectory {
    meetings: HashSet<RoomId>,
}

impl AllowListDirectory {
    pub fn new(meetings: impl IntoIterator<Item = RoomId>) -> Self {
        Self {
            meetings: meetings.into_iter().collect(),
        }
    }
}

#[async_trait]
impl MeetingDirectory for AllowListDirectory {
    async fn meeting_exists(&self, room_id: &RoomId) -> bool {
        self.meetings.contains(room_id)
    }
}
