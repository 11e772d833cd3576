use crate::directory::{AllowListDirectory, MeetingDirectory, OpenDirectory};
use rendezvous_core::{IceServerConfig, RoomId};
use std::net::SocketAddr;
use std::sync::Arc;

pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub ice_servers: Vec<IceServerConfig>,
    /// Empty means every meeting id is accepted.
    pub allowed_meetings: Vec<RoomId>,
    /// `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5001)),
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_SERVER.to_owned()],
                username: None,
                credential: None,
            }],
            allowed_meetings: Vec::new(),
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn directory(&self) -> Arc<dyn MeetingDirectory> {
        if self.allowed_meetings.is_empty() {
            Arc::new(OpenDirectory)
        } else {
            Arc::new(AllowListDirectory::new(self.allowed_meetings.iter().cloned()))
        }
    }
}
