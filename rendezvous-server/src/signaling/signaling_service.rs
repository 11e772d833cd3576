use crate::signaling::SignalingOutput;
use axum::extract::ws::Message;
use dashmap::DashMap;
use rendezvous_core::{ConnectionId, IceServerConfig, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Table of live WebSocket outboxes, keyed by connection id.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
                ice_servers,
            }),
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_connection(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(connection_id, tx);
    }

    pub fn remove_connection(&self, connection_id: &ConnectionId) {
        self.inner.connections.remove(connection_id);
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.inner.connections.contains_key(connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn send_signal(&self, connection_id: &ConnectionId, msg: &ServerMessage) -> bool {
        let Some(conn) = self.inner.connections.get(connection_id) else {
            debug!(
                "Attempted to send {:?} to disconnected connection {}",
                msg, connection_id
            );
            return false;
        };

        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = conn.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", connection_id, e);
                    return false;
                }
                true
            }
            Err(e) => {
                error!("Failed to serialize signal message: {}", e);
                false
            }
        }
    }
}

impl SignalingOutput for SignalingService {
    fn deliver(&self, connection_id: &ConnectionId, message: ServerMessage) -> bool {
        self.send_signal(connection_id, &message)
    }
}
