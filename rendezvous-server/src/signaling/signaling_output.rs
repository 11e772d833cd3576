use rendezvous_core::{ConnectionId, ServerMessage};

/// Outbound side of the transport, so the coordinator can reach a connection
/// by id without owning sockets.
///
/// `deliver` is called while a room lock is held and must only enqueue.
pub trait SignalingOutput: Send + Sync {
    /// Queue `message` for `connection_id`. Returns `false` when the connection
    /// is no longer registered.
    fn deliver(&self, connection_id: &ConnectionId, message: ServerMessage) -> bool;
}
