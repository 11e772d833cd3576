use rendezvous_core::{ConnectionId, SignalKind};
use rendezvous_server::ConnectionEvent;

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{ice_candidate_to, join, signals_for};

#[tokio::test]
async fn test_ice_candidate_exchange() {
    init_tracing();

    let (coordinator, signaling) = create_test_coordinator();
    let mut a = coordinator.connect(ConnectionId::new());
    let mut b = coordinator.connect(ConnectionId::new());
    join(&mut a, &signaling, "abc", "A").await.expect("join failed");
    join(&mut b, &signaling, "abc", "B").await.expect("join failed");

    let candidates = [
        "candidate:1 1 udp 2122260223 192.168.1.10 54400 typ host",
        "candidate:2 1 udp 1686052607 203.0.113.7 54400 typ srflx",
        "candidate:3 1 tcp 1518280447 192.168.1.10 9 typ host tcptype active",
    ];
    for candidate in candidates {
        a.handle(ConnectionEvent::Signal(ice_candidate_to(
            b.connection_id(),
            candidate,
        )))
        .await
        .expect("relay failed");
    }

    let received = signals_for(&signaling, &b.connection_id());
    assert_eq!(received.len(), candidates.len());

    // FIFO between one pair of peers.
    for (envelope, candidate) in received.iter().zip(candidates) {
        assert_eq!(envelope.kind, SignalKind::IceCandidate);
        assert_eq!(envelope.from_connection_id, Some(a.connection_id()));
        assert_eq!(envelope.payload["candidate"], candidate);
    }
}
