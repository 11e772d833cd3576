use rendezvous_core::ConnectionId;
use rendezvous_server::ConnectionEvent;

use crate::integration::{create_test_coordinator, init_tracing};
use crate::utils::{join, offer_to, signals_for};

#[tokio::test]
async fn test_relay_to_departed_peer() {
    init_tracing();

    let (coordinator, signaling) = create_test_coordinator();
    let mut a = coordinator.connect(ConnectionId::new());
    let mut b = coordinator.connect(ConnectionId::new());
    let mut x = coordinator.connect(ConnectionId::new());
    let mut y = coordinator.connect(ConnectionId::new());
    join(&mut a, &signaling, "abc", "A").await.expect("join failed");
    join(&mut b, &signaling, "abc", "B").await.expect("join failed");
    join(&mut x, &signaling, "xyz", "X").await.expect("join failed");
    join(&mut y, &signaling, "xyz", "Y").await.expect("join failed");
    b.handle(ConnectionEvent::Disconnect).await.expect("disconnect failed");
    let before = signaling.messages_for(&a.connection_id()).len();

    let result = a
        .handle(ConnectionEvent::Signal(offer_to(b.connection_id())))
        .await;

    assert!(result.is_ok(), "dropped relays are not errors");
    assert_eq!(
        signaling.messages_for(&a.connection_id()).len(),
        before,
        "sender is not told about the drop"
    );
    assert!(signals_for(&signaling, &b.connection_id()).is_empty());

    // Other rooms are untouched.
    assert_eq!(coordinator.registry().members_of(&"xyz".into()).len(), 2);
    x.handle(ConnectionEvent::Signal(offer_to(y.connection_id())))
        .await
        .expect("relay failed");
    assert_eq!(signals_for(&signaling, &y.connection_id()).len(), 1);
}

#[tokio::test]
async fn test_relay_when_transport_vanished_before_leave() {
    init_tracing();

    let (coordinator, signaling) = create_test_coordinator();
    let mut a = coordinator.connect(ConnectionId::new());
    let mut b = coordinator.connect(ConnectionId::new());
    join(&mut a, &signaling, "abc", "A").await.expect("join failed");
    join(&mut b, &signaling, "abc", "B").await.expect("join failed");

    // Socket is gone but the disconnect event has not been processed yet.
    signaling.drop_transport(&b.connection_id());

    let result = a
        .handle(ConnectionEvent::Signal(offer_to(b.connection_id())))
        .await;

    assert!(result.is_ok());
    assert!(signals_for(&signaling, &b.connection_id()).is_empty());
}

#[tokio::test]
async fn test_relay_across_rooms_is_dropped() {
    init_tracing();

    let (coordinator, signaling) = create_test_coordinator();
    let mut a = coordinator.connect(ConnectionId::new());
    let mut x = coordinator.connect(ConnectionId::new());
    join(&mut a, &signaling, "abc", "A").await.expect("join failed");
    join(&mut x, &signaling, "xyz", "X").await.expect("join failed");

    let result = a
        .handle(ConnectionEvent::Signal(offer_to(x.connection_id())))
        .await;

    assert!(result.is_ok());
    assert!(signals_for(&signaling, &x.connection_id()).is_empty());
}
