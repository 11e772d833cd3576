use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use rendezvous_core::{ClientMessage, ConnectionId, RoomId, ServerMessage};
use rendezvous_server::{AppState, ServerConfig, router};

use crate::integration::init_tracing;
use crate::utils::offer_to;

/// Timeout for a single frame to arrive (ms).
const FRAME_TIMEOUT_MS: u64 = 2000;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> Result<(SocketAddr, Arc<AppState>)> {
    let state = Arc::new(AppState::new(&ServerConfig::default()));
    let app = router(state.clone(), None);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((addr, state))
}

async fn recv(client: &mut Client) -> Result<ServerMessage> {
    loop {
        let frame = tokio::time::timeout(Duration::from_millis(FRAME_TIMEOUT_MS), client.next())
            .await
            .context("Timeout waiting for frame")?
            .context("Socket closed")??;

        match frame {
            Message::Text(text) => return Ok(serde_json::from_str(&text)?),
            Message::Close(_) => bail!("Server closed the socket"),
            _ => continue,
        }
    }
}

async fn send(client: &mut Client, msg: &ClientMessage) -> Result<()> {
    client
        .send(Message::Text(serde_json::to_string(msg)?))
        .await?;
    Ok(())
}

/// Connect and consume the welcome + ice-config greeting.
async fn connect(addr: SocketAddr) -> Result<(Client, ConnectionId)> {
    let (mut client, _) = connect_async(format!("ws://{}/ws", addr)).await?;

    let ServerMessage::Welcome { connection_id } = recv(&mut client).await? else {
        bail!("expected welcome first");
    };
    let ServerMessage::IceConfig { ice_servers } = recv(&mut client).await? else {
        bail!("expected ice-config second");
    };
    assert!(!ice_servers.is_empty());

    Ok((client, connection_id))
}

async fn join(client: &mut Client, room: &str, name: &str) -> Result<Vec<ConnectionId>> {
    send(
        client,
        &ClientMessage::JoinRoom {
            room_id: RoomId::from(room),
            display_name: name.to_string(),
        },
    )
    .await?;

    match recv(client).await? {
        ServerMessage::AllUsers(members) => Ok(members.iter().map(|m| m.connection_id).collect()),
        other => bail!("expected all-users, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ws_round_trip() {
    init_tracing();

    let (addr, state) = spawn_server().await.expect("server failed to start");

    let (mut a, id_a) = connect(addr).await.expect("A failed to connect");
    assert!(join(&mut a, "abc", "A").await.expect("A join failed").is_empty());

    let (mut b, id_b) = connect(addr).await.expect("B failed to connect");
    assert_eq!(join(&mut b, "abc", "B").await.expect("B join failed"), vec![id_a]);

    match recv(&mut a).await.expect("A missed user-joined") {
        ServerMessage::UserJoined(info) => {
            assert_eq!(info.connection_id, id_b);
            assert_eq!(info.display_name, "B");
        }
        other => panic!("expected user-joined, got {:?}", other),
    }

    send(&mut b, &ClientMessage::Signal(offer_to(id_a)))
        .await
        .expect("B send failed");
    match recv(&mut a).await.expect("A missed the offer") {
        ServerMessage::Signal(envelope) => assert_eq!(envelope.from_connection_id, Some(id_b)),
        other => panic!("expected signal, got {:?}", other),
    }

    // Garbage is dropped without closing the connection.
    a.send(Message::Text("{not json".into()))
        .await
        .expect("A send failed");
    send(&mut a, &ClientMessage::Signal(offer_to(id_b)))
        .await
        .expect("A send failed");
    match recv(&mut b).await.expect("B missed the offer") {
        ServerMessage::Signal(envelope) => assert_eq!(envelope.from_connection_id, Some(id_a)),
        other => panic!("expected signal, got {:?}", other),
    }

    b.close(None).await.expect("B close failed");
    match recv(&mut a).await.expect("A missed user-left") {
        ServerMessage::UserLeft { connection_id } => assert_eq!(connection_id, id_b),
        other => panic!("expected user-left, got {:?}", other),
    }
    assert_eq!(
        state.coordinator.registry().members_of(&"abc".into()).len(),
        1
    );
}

#[tokio::test]
async fn test_ws_signal_before_join_gets_error() {
    init_tracing();

    let (addr, _state) = spawn_server().await.expect("server failed to start");
    let (mut a, _) = connect(addr).await.expect("A failed to connect");

    send(&mut a, &ClientMessage::Signal(offer_to(ConnectionId::new())))
        .await
        .expect("send failed");

    match recv(&mut a).await.expect("no reply") {
        ServerMessage::Error { code, .. } => {
            assert_eq!(code, rendezvous_core::ErrorCode::NotJoined)
        }
        other => panic!("expected error, got {:?}", other),
    }

    // Still usable afterwards.
    assert!(join(&mut a, "abc", "A").await.expect("join failed").is_empty());
}
