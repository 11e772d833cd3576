use crate::AppState;
use crate::lifecycle::ConnectionEvent;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use rendezvous_core::{ClientMessage, ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, state))
}

async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, state: Arc<AppState>) {
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let service = &state.signaling;
    service.add_connection(connection_id, tx);
    service.send_signal(&connection_id, &ServerMessage::Welcome { connection_id });
    service.send_signal(
        &connection_id,
        &ServerMessage::IceConfig {
            ice_servers: service.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    let mut handler = state.coordinator.connect(connection_id);

    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut send_task => break,
        };

        match msg {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(client_msg) => {
                        // Rejections are already reported to the client.
                        let _ = handler.handle(ConnectionEvent::from(client_msg)).await;
                    }
                    Err(e) => warn!("Invalid ClientMessage from {}: {}", connection_id, e),
                }
            }
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(Message::Binary(_))) => {
                warn!("Ignoring binary frame from {}", connection_id);
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }

        if handler.state().is_closed() {
            break;
        }
    }

    let _ = handler.handle(ConnectionEvent::Disconnect).await;
    // Dropping the last sender lets the send task flush and close the socket.
    service.remove_connection(&connection_id);

    info!("WebSocket disconnected: {}", connection_id);
}
