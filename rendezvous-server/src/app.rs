use crate::config::ServerConfig;
use crate::lifecycle::Coordinator;
use crate::signaling::{SignalingService, ws_handler};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use rendezvous_core::{ParticipantInfo, RoomId};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

pub struct AppState {
    pub signaling: SignalingService,
    pub coordinator: Coordinator,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let signaling = SignalingService::new(config.ice_servers.clone());
        let coordinator = Coordinator::new(Arc::new(signaling.clone()), config.directory());

        Self {
            signaling,
            coordinator,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub member_count: usize,
}

pub fn router(state: Arc<AppState>, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/rooms", get(list_rooms))
        .route("/rooms/{room_id}", get(room_members))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS origin: {}", e);
            cors.allow_origin(Any)
        }
        None => cors.allow_origin(Any),
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    let rooms = state
        .coordinator
        .registry()
        .rooms()
        .into_iter()
        .map(|(room_id, member_count)| RoomSummary {
            room_id,
            member_count,
        })
        .collect();

    Json(rooms)
}

async fn room_members(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ParticipantInfo>>, StatusCode> {
    let members = state.coordinator.registry().members_of(&RoomId::from(room_id));
    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(members.iter().map(|p| p.info()).collect()))
}
