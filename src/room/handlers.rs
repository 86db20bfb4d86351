use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::RoomService,
    types::{AddRoomRequest, AddRoomResponse, SearchRoomRequest, SearchRoomResponse},
};
use crate::extract::JsonBody;
use crate::shared::{AppError, AppState};

/// HTTP handler for adding a room
///
/// POST /api/room
/// Returns the id the store assigned to the new room
#[instrument(name = "add_room", skip(state))]
pub async fn add_room(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AddRoomRequest>,
) -> Result<Json<AddRoomResponse>, AppError> {
    info!(name = %request.name, "Adding room");

    let service = RoomService::new(
        Arc::clone(&state.room_store),
        Arc::clone(&state.room_index),
    );
    let response = service.add_room(request).await?;

    Ok(Json(response))
}

/// HTTP handler for searching rooms by exact name
///
/// POST /api/room/search
#[instrument(name = "search_room", skip(state))]
pub async fn search_room(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRoomRequest>,
) -> Result<Json<SearchRoomResponse>, AppError> {
    info!(name = %request.name, "Searching rooms");

    let service = RoomService::new(
        Arc::clone(&state.room_store),
        Arc::clone(&state.room_index),
    );
    let response = service.search_rooms(request).await?;

    info!(room_count = response.rooms.len(), "Rooms searched successfully");

    Ok(Json(response))
}
