use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::room::index::RoomIndex;
use crate::room::repository::RoomStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_store: Arc<dyn RoomStore + Send + Sync>,
    pub room_index: Arc<dyn RoomIndex + Send + Sync>,
}

impl AppState {
    pub fn new(
        room_store: Arc<dyn RoomStore + Send + Sync>,
        room_index: Arc<dyn RoomIndex + Send + Sync>,
    ) -> Self {
        Self {
            room_store,
            room_index,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Search index error: {0}")]
    IndexError(String),

    /// The room was stored but its index entry was not written.
    #[error("Room {room_id} stored but not indexed: {message}")]
    IndexWrite { room_id: String, message: String },

    /// The index returned an id the store does not know about.
    #[error("Index entry {room_id} has no stored room")]
    IndexInconsistent { room_id: String },

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_)
            | AppError::IndexError(_)
            | AppError::IndexWrite { .. }
            | AppError::IndexInconsistent { .. }
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
