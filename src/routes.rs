use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::room;
use crate::shared::AppState;

/// Builds the route table for the room API
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/room", post(room::add_room))
        .route("/api/room/search", post(room::search_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
