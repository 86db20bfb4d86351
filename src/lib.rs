// Library crate for the room add/search service
// This file exposes the public API for the binaries and integration tests

pub mod client;
pub mod config;
pub mod extract;
pub mod room;
pub mod routes;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use client::{ClientError, RoomClient};
pub use config::{Config, ConfigError};
pub use room::{
    index::{InMemoryRoomIndex, RoomIndex},
    models::RoomModel,
    repository::{InMemoryRoomStore, RoomStore},
};
pub use shared::{AppError, AppState};
