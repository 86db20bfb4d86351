// Public API - what other modules can use
pub use handlers::{add_room, search_room};
pub use service::RoomService;

// Internal modules
mod handlers;
pub mod index;
pub mod models;
pub mod repository;
mod service;
pub mod types;
