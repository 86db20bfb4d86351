use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rooms table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: String, // UUID v4 assigned by the store, never reused
    pub name: String,
    pub create_time: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a new room model with a freshly generated ID
    pub fn new(name: String, create_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            create_time,
        }
    }
}
