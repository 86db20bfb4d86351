use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request payload for adding a room
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddRoomRequest {
    pub name: String,
}

/// Response for room creation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AddRoomResponse {
    #[serde(rename = "RoomID")]
    pub room_id: String,
}

/// Request payload for searching rooms by name
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRoomRequest {
    pub name: String,
}

/// A single search hit as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RoomInfo {
    pub name: String,
    pub create_time: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRoomResponse {
    pub rooms: Vec<RoomInfo>,
}
