use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    index::{IndexEntry, NameQuery, RoomIndex},
    repository::RoomStore,
    types::{AddRoomRequest, AddRoomResponse, RoomInfo, SearchRoomRequest, SearchRoomResponse},
};
use crate::shared::AppError;

/// Service for the add/search round trip over the store and the index
pub struct RoomService {
    store: Arc<dyn RoomStore + Send + Sync>,
    index: Arc<dyn RoomIndex + Send + Sync>,
}

impl RoomService {
    pub fn new(
        store: Arc<dyn RoomStore + Send + Sync>,
        index: Arc<dyn RoomIndex + Send + Sync>,
    ) -> Self {
        Self { store, index }
    }

    /// Stores a room, then indexes it under the same id
    ///
    /// The two writes are not atomic. If the index write fails the room stays
    /// in the store and is invisible to search; the error names the room id.
    #[instrument(skip(self))]
    pub async fn add_room(&self, request: AddRoomRequest) -> Result<AddRoomResponse, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::BadRequest("Room name must not be empty".to_string()));
        }

        let create_time = Utc::now();
        let room_id = self.store.insert_room(&request.name, create_time).await?;
        debug!(room_id = %room_id, "Room stored");

        let entry = IndexEntry {
            id: room_id.clone(),
            name: request.name,
            create_time,
        };
        if let Err(e) = self.index.put_entry(&entry).await {
            warn!(
                room_id = %room_id,
                error = %e,
                "Room stored but index write failed; room is not searchable"
            );
            return Err(AppError::IndexWrite {
                room_id,
                message: e.to_string(),
            });
        }

        info!(room_id = %room_id, name = %entry.name, "Room added");
        Ok(AddRoomResponse { room_id })
    }

    /// Looks up matching ids in the index and joins them against the store
    #[instrument(skip(self))]
    pub async fn search_rooms(
        &self,
        request: SearchRoomRequest,
    ) -> Result<SearchRoomResponse, AppError> {
        let query = NameQuery::new(request.name);
        let results = self.index.search(&query).await?;
        info!(query = %query, count = results.count, "Search count");

        let mut rooms = Vec::with_capacity(results.ids.len());
        for room_id in results.ids {
            let room = match self.store.get_room(&room_id).await? {
                Some(room) => room,
                None => {
                    error!(room_id = %room_id, "Index returned a room missing from the store");
                    return Err(AppError::IndexInconsistent { room_id });
                }
            };

            rooms.push(RoomInfo {
                name: room.name,
                create_time: room.create_time,
            });
        }

        Ok(SearchRoomResponse { rooms })
    }
}
