use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::RoomModel;
use crate::shared::AppError;

/// Trait for durable room storage
///
/// The store owns identifier generation: callers hand over the fields and
/// get back the id the room was stored under.
#[async_trait]
pub trait RoomStore {
    async fn insert_room(&self, name: &str, create_time: DateTime<Utc>)
        -> Result<String, AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError>;
}

/// In-memory implementation of RoomStore for development and testing
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of stored rooms
    pub fn room_count(&self) -> usize {
        self.rooms.lock().expect("room store lock poisoned").len()
    }

    /// Removes a room without touching any index entry pointing at it
    pub fn remove_room(&self, room_id: &str) -> Option<RoomModel> {
        self.rooms
            .lock()
            .expect("room store lock poisoned")
            .remove(room_id)
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    #[instrument(skip(self))]
    async fn insert_room(
        &self,
        name: &str,
        create_time: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let room = RoomModel::new(name.to_string(), create_time);
        debug!(room_id = %room.id, name = %room.name, "Storing room in memory");

        let mut rooms = self.rooms.lock().map_err(|_| AppError::Internal)?;
        if rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room id already in use");
            return Err(AppError::DatabaseError("Room already exists".to_string()));
        }
        let room_id = room.id.clone();
        rooms.insert(room_id.clone(), room);

        debug!(room_id = %room_id, "Room stored successfully in memory");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        debug!(room_id = %room_id, "Fetching room from memory");

        let rooms = self.rooms.lock().map_err(|_| AppError::Internal)?;
        let room = rooms.get(room_id).cloned();

        match &room {
            Some(r) => debug!(room_id = %room_id, name = %r.name, "Room found in memory"),
            None => debug!(room_id = %room_id, "Room not found in memory"),
        }

        Ok(room)
    }
}

/// Schema migrations for the Postgres store, embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL implementation of room store
pub struct PostgresRoomStore {
    pool: PgPool,
}

impl PostgresRoomStore {
    /// Wraps a pool whose schema is already migrated
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and brings the `rooms` table up to date
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await.map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })?;

        MIGRATOR.run(&pool).await.map_err(|e| {
            warn!(error = %e, "Failed to run database migrations");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!("Database migrations applied");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RoomStore for PostgresRoomStore {
    #[instrument(skip(self))]
    async fn insert_room(
        &self,
        name: &str,
        create_time: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let room = RoomModel::new(name.to_string(), create_time);
        debug!(room_id = %room.id, name = %room.name, "Storing room in database");

        sqlx::query("INSERT INTO rooms (id, name, create_time) VALUES ($1, $2, $3)")
            .bind(&room.id)
            .bind(&room.name)
            .bind(room.create_time)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to store room in database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(room_id = %room.id, "Room stored successfully in database");
        Ok(room.id)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<RoomModel>, AppError> {
        debug!(room_id = %room_id, "Fetching room from database");

        let row = sqlx::query("SELECT id, name, create_time FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to fetch room from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let room = match row {
            Some(row) => {
                let room = RoomModel {
                    id: row.get("id"),
                    name: row.get("name"),
                    create_time: row.get("create_time"),
                };
                debug!(room_id = %room_id, name = %room.name, "Room found in database");
                Some(room)
            }
            None => {
                debug!(room_id = %room_id, "Room not found in database");
                None
            }
        };

        Ok(room)
    }
}
