use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::room::types::{AddRoomRequest, AddRoomResponse, SearchRoomRequest, SearchRoomResponse};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Got an unexpected response: {0}")]
    UnexpectedStatus(u16),
}

/// HTTP client for the room API
#[derive(Debug, Clone)]
pub struct RoomClient {
    base_url: String,
    http: reqwest::Client,
}

impl RoomClient {
    /// `base_url` is scheme plus host, e.g. `http://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Builds the base URL from a host and a TLS switch
    pub fn for_host(host: &str, secure: bool) -> Self {
        let protocol = if secure { "https" } else { "http" };
        Self::new(format!("{}://{}", protocol, host))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    pub async fn add_room(&self, name: &str) -> Result<AddRoomResponse, ClientError> {
        let request = AddRoomRequest {
            name: name.to_string(),
        };
        self.post_json("/api/room", &request).await
    }

    #[instrument(skip(self))]
    pub async fn search_rooms(&self, name: &str) -> Result<SearchRoomResponse, ClientError> {
        let request = SearchRoomRequest {
            name: name.to_string(),
        };
        self.post_json("/api/room/search", &request).await
    }

    /// Repeats the search until it returns at least one room
    ///
    /// Returns the last response, which is empty if every attempt came back
    /// empty. At least one search is always made.
    #[instrument(skip(self))]
    pub async fn search_until_found(
        &self,
        name: &str,
        attempts: u32,
        interval: Duration,
    ) -> Result<SearchRoomResponse, ClientError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            let response = self.search_rooms(name).await?;
            if !response.rooms.is_empty() || attempt >= attempts {
                info!(
                    attempt,
                    matches = response.rooms.len(),
                    "Search finished"
                );
                return Ok(response);
            }

            debug!(attempt, "No match yet, retrying search");
            attempt += 1;
            tokio::time::sleep(interval).await;
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "Got an unexpected response");
            return Err(ClientError::UnexpectedStatus(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}
