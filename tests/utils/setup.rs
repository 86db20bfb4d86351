use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use roomsearch::{routes, AppState, InMemoryRoomIndex, InMemoryRoomStore, RoomClient};

// ============================================================================
// Test Server Infrastructure
// ============================================================================

pub struct TestServer {
    pub client: RoomClient,
    pub room_store: Arc<InMemoryRoomStore>,
    pub room_index: Arc<InMemoryRoomIndex>,
    server_handle: JoinHandle<()>,
}

pub struct TestServerBuilder {
    visibility_delay: Duration,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            visibility_delay: Duration::ZERO,
        }
    }

    pub fn with_visibility_delay(mut self, delay: Duration) -> Self {
        self.visibility_delay = delay;
        self
    }

    /// Serves the real router on an ephemeral local port
    pub async fn start(self) -> TestServer {
        let room_store = Arc::new(InMemoryRoomStore::new());
        let room_index = Arc::new(InMemoryRoomIndex::with_visibility_delay(
            self.visibility_delay,
        ));
        let app = routes::app(AppState::new(room_store.clone(), room_index.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            client: RoomClient::new(format!("http://{}", addr)),
            room_store,
            room_index,
            server_handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}
