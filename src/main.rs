use roomsearch::{
    config::Config,
    room::{
        index::InMemoryRoomIndex,
        repository::{InMemoryRoomStore, PostgresRoomStore, RoomStore},
    },
    routes,
    shared::AppState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomsearch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        postgres = config.database_url.is_some(),
        index_visibility_delay = ?config.index_visibility_delay,
        "Starting room search server"
    );

    let room_store: Arc<dyn RoomStore + Send + Sync> = match &config.database_url {
        Some(database_url) => Arc::new(PostgresRoomStore::connect(database_url).await?),
        None => Arc::new(InMemoryRoomStore::new()),
    };
    let room_index = Arc::new(InMemoryRoomIndex::with_visibility_delay(
        config.index_visibility_delay,
    ));

    let app_state = AppState::new(room_store, room_index);
    let app = routes::app(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
