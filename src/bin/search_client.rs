//! Adds a room through the HTTP API and searches for it by name.

use clap::Parser;
use roomsearch::client::RoomClient;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "search_client", about = "Exercise the room add/search API")]
struct Args {
    /// Host of the target server (ex. localhost:8080)
    #[arg(long)]
    host: String,

    /// Use https instead of http
    #[arg(long)]
    secure: bool,

    /// Name of the room to add and then search for
    #[arg(long, default_value = "aardvark")]
    name: String,

    /// Number of searches to make before giving up on a match
    #[arg(long, default_value_t = 1)]
    poll_attempts: u32,

    /// Pause between searches, in milliseconds
    #[arg(long, default_value_t = 500)]
    poll_interval_ms: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomsearch=info,search_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let client = RoomClient::for_host(&args.host, args.secure);

    let added = match client.add_room(&args.name).await {
        Ok(added) => added,
        Err(e) => {
            error!(error = %e, "Failed to add room");
            std::process::exit(1);
        }
    };
    info!(room_id = %added.room_id, "Added room");

    let found = match client
        .search_until_found(
            &args.name,
            args.poll_attempts,
            Duration::from_millis(args.poll_interval_ms),
        )
        .await
    {
        Ok(found) => found,
        Err(e) => {
            error!(error = %e, "Failed to search room");
            std::process::exit(1);
        }
    };

    info!("Got {} search match.", found.rooms.len());
    for room in &found.rooms {
        info!(create_time = %room.create_time, "{}", room.name);
    }
}
