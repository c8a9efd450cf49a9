//! Gridline server binary.
//!
//! Binds to the address given as the first argument (default
//! `127.0.0.1:8080`) and serves rooms until terminated. Log verbosity
//! follows `RUST_LOG`.

use gridline::{GridlineError, GridlineServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GridlineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let server = GridlineServer::builder().bind(&addr).build().await?;
    tracing::info!(%addr, "serving rooms at ws://{addr}/ws/{{room_id}}");
    server.run().await
}
