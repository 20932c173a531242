//! Reference to-do service speaking the API the frontend consumes.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod store;

use config::ServerConfig;
use routes::AppState;
use store::{MemoryStore, RedisStore, TodoStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("backend=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let store: Arc<dyn TodoStore> = match &config.redis_url {
        Some(url) => {
            tracing::info!(%url, "using redis store");
            Arc::new(RedisStore::open(url)?)
        }
        None => {
            tracing::info!("REDIS_URL not set; using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let app = routes::router(AppState { store }, Some(config.static_dir.clone()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        static_dir = %config.static_dir.display(),
        "server running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
