//! Khata API Server
//!
//! Main entry point for the Khata ledger service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use khata_api::{AppState, create_router};
use khata_core::store::{Stores, memory::MemoryStore};
use khata_shared::{AppConfig, StoreBackend};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "khata=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_stores(config: &AppConfig) -> anyhow::Result<(Stores, &'static str)> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url()
                .context("database.url is required for the postgres backend")?;
            let db = khata_db::connect_with_pool(
                url,
                config.database.max_connections,
                config.database.min_connections,
            )
            .await
            .context("Failed to connect to database")?;
            info!("Connected to database");
            Ok((khata_db::stores(&db), "postgres"))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Ok((MemoryStore::stores(Arc::new(MemoryStore::new())), "memory"))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.logging.json);

    let (stores, backend) = build_stores(&config).await?;
    let app = create_router(AppState::new(stores, backend));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(backend, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
