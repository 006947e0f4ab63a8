//! Database migration runner for Khata.
//!
//! Usage:
//!   migrator [up]    - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The database URL comes from `KHATA__DATABASE__URL` (or the config files),
//! falling back to `DATABASE_URL`.

use anyhow::{Context, bail};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use khata_db::migration::Migrator;
use khata_shared::AppConfig;

fn database_url() -> anyhow::Result<String> {
    let configured = AppConfig::load()
        .ok()
        .and_then(|config| config.database_url().map(str::to_string));
    configured
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .context("Set KHATA__DATABASE__URL or DATABASE_URL")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khata=info,sea_orm_migration=info".into()),
        )
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());
    let db = khata_db::connect(&database_url()?).await?;

    match command.as_str() {
        "up" => Migrator::up(&db, None).await?,
        "down" => Migrator::down(&db, Some(1)).await?,
        "status" => Migrator::status(&db).await?,
        "fresh" => Migrator::fresh(&db).await?,
        other => bail!("Unknown command '{other}'; expected up, down, status or fresh"),
    }

    info!(command = %command, "Migration command finished");
    Ok(())
}
