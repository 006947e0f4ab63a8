//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the core store traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

use std::sync::Arc;
use std::time::Duration;

pub use repositories::{
    AccountRepository, CounterpartyRepository, InventoryRepository, JournalRepository,
    VoucherRepository,
};

use khata_core::store::Stores;
use khata_core::voucher::VoucherDirectory;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}

/// Builds the store registry over one connection pool.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    let inventory = Arc::new(InventoryRepository::new(db.clone()));
    Stores {
        accounts: Arc::new(AccountRepository::new(db.clone())),
        journals: Arc::new(JournalRepository::new(db.clone())),
        counterparties: Arc::new(CounterpartyRepository::new(db.clone())),
        items: inventory.clone(),
        stock: inventory,
        vouchers: VoucherDirectory::uniform(Arc::new(VoucherRepository::new(db.clone()))),
    }
}
