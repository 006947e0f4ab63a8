//! Repository implementations of the core store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod counterparty;
pub mod inventory;
pub mod journal;
pub mod voucher;

pub use account::AccountRepository;
pub use counterparty::CounterpartyRepository;
pub use inventory::InventoryRepository;
pub use journal::JournalRepository;
pub use voucher::VoucherRepository;

use std::ops::Bound;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, DbErr, SqlErr};

use khata_core::store::StoreError;

/// Maps a database error onto the store boundary.
///
/// Unique violations become [`StoreError::Conflict`]; everything else is a
/// database failure.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Database(err.to_string()),
    }
}

/// A stored value that no longer parses into its domain type.
pub(crate) fn corrupt(column: &str, value: &str) -> StoreError {
    StoreError::Database(format!("invalid {column} value in database: {value}"))
}

/// Translates datetime bounds into a condition on `column`.
pub(crate) fn date_bounds<C: ColumnTrait>(
    column: C,
    since: &Bound<DateTime<Utc>>,
    until: &Bound<DateTime<Utc>>,
) -> Condition {
    let cond = match since {
        Bound::Included(start) => Condition::all().add(column.gte(*start)),
        Bound::Excluded(start) => Condition::all().add(column.gt(*start)),
        Bound::Unbounded => Condition::all(),
    };
    match until {
        Bound::Included(end) => cond.add(column.lte(*end)),
        Bound::Excluded(end) => cond.add(column.lt(*end)),
        Bound::Unbounded => cond,
    }
}
