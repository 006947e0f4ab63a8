//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod journal_entries;
pub mod ledger;
pub mod stock_entries;
pub mod trial_balance;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(ledger::routes())
        .merge(journal_entries::routes())
        .merge(trial_balance::routes())
        .merge(stock_entries::routes())
}
