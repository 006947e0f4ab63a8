//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for accounts, ledgers, journal entries and stock
//! - The organization-scope extractor
//! - The JSON error envelope
//!
//! Handlers reach storage only through the services in `khata-core`, so the
//! same router serves the Postgres and the in-memory backends.

pub mod error;
pub mod extractors;
pub mod routes;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use khata_core::catalog::CatalogService;
use khata_core::ledger::LedgerService;
use khata_core::store::Stores;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chart of accounts.
    pub catalog: CatalogService,
    /// Ledgers, journal entries, trial balance and stock.
    pub ledger: LedgerService,
    /// Name of the store backend, reported by the health check.
    pub backend: &'static str,
}

impl AppState {
    /// Builds every service over one store registry.
    #[must_use]
    pub fn new(stores: Stores, backend: &'static str) -> Self {
        Self {
            catalog: CatalogService::new(stores.accounts.clone()),
            ledger: LedgerService::new(stores),
            backend,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
