//! Core business logic for Khata.
//!
//! This crate contains the ledger engine with ZERO web or database dependencies.
//! Stores are reached only through the async traits in [`store`].
//!
//! # Modules
//!
//! - `catalog` - Chart of accounts: types, path rules, validation
//! - `resolver` - Ledger-path candidate sets for a logical account
//! - `ledger` - Journal entries, balance engine, trial balance
//! - `inventory` - Stock-quantity ledger for inventory items
//! - `voucher` - Voucher reference lookup for ledger rows
//! - `counterparty` - Customer and supplier directory types
//! - `store` - Store collaborator traits and the store registry

pub mod catalog;
pub mod counterparty;
pub mod inventory;
pub mod ledger;
pub mod resolver;
pub mod store;
pub mod voucher;

#[cfg(test)]
pub(crate) mod testing;
