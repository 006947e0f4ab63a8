//! Chart of accounts.
//!
//! Accounts form a hierarchy addressed by colon-delimited paths such as
//! `Assets:Accounts Receivable:Acme Corp`. A child's path is always its
//! parent's path plus its own name.

pub mod error;
pub mod path;
pub mod service;
pub mod types;
pub mod validation;

pub use error::CatalogError;
pub use service::CatalogService;
pub use types::{Account, AccountSubtype, AccountType, CreateAccountInput, UpdateAccountInput};
