//! `SeaORM` entity definitions.

pub mod chart_of_accounts;
pub mod customers;
pub mod items;
pub mod journal_entries;
pub mod stock_entries;
pub mod suppliers;
pub mod transaction_lines;
pub mod vouchers;
