//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction lines and journal entries (debits and credits)
//! - Normal-balance sign rules and running balances
//! - The balance engine producing opening, per-row and closing balances
//! - The journal writer that validates and balances submitted entries
//! - Trial balance over literal ledger paths
//! - The ledger service tying resolution, stores and the engine together

pub mod balance;
pub mod engine;
pub mod entry;
pub mod error;
pub mod journal;
pub mod service;
pub mod trial_balance;
pub mod types;
pub mod writer;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod writer_props;

pub use balance::{NormalBalance, RunningBalance};
pub use entry::{LineMeta, Side, TransactionLine, meta_keys};
pub use error::LedgerError;
pub use journal::{JournalEntry, JournalStatus};
pub use service::{LedgerService, LedgerView};
pub use trial_balance::{TrialBalance, TrialBalanceRow, TrialBalanceTotals};
pub use types::{
    BALANCE_TOLERANCE, CreateJournalEntryInput, DateRange, JournalLineInput, JournalTotals,
    LedgerReport, LedgerRow,
};
pub use writer::{AutoBalance, DraftJournal, DraftLine};
