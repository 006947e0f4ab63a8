//! Ledger error types for validation and state errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use khata_shared::AppError;
use khata_shared::types::JournalEntryId;

use crate::inventory::InventoryError;
use crate::store::StoreError;

/// Errors that can occur during ledger operations.
///
/// Line numbers in messages are 1-based.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal memo is blank.
    #[error("Memo is required")]
    MissingMemo,

    /// Journal has no lines.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// Line has a blank account path.
    #[error("Line {line}: account is required")]
    MissingAccountPath {
        /// Line number.
        line: usize,
    },

    /// Line type is neither debit nor credit.
    #[error("Line {line}: type must be 'debit' or 'credit', got '{value}'")]
    InvalidEntryType {
        /// Line number.
        line: usize,
        /// Submitted value.
        value: String,
    },

    /// Line amount is not a number.
    #[error("Line {line}: amount '{value}' is not a number")]
    InvalidAmount {
        /// Line number.
        line: usize,
        /// Submitted value.
        value: String,
    },

    /// Line amount is zero or negative.
    #[error("Line {line}: amount must be positive")]
    NonPositiveAmount {
        /// Line number.
        line: usize,
    },

    /// Debit or credit total does not fit in a decimal.
    #[error("Journal totals exceed the supported amount range")]
    AmountOverflow,

    /// Start date after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Range start.
        start: DateTime<Utc>,
        /// Range end.
        end: DateTime<Utc>,
    },

    // ========== Balance Errors ==========
    /// Debits and credits differ and the entry could not be auto-balanced.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// A balance over stored lines does not fit in a decimal.
    #[error("Balance for {0} exceeds the supported amount range")]
    BalanceOverflow(String),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    JournalEntryNotFound(JournalEntryId),

    // ========== State Errors ==========
    /// Entry is already voided.
    #[error("Journal entry {0} is already voided")]
    AlreadyVoided(JournalEntryId),

    // ========== Wrapped Errors ==========
    /// Inventory ledger failure.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMemo => "MISSING_MEMO",
            Self::NoLines => "NO_LINES",
            Self::MissingAccountPath { .. } => "MISSING_ACCOUNT_PATH",
            Self::InvalidEntryType { .. } => "INVALID_ENTRY_TYPE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::JournalEntryNotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::AlreadyVoided(_) => "ALREADY_VOIDED",
            Self::Inventory(e) => e.error_code(),
            Self::Store(StoreError::Conflict(_)) => "CONFLICT",
            Self::Store(StoreError::Database(_)) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and balance errors
            Self::MissingMemo
            | Self::NoLines
            | Self::MissingAccountPath { .. }
            | Self::InvalidEntryType { .. }
            | Self::InvalidAmount { .. }
            | Self::NonPositiveAmount { .. }
            | Self::AmountOverflow
            | Self::InvalidDateRange { .. }
            | Self::UnbalancedEntry { .. } => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::JournalEntryNotFound(_) => 404,

            // 422 Unprocessable - stored data cannot be summed
            Self::BalanceOverflow(_) => 422,

            // 409 Conflict
            Self::AlreadyVoided(_) | Self::Store(StoreError::Conflict(_)) => 409,

            Self::Inventory(e) => e.http_status_code(),

            // 500 Internal Server Error
            Self::Store(StoreError::Database(_)) => 500,
        }
    }

    /// Returns true for store failures, the only environment faults.
    #[must_use]
    pub fn is_store_failure(&self) -> bool {
        self.http_status_code() >= 500
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match (&err, err.http_status_code()) {
            (LedgerError::UnbalancedEntry { .. }, _) => Self::Unbalanced(err.to_string()),
            (_, 400) => Self::Validation(err.to_string()),
            (_, 404) => Self::NotFound(err.to_string()),
            (_, 409) => Self::Conflict(err.to_string()),
            (_, 422) => Self::Internal(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
