//! Sign convention and running balances.
//!
//! - Asset/Expense: balance += debit - credit (debit-normal)
//! - Liability/Equity/Revenue: balance += credit - debit (credit-normal)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::TransactionLine;
use crate::catalog::AccountType;

/// Which side increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense).
    Debit,
    /// Credit-normal accounts (Liability, Equity, Revenue).
    Credit,
}

impl NormalBalance {
    /// Normal side of an account type.
    #[must_use]
    pub const fn for_account_type(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Asset | AccountType::Expense => Self::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => Self::Credit,
        }
    }

    /// Classifies a literal ledger path by its root segment.
    ///
    /// Used where no catalog account is at hand, e.g. the trial balance.
    #[must_use]
    pub fn for_root_segment(root: &str) -> Self {
        match root.trim().to_lowercase().as_str() {
            "assets" | "asset" | "expenses" | "expense" | "cash" | "accounts receivable"
            | "sundry debtors" | "inventory" => Self::Debit,
            _ => Self::Credit,
        }
    }

    /// Balance change for a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Balance change contributed by one line.
    #[must_use]
    pub fn line_change(self, line: &TransactionLine) -> Decimal {
        self.balance_change(line.debit(), line.credit())
    }
}

/// Balance before and after one ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Number of rows applied so far.
    pub position: usize,
    /// Balance before this row.
    pub previous_balance: Decimal,
    /// Balance after this row.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starting point, before any row is applied.
    #[must_use]
    pub const fn opening(balance: Decimal) -> Self {
        Self {
            position: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Applies the next row; `None` if the balance leaves the decimal range.
    ///
    /// `current_balance[N] = current_balance[N-1] + change`
    #[must_use]
    pub fn next(&self, balance_change: Decimal) -> Option<Self> {
        Some(Self {
            position: self.position + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance.checked_add(balance_change)?,
        })
    }
}
