//! Trial balance per literal ledger path.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::balance::NormalBalance;
use super::entry::TransactionLine;
use super::types::BALANCE_TOLERANCE;
use crate::catalog::path;

/// Totals for one literal ledger path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    /// Literal path as posted.
    pub accounts: String,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance on the path's normal side.
    pub balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    /// Last day included; `None` means all time.
    pub as_of: Option<NaiveDate>,
    /// Rows ordered by path.
    pub accounts: Vec<TrialBalanceRow>,
    /// Grand totals.
    pub totals: TrialBalanceTotals,
}

impl TrialBalance {
    /// Groups lines by literal path and totals them.
    ///
    /// `None` if any total leaves the `Decimal` range.
    #[must_use]
    pub fn from_lines(as_of: Option<NaiveDate>, lines: &[TransactionLine]) -> Option<Self> {
        let mut by_path: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
        for line in lines {
            let sums = by_path.entry(line.accounts.as_str()).or_default();
            sums.0 = sums.0.checked_add(line.debit())?;
            sums.1 = sums.1.checked_add(line.credit())?;
        }

        let accounts: Vec<TrialBalanceRow> = by_path
            .into_iter()
            .map(|(accounts, (total_debit, total_credit))| TrialBalanceRow {
                balance: NormalBalance::for_root_segment(path::top_level(accounts))
                    .balance_change(total_debit, total_credit),
                accounts: accounts.to_string(),
                total_debit,
                total_credit,
            })
            .collect();

        let total_debit = checked_sum(accounts.iter().map(|a| a.total_debit))?;
        let total_credit = checked_sum(accounts.iter().map(|a| a.total_credit))?;

        Some(Self {
            as_of,
            accounts,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: (total_debit - total_credit).abs() <= BALANCE_TOLERANCE,
            },
        })
    }
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |sum, v| sum?.checked_add(v))
}
