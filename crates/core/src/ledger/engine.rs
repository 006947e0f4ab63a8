//! Balance engine: opening balance, running balance and closing balance.
//!
//! Pure functions over already-selected lines. The same sign convention is used
//! for the opening sum and for every row, so
//! `closing = opening + Σ line_change(line)` holds for any input. Sums that
//! leave the `Decimal` range yield `None`.

use rust_decimal::Decimal;

use super::balance::{NormalBalance, RunningBalance};
use super::entry::TransactionLine;
use super::types::{LedgerReport, LedgerRow};

/// Sorts lines by `(datetime, created_at, id)`.
pub fn sort_chronologically(lines: &mut [TransactionLine]) {
    lines.sort_by(|a, b| (a.datetime, a.created_at, a.id).cmp(&(b.datetime, b.created_at, b.id)));
}

/// Sum of the signed contributions of lines posted before the range.
#[must_use]
pub fn opening_balance(normal: NormalBalance, prior: &[TransactionLine]) -> Option<Decimal> {
    prior
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(normal.line_change(line)))
}

/// Folds in-range lines into ledger rows.
///
/// Lines are sorted first; `reference` supplies each row's reference text.
pub fn compute_ledger<F>(
    normal: NormalBalance,
    opening: Decimal,
    mut lines: Vec<TransactionLine>,
    reference: F,
) -> Option<LedgerReport>
where
    F: Fn(&TransactionLine) -> String,
{
    sort_chronologically(&mut lines);

    let mut running = RunningBalance::opening(opening);
    let mut transactions = Vec::with_capacity(lines.len());
    for line in &lines {
        running = running.next(normal.line_change(line))?;
        transactions.push(LedgerRow {
            date: line.datetime,
            reference: reference(line),
            description: line.description(),
            debit: line.debit(),
            credit: line.credit(),
            balance: running.current_balance,
            accounts: line.accounts.clone(),
            journal_id: line.journal_id,
            line_id: line.id,
        });
    }

    Some(LedgerReport {
        opening_balance: opening,
        closing_balance: running.current_balance,
        transactions,
    })
}
