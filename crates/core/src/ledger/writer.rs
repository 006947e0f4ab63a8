//! Journal entry validation and drafting.
//!
//! `Draft -> Committed -> Voided` is the whole lifecycle. A draft only exists in
//! memory; committing hands it to a [`crate::store::JournalStore`] in one atomic
//! write.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use khata_shared::types::{JournalEntryId, OrganizationId, TransactionLineId};

use super::entry::{LineMeta, Side, TransactionLine};
use super::error::LedgerError;
use super::journal::JournalEntry;
use super::types::{CreateJournalEntryInput, JournalLineInput, JournalTotals};

/// A validated line awaiting commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLine {
    /// Ledger path.
    pub account: String,
    /// Debit or credit.
    pub side: Side,
    /// Positive amount.
    pub amount: Decimal,
    /// Metadata.
    pub meta: LineMeta,
}

/// Correction applied to a two-line entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoBalance {
    /// 1-based index of the corrected line.
    pub line: usize,
    /// Submitted amount.
    pub from: Decimal,
    /// Amount after correction.
    pub to: Decimal,
}

/// A validated, balanced journal entry that has not been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftJournal {
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Trimmed memo.
    pub memo: String,
    /// Posting time.
    pub datetime: DateTime<Utc>,
    /// Lines in submission order.
    pub lines: Vec<DraftLine>,
    /// Debit and credit sums after any correction.
    pub totals: JournalTotals,
    /// Set when a two-line entry was corrected.
    pub auto_balance: Option<AutoBalance>,
}

impl DraftJournal {
    /// Assigns ids and produces the entry to commit.
    #[must_use]
    pub fn into_entry(self, now: DateTime<Utc>) -> JournalEntry {
        let id = JournalEntryId::new();
        let lines = self
            .lines
            .into_iter()
            .map(|line| TransactionLine {
                id: TransactionLineId::new(),
                journal_id: id,
                organization_id: self.organization_id,
                accounts: line.account,
                side: line.side,
                amount: line.amount,
                datetime: self.datetime,
                meta: line.meta,
                memo: self.memo.clone(),
                created_at: now,
            })
            .collect();

        JournalEntry {
            id,
            organization_id: self.organization_id,
            memo: self.memo,
            datetime: self.datetime,
            voided: false,
            void_reason: None,
            voided_at: None,
            created_at: now,
            lines,
        }
    }
}

/// Parses a submitted amount without going through floating point.
pub fn parse_amount(line: usize, raw: &str) -> Result<Decimal, LedgerError> {
    let text = raw.trim();
    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| LedgerError::InvalidAmount {
            line,
            value: raw.to_string(),
        })?;

    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount { line });
    }
    Ok(amount)
}

fn draft_line(line: usize, input: JournalLineInput) -> Result<DraftLine, LedgerError> {
    let account = input.account.trim().to_string();
    if account.is_empty() {
        return Err(LedgerError::MissingAccountPath { line });
    }
    let side = Side::from_str(&input.entry_type).map_err(|value| LedgerError::InvalidEntryType {
        line,
        value,
    })?;
    let amount = parse_amount(line, &input.amount)?;

    Ok(DraftLine {
        account,
        side,
        amount,
        meta: input.meta,
    })
}

/// Corrects a two-line, one-debit-one-credit entry by raising the smaller line.
fn auto_balance(lines: &mut [DraftLine]) -> Option<AutoBalance> {
    let [first, second] = lines else {
        return None;
    };
    if first.side == second.side {
        return None;
    }

    let (index, smaller, larger) = if first.amount < second.amount {
        (1, first, second.amount)
    } else {
        (2, second, first.amount)
    };
    let from = smaller.amount;
    smaller.amount = larger;

    Some(AutoBalance {
        line: index,
        from,
        to: larger,
    })
}

fn sum_lines(lines: &[DraftLine]) -> Result<JournalTotals, LedgerError> {
    JournalTotals::from_lines(lines.iter().map(|l| (l.side, l.amount))).ok_or(LedgerError::AmountOverflow)
}

/// Validates input and produces a balanced draft.
///
/// 1. Memo must be non-blank and at least one line present
/// 2. Every line needs an account, a side and a positive amount
/// 3. Per-side sums must fit in a `Decimal`
/// 4. Unbalanced entries are auto-corrected only in the two-line case
pub fn draft(input: CreateJournalEntryInput, now: DateTime<Utc>) -> Result<DraftJournal, LedgerError> {
    let memo = input.memo.trim().to_string();
    if memo.is_empty() {
        return Err(LedgerError::MissingMemo);
    }
    if input.lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let mut lines = input
        .lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| draft_line(i + 1, line))
        .collect::<Result<Vec<_>, _>>()?;

    let mut totals = sum_lines(&lines)?;
    let mut correction = None;
    if !totals.is_balanced() {
        correction = auto_balance(&mut lines);
        match correction {
            Some(fix) => warn!(
                line = fix.line,
                from = %fix.from,
                to = %fix.to,
                "Auto-balanced two-line journal entry"
            ),
            None => {
                return Err(LedgerError::UnbalancedEntry {
                    debit: totals.debit,
                    credit: totals.credit,
                });
            }
        }
        totals = sum_lines(&lines)?;
    }

    Ok(DraftJournal {
        organization_id: input.organization_id,
        memo,
        datetime: input.datetime.unwrap_or(now),
        lines,
        totals,
        auto_balance: correction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn line(account: &str, amount: &str, entry_type: &str) -> JournalLineInput {
        JournalLineInput {
            account: account.to_string(),
            amount: amount.to_string(),
            entry_type: entry_type.to_string(),
            meta: LineMeta::new(),
        }
    }

    fn input(memo: &str, lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
        CreateJournalEntryInput {
            organization_id: OrganizationId::new(),
            memo: memo.to_string(),
            datetime: None,
            lines,
        }
    }

    #[test]
    fn test_balanced_entry_is_accepted_unchanged() {
        let draft = draft(
            input(
                "Cash sale",
                vec![line("Assets:Cash", "150.25", "debit"), line("Income:Sales Revenue", "150.25", "credit")],
            ),
            Utc::now(),
        )
        .unwrap();
        assert!(draft.auto_balance.is_none());
        assert!(draft.totals.is_balanced());
        assert_eq!(draft.lines[0].amount, dec!(150.25));
    }

    #[test]
    fn test_two_line_entry_is_auto_balanced() {
        let draft = draft(
            input(
                "Supplier bill",
                vec![line("Expenses:Office", "100", "debit"), line("Liabilities:Accounts Payable:Acme", "90", "credit")],
            ),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(draft.lines[1].amount, dec!(100));
        assert_eq!(
            draft.auto_balance,
            Some(AutoBalance {
                line: 2,
                from: dec!(90),
                to: dec!(100)
            })
        );
        assert!(draft.totals.is_balanced());
    }

    #[test]
    fn test_two_line_auto_balance_raises_debit_side() {
        let draft = draft(
            input(
                "Receipt",
                vec![line("Assets:Cash", "75", "debit"), line("Assets:Accounts Receivable:Acme", "80", "credit")],
            ),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(draft.lines[0].amount, dec!(80));
        assert_eq!(draft.auto_balance.map(|f| f.line), Some(1));
    }

    #[test]
    fn test_three_line_imbalance_is_rejected() {
        let result = draft(
            input(
                "Split",
                vec![
                    line("Expenses:Office", "60", "debit"),
                    line("Expenses:Travel", "40", "debit"),
                    line("Assets:Cash", "90", "credit"),
                ],
            ),
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedEntry { debit, credit }) if debit == dec!(100) && credit == dec!(90)
        ));
    }

    #[test]
    fn test_single_line_is_rejected_as_unbalanced() {
        let result = draft(
            input("Office Supplies", vec![line("expenses:office", "50", "debit")]),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_side_total_overflow_is_rejected() {
        let result = draft(
            input(
                "Huge",
                vec![
                    line("Assets:Cash", "70000000000000000000000000000", "debit"),
                    line("Assets:Bank", "70000000000000000000000000000", "debit"),
                    line("Income:Sales", "1", "credit"),
                ],
            ),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::AmountOverflow)));
    }

    #[test]
    fn test_two_debits_cannot_be_auto_balanced() {
        let result = draft(
            input(
                "Two debits",
                vec![line("Assets:Cash", "10", "debit"), line("Assets:Bank", "10", "debit")],
            ),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_blank_memo_rejected() {
        let result = draft(
            input("  ", vec![line("Assets:Cash", "1", "debit"), line("Income:Sales", "1", "credit")]),
            Utc::now(),
        );
        assert!(matches!(result, Err(LedgerError::MissingMemo)));
    }

    #[test]
    fn test_no_lines_rejected() {
        assert!(matches!(draft(input("Empty", vec![]), Utc::now()), Err(LedgerError::NoLines)));
    }

    #[rstest]
    #[case("abc", "INVALID_AMOUNT")]
    #[case("", "INVALID_AMOUNT")]
    #[case("0", "NON_POSITIVE_AMOUNT")]
    #[case("-5", "NON_POSITIVE_AMOUNT")]
    fn test_bad_amount_rejects_whole_entry(#[case] amount: &str, #[case] code: &str) {
        let err = draft(
            input("Bad", vec![line("Assets:Cash", "10", "debit"), line("Income:Sales", amount, "credit")]),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_bad_entry_type_rejected() {
        let err = draft(
            input("Bad", vec![line("Assets:Cash", "10", "both"), line("Income:Sales", "10", "credit")]),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEntryType { line: 1, .. }));
    }

    #[test]
    fn test_blank_account_rejected() {
        let err = draft(
            input("Bad", vec![line("Assets:Cash", "10", "debit"), line("   ", "10", "credit")]),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::MissingAccountPath { line: 2 }));
    }

    #[test]
    fn test_parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount(1, "1.5e2").unwrap(), dec!(150));
    }

    #[test]
    fn test_into_entry_shares_journal_id_and_datetime() {
        let now = Utc::now();
        let draft = draft(
            input("Sale", vec![line("Assets:Cash", "5", "debit"), line("Income:Sales", "5", "credit")]),
            now,
        )
        .unwrap();
        let entry = draft.into_entry(now);
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.lines.iter().all(|l| l.journal_id == entry.id));
        assert!(entry.lines.iter().all(|l| l.datetime == now && l.memo == "Sale"));
        assert!(!entry.voided);
    }
}
