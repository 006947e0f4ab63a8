//! Property-based tests for the balance engine.
//!
//! - Closing balance equals opening plus the signed sum of all lines
//! - Each row chains from the previous row's balance
//! - Rows come out in chronological order regardless of input order

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::NormalBalance;
use super::engine::compute_ledger;
use super::entry::Side;
use crate::testing::{line_at, ymd};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Debit), Just(Side::Credit)]
}

fn normal() -> impl Strategy<Value = NormalBalance> {
    prop_oneof![Just(NormalBalance::Debit), Just(NormalBalance::Credit)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_closing_equals_opening_plus_changes(
        normal in normal(),
        opening in (-100_000i64..100_000i64).prop_map(|c| Decimal::new(c, 2)),
        raw in prop::collection::vec((side(), positive_amount(), 1u32..=28), 0..30),
    ) {
        let lines: Vec<_> = raw
            .iter()
            .map(|(s, a, d)| line_at("Assets:Cash", *s, *a, ymd(2024, 3, *d)))
            .collect();
        let expected: Decimal = lines.iter().map(|l| normal.line_change(l)).sum();

        let report = compute_ledger(normal, opening, lines, |l| l.journal_id.to_string()).unwrap();

        prop_assert_eq!(report.opening_balance, opening);
        prop_assert_eq!(report.closing_balance, opening + expected);
        prop_assert_eq!(report.transactions.len(), raw.len());
    }

    #[test]
    fn prop_rows_chain_in_date_order(
        normal in normal(),
        raw in prop::collection::vec((side(), positive_amount(), 1u32..=28), 1..30),
    ) {
        let lines: Vec<_> = raw
            .iter()
            .map(|(s, a, d)| line_at("Expenses:Rent", *s, *a, ymd(2024, 7, *d)))
            .collect();

        let report = compute_ledger(normal, Decimal::ZERO, lines, |l| l.journal_id.to_string()).unwrap();

        let mut previous = Decimal::ZERO;
        for pair in report.transactions.windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
        }
        for row in &report.transactions {
            prop_assert_eq!(row.balance, previous + normal.balance_change(row.debit, row.credit));
            previous = row.balance;
        }
        prop_assert_eq!(previous, report.closing_balance);
    }
}
