//! Property-based tests for the journal writer.
//!
//! - Any accepted draft is balanced within tolerance
//! - Two-line entries with opposite sides are always accepted
//! - Entries with three or more lines are never modified

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use khata_shared::types::OrganizationId;

use super::entry::LineMeta;
use super::error::LedgerError;
use super::types::{CreateJournalEntryInput, JournalLineInput};
use super::writer::draft;

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn entry_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("debit"), Just("credit")]
}

fn make_line(account: &str, amount: Decimal, entry_type: &str) -> JournalLineInput {
    JournalLineInput {
        account: account.to_string(),
        amount: amount.to_string(),
        entry_type: entry_type.to_string(),
        meta: LineMeta::new(),
    }
}

fn make_input(lines: Vec<JournalLineInput>) -> CreateJournalEntryInput {
    CreateJournalEntryInput {
        organization_id: OrganizationId::new(),
        memo: "Generated".to_string(),
        datetime: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_accepted_drafts_are_balanced(
        raw in prop::collection::vec((entry_type(), positive_amount()), 1..8),
    ) {
        let lines = raw
            .iter()
            .enumerate()
            .map(|(i, (t, a))| make_line(&format!("Assets:Account{i}"), *a, t))
            .collect();

        match draft(make_input(lines), Utc::now()) {
            Ok(d) => prop_assert!(d.totals.is_balanced()),
            Err(e) => {
                let is_unbalanced = matches!(e, LedgerError::UnbalancedEntry { .. });
                prop_assert!(is_unbalanced);
            }
        }
    }

    #[test]
    fn prop_opposite_pair_always_balances(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        let input = make_input(vec![
            make_line("Expenses:Supplies", debit, "debit"),
            make_line("Assets:Cash", credit, "credit"),
        ]);
        let d = draft(input, Utc::now()).unwrap();

        prop_assert!(d.totals.is_balanced());
        prop_assert_eq!(d.lines[0].amount, debit.max(credit));
        prop_assert_eq!(d.lines[1].amount, debit.max(credit));
        prop_assert_eq!(d.auto_balance.is_some(), debit != credit);
    }

    #[test]
    fn prop_multi_line_amounts_are_untouched(
        a in positive_amount(),
        b in positive_amount(),
    ) {
        let input = make_input(vec![
            make_line("Expenses:Rent", a, "debit"),
            make_line("Expenses:Power", b, "debit"),
            make_line("Assets:Bank", a + b, "credit"),
        ]);
        let d = draft(input, Utc::now()).unwrap();

        prop_assert!(d.auto_balance.is_none());
        prop_assert_eq!(d.lines[0].amount, a);
        prop_assert_eq!(d.lines[1].amount, b);
    }
}
