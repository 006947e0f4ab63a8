//! Property-based tests for the stock ledger fold.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::StockLedger;
use crate::testing::{item, stock_entry, ymd};

/// Signed quantities in hundredths, never zero.
fn quantity() -> impl Strategy<Value = Decimal> {
    prop_oneof![(1i64..100_000i64), (-100_000i64..-1i64)].prop_map(|v| Decimal::new(v, 2))
}

fn day() -> impl Strategy<Value = u32> {
    1u32..=28
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Closing stock equals opening stock plus every in-range quantity.
    #[test]
    fn prop_closing_equals_opening_plus_quantities(
        opening in (0i64..10_000i64).prop_map(|v| Decimal::new(v, 0)),
        moves in prop::collection::vec((quantity(), day()), 0..20),
    ) {
        let widget = item("Widget", opening);
        let entries: Vec<_> = moves
            .iter()
            .map(|(q, d)| stock_entry(&widget, *q, None, ymd(2024, 5, *d)))
            .collect();
        let total: Decimal = moves.iter().map(|(q, _)| *q).sum();

        let ledger = StockLedger::compute(widget, &[], entries).unwrap();
        prop_assert_eq!(ledger.closing_stock, opening + total);
    }

    /// Each row's balance is the previous balance plus in minus out.
    #[test]
    fn prop_running_stock_chain(
        moves in prop::collection::vec((quantity(), day()), 1..20),
    ) {
        let widget = item("Widget", Decimal::ZERO);
        let entries: Vec<_> = moves
            .iter()
            .map(|(q, d)| stock_entry(&widget, *q, Some("adjustment"), ymd(2024, 5, *d)))
            .collect();
        let ledger = StockLedger::compute(widget, &[], entries).unwrap();

        let mut previous = ledger.opening_stock;
        for (i, row) in ledger.movements.iter().enumerate() {
            prop_assert!(row.quantity_in.is_zero() || row.quantity_out.is_zero());
            prop_assert_eq!(row.balance, previous + row.quantity_in - row.quantity_out);
            if i > 0 {
                prop_assert!(ledger.movements[i - 1].date <= row.date);
            }
            previous = row.balance;
        }
        prop_assert_eq!(previous, ledger.closing_stock);
    }
}
