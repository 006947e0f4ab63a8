//! Stock ledger computation and movement rules.

use rust_decimal::Decimal;

use crate::catalog::path;

use super::error::InventoryError;
use super::types::{Item, StockDirection, StockEntry, StockLedger, StockMovement, StockMovementKind};

/// Whether a catalog path names a single inventory item.
///
/// True for `Assets:Inventory:WidgetA`; false for the `Assets:Inventory`
/// category itself.
#[must_use]
pub fn is_inventory_item_path(account_path: &str) -> bool {
    let segments: Vec<&str> = path::segments(account_path).collect();
    segments.len() > 2
        && segments[..segments.len() - 1]
            .iter()
            .any(|s| s.eq_ignore_ascii_case("inventory"))
}

/// Checks that a quantity is non-zero and signed the way its kind requires.
pub fn validate_quantity(kind: StockMovementKind, quantity: Decimal) -> Result<(), InventoryError> {
    if quantity.is_zero() {
        return Err(InventoryError::ZeroQuantity);
    }
    let ok = match kind.direction() {
        StockDirection::Inflow => quantity.is_sign_positive(),
        StockDirection::Outflow => quantity.is_sign_negative(),
        StockDirection::Either => true,
    };
    if ok {
        Ok(())
    } else {
        Err(InventoryError::DirectionMismatch {
            kind: kind.as_str().to_string(),
            quantity,
        })
    }
}

/// Sorts entries by `(date, created_at, id)`.
pub fn sort_chronologically(entries: &mut [StockEntry]) {
    entries.sort_by(|a, b| (a.date, a.created_at, a.id).cmp(&(b.date, b.created_at, b.id)));
}

impl StockLedger {
    /// Folds movements into a running stock total.
    ///
    /// Opening stock is `item.opening_stock` plus every quantity in `prior`.
    pub fn compute(item: Item, prior: &[StockEntry], mut entries: Vec<StockEntry>) -> Result<Self, InventoryError> {
        let overflow = || InventoryError::QuantityOverflow(item.name.clone());
        let opening_stock = prior
            .iter()
            .try_fold(item.opening_stock, |sum, e| sum.checked_add(e.quantity))
            .ok_or_else(overflow)?;
        sort_chronologically(&mut entries);

        let mut balance = opening_stock;
        let mut movements = Vec::with_capacity(entries.len());
        for entry in entries {
            balance = balance.checked_add(entry.quantity).ok_or_else(overflow)?;
            let kind = entry.kind();
            movements.push(StockMovement {
                date: entry.date,
                quantity_in: entry.quantity.max(Decimal::ZERO),
                quantity_out: (-entry.quantity).max(Decimal::ZERO),
                balance,
                transaction_type: kind,
                description: kind.label().to_string(),
                reference_id: entry.reference_id,
                notes: entry.notes,
            });
        }

        Ok(Self {
            item,
            opening_stock,
            movements,
            closing_stock: balance,
        })
    }
}
