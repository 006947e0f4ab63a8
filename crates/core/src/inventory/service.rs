//! Inventory service: stock ledgers and stock movements.

use std::ops::Bound;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use khata_shared::types::{ItemId, OrganizationId, StockEntryId};

use super::error::InventoryError;
use super::stock::validate_quantity;
use super::types::{Item, RecordStockEntryInput, StockEntry, StockLedger};
use crate::catalog::Account;
use crate::ledger::DateRange;
use crate::store::{ItemStore, StockStore};

/// Computes stock ledgers and records stock movements.
#[derive(Clone)]
pub struct InventoryService {
    items: Arc<dyn ItemStore>,
    stock: Arc<dyn StockStore>,
}

impl InventoryService {
    /// Creates a new inventory service.
    #[must_use]
    pub fn new(items: Arc<dyn ItemStore>, stock: Arc<dyn StockStore>) -> Self {
        Self { items, stock }
    }

    /// Stock ledger for an item over a date range.
    #[instrument(skip(self, range), fields(organization_id = %organization_id, item_id = %item_id))]
    pub async fn stock_ledger(
        &self,
        organization_id: OrganizationId,
        item_id: ItemId,
        range: DateRange,
    ) -> Result<StockLedger, InventoryError> {
        let item = self
            .items
            .find_item_by_id(organization_id, item_id)
            .await?
            .ok_or_else(|| InventoryError::ItemNotFound(item_id.to_string()))?;
        self.ledger_for_item(item, range).await
    }

    /// Stock ledger for the item an inventory account names by its leaf.
    #[instrument(skip(self, account, range), fields(account_id = %account.id, path = %account.path))]
    pub async fn stock_ledger_for_account(
        &self,
        account: &Account,
        range: DateRange,
    ) -> Result<StockLedger, InventoryError> {
        let name = account.leaf_name();
        let item = self
            .items
            .find_item_by_name(account.organization_id, name)
            .await?
            .ok_or_else(|| InventoryError::ItemNotFound(name.to_string()))?;
        self.ledger_for_item(item, range).await
    }

    async fn ledger_for_item(&self, item: Item, range: DateRange) -> Result<StockLedger, InventoryError> {
        let prior = match range.start {
            Some(start) => {
                self.stock
                    .find_stock_entries(item.organization_id, item.id, Bound::Unbounded, Bound::Excluded(start))
                    .await?
            }
            None => Vec::new(),
        };
        let entries = self
            .stock
            .find_stock_entries(item.organization_id, item.id, range.since_bound(), range.until_bound())
            .await?;

        StockLedger::compute(item, &prior, entries)
    }

    /// Validates and appends a stock movement.
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id, item_id = %input.item_id))]
    pub async fn record_stock_entry(&self, input: RecordStockEntryInput) -> Result<StockEntry, InventoryError> {
        validate_quantity(input.transaction_type, input.quantity)?;
        self.items
            .find_item_by_id(input.organization_id, input.item_id)
            .await?
            .ok_or_else(|| InventoryError::ItemNotFound(input.item_id.to_string()))?;

        let now = Utc::now();
        let entry = StockEntry {
            id: StockEntryId::new(),
            organization_id: input.organization_id,
            item_id: input.item_id,
            warehouse_id: input.warehouse_id,
            date: input.date.unwrap_or(now),
            quantity: input.quantity,
            transaction_type: Some(input.transaction_type.as_str().to_string()),
            reference_id: input.reference_id,
            notes: input.notes,
            created_at: now,
        };

        let saved = self.stock.insert_stock_entry(entry).await?;
        info!(stock_entry_id = %saved.id, quantity = %saved.quantity, "Stock entry recorded");
        Ok(saved)
    }
}

impl std::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryService").finish_non_exhaustive()
    }
}
