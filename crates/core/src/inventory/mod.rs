//! Inventory ledger variant.
//!
//! Same shape as the monetary ledger, but balances are quantities derived from
//! stock entries. A catalog account routes here when its path names a single
//! item under an `Inventory` branch.

pub mod error;
pub mod service;
pub mod stock;
pub mod types;

#[cfg(test)]
mod stock_props;

pub use error::InventoryError;
pub use service::InventoryService;
pub use stock::{is_inventory_item_path, validate_quantity};
pub use types::{
    Item, RecordStockEntryInput, StockDirection, StockEntry, StockLedger, StockMovement,
    StockMovementKind,
};
