//! Inventory domain types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::{ItemId, OrganizationId, StockEntryId, WarehouseId};

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item ID.
    pub id: ItemId,
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Name; matches the leaf of the item's inventory account.
    pub name: String,
    /// Quantity on hand before the first stock entry.
    pub opening_stock: Decimal,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Classification of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockMovementKind {
    /// Opening stock.
    Opening,
    /// Goods sold.
    Sales,
    /// Goods bought.
    Purchase,
    /// Goods returned by a customer.
    SalesReturn,
    /// Goods returned to a supplier.
    PurchaseReturn,
    /// Manual correction, and the fallback for unknown types.
    Adjustment,
}

/// Expected sign of a movement's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Positive quantity.
    Inflow,
    /// Negative quantity.
    Outflow,
    /// Any non-zero quantity.
    Either,
}

impl StockMovementKind {
    /// Parses a stored type; missing or unknown types read as [`Self::Adjustment`].
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Adjustment)
    }

    /// Snake-case name used for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::SalesReturn => "sales_return",
            Self::PurchaseReturn => "purchase_return",
            Self::Adjustment => "adjustment",
        }
    }

    /// Display label for ledger rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opening => "Opening Stock",
            Self::Sales => "Sales",
            Self::Purchase => "Purchase",
            Self::SalesReturn => "Sales Return",
            Self::PurchaseReturn => "Purchase Return",
            Self::Adjustment => "Stock Adjustment",
        }
    }

    /// Sign the quantity must have.
    #[must_use]
    pub const fn direction(self) -> StockDirection {
        match self {
            Self::Opening | Self::Purchase | Self::SalesReturn => StockDirection::Inflow,
            Self::Sales | Self::PurchaseReturn => StockDirection::Outflow,
            Self::Adjustment => StockDirection::Either,
        }
    }
}

impl FromStr for StockMovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "opening" | "opening_stock" => Ok(Self::Opening),
            "sales" | "sale" => Ok(Self::Sales),
            "purchase" | "purchases" => Ok(Self::Purchase),
            "sales_return" => Ok(Self::SalesReturn),
            "purchase_return" => Ok(Self::PurchaseReturn),
            "adjustment" | "stock_adjustment" => Ok(Self::Adjustment),
            _ => Err(s.to_string()),
        }
    }
}

/// A signed quantity movement for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    /// Entry ID.
    pub id: StockEntryId,
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Item moved.
    pub item_id: ItemId,
    /// Warehouse, when tracked.
    pub warehouse_id: Option<WarehouseId>,
    /// Movement date.
    pub date: DateTime<Utc>,
    /// Positive in, negative out.
    pub quantity: Decimal,
    /// Raw movement type as stored.
    pub transaction_type: Option<String>,
    /// Originating voucher or document.
    pub reference_id: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Insertion time, the secondary sort key.
    pub created_at: DateTime<Utc>,
}

impl StockEntry {
    /// Movement kind, defaulting to adjustment.
    #[must_use]
    pub fn kind(&self) -> StockMovementKind {
        StockMovementKind::parse_lenient(self.transaction_type.as_deref())
    }
}

/// One row of a stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    /// Movement date.
    pub date: DateTime<Utc>,
    /// Positive part of the quantity.
    pub quantity_in: Decimal,
    /// Magnitude of the negative part of the quantity.
    pub quantity_out: Decimal,
    /// Running stock after this movement.
    pub balance: Decimal,
    /// Movement kind.
    pub transaction_type: StockMovementKind,
    /// Display label.
    pub description: String,
    /// Originating document.
    pub reference_id: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// Quantity ledger for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLedger {
    /// The item.
    pub item: Item,
    /// Stock before the first movement.
    pub opening_stock: Decimal,
    /// Movements in chronological order.
    pub movements: Vec<StockMovement>,
    /// Stock after the last movement.
    pub closing_stock: Decimal,
}

/// Input for recording a stock movement.
#[derive(Debug, Clone)]
pub struct RecordStockEntryInput {
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Item moved.
    pub item_id: ItemId,
    /// Warehouse.
    pub warehouse_id: Option<WarehouseId>,
    /// Movement date; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Movement type.
    pub transaction_type: StockMovementKind,
    /// Originating document.
    pub reference_id: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}
