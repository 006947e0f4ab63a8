//! Stock movement routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use khata_core::inventory::{RecordStockEntryInput, StockMovementKind};
use khata_shared::types::{ItemId, WarehouseId};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{OrgScope, parse_id};

/// Creates the stock entry routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stock-entries", post(record_stock_entry))
}

/// Request body for a stock movement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStockEntryRequest {
    /// Item moved.
    pub item_id: String,
    /// Warehouse.
    pub warehouse_id: Option<String>,
    /// Movement date; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Signed quantity: positive in, negative out.
    pub quantity: Decimal,
    /// sales, purchase, sales_return, purchase_return, opening or adjustment.
    pub transaction_type: String,
    /// Originating document.
    pub reference_id: Option<String>,
    /// Notes.
    pub notes: Option<String>,
}

/// POST `/stock-entries` - Record a stock movement.
async fn record_stock_entry(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Json(payload): Json<RecordStockEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_type: StockMovementKind = payload.transaction_type.parse().map_err(|raw| {
        ApiError::bad_request(
            "INVALID_TRANSACTION_TYPE",
            format!("Unknown stock transaction type: {raw}"),
        )
    })?;
    let item_id: ItemId = parse_id("item id", &payload.item_id)?;
    let warehouse_id = payload
        .warehouse_id
        .as_deref()
        .map(|raw| parse_id::<WarehouseId>("warehouse id", raw))
        .transpose()?;

    let input = RecordStockEntryInput {
        organization_id: org_id,
        item_id,
        warehouse_id,
        date: payload.date,
        quantity: payload.quantity,
        transaction_type,
        reference_id: payload.reference_id,
        notes: payload.notes,
    };

    let entry = state.ledger.inventory().record_stock_entry(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "stockEntry": entry } })),
    ))
}
