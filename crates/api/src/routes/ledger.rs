//! Account ledger route.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use khata_core::ledger::{DateRange, LedgerError, LedgerView};
use khata_core::resolver::ResolveOptions;
use khata_shared::types::AccountId;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{OrgScope, parse_date, parse_id};

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ledger/{account_id}", get(get_ledger))
}

/// Query parameters for an account ledger.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// First day included (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Last day included (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Include postings to descendant paths.
    #[serde(default)]
    pub include_sub_accounts: bool,
}

/// GET `/ledger/{account_id}` - Running-balance ledger of one account.
///
/// Inventory item accounts answer with a quantity ledger instead.
async fn get_ledger(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(account_id): Path<String>,
    Query(query): Query<LedgerQuery>,
) -> Result<Response, ApiError> {
    let account_id: AccountId = parse_id("account id", &account_id)?;
    let start = parse_date("startDate", query.start_date.as_deref())?;
    let end = parse_date("endDate", query.end_date.as_deref())?;
    let range = DateRange::from_dates(start, end)?;
    let options = ResolveOptions {
        include_sub_accounts: query.include_sub_accounts,
    };

    match state
        .ledger
        .account_ledger(org_id, account_id, range, options)
        .await
    {
        Ok(view) => Ok(Json(ledger_body(view)).into_response()),
        Err(err) if err.is_store_failure() => Ok(store_failure(err)),
        Err(err) => Err(err.into()),
    }
}

fn ledger_body(view: LedgerView) -> serde_json::Value {
    match view {
        LedgerView::Monetary {
            account, report, ..
        } => json!({
            "success": true,
            "data": {
                "account": account,
                "openingBalance": report.opening_balance,
                "transactions": report.transactions,
                "closingBalance": report.closing_balance,
            }
        }),
        LedgerView::Inventory { account, stock } => json!({
            "success": true,
            "data": {
                "account": account,
                "item": stock.item,
                "openingStock": stock.opening_stock,
                "transactions": stock.movements,
                "closingStock": stock.closing_stock,
                "isInventoryItem": true,
            }
        }),
    }
}

/// A failed store read still answers with an empty ledger shape.
fn store_failure(err: LedgerError) -> Response {
    let api = ApiError::from(err);
    error!(code = api.code, error = %api.message, "Ledger read failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "error": api.public_message(),
            "code": api.code,
            "data": { "transactions": [] },
        })),
    )
        .into_response()
}
