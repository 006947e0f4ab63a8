//! Trial balance route.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{OrgScope, parse_date};

/// Creates the trial balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/trial-balance", get(get_trial_balance))
}

/// Query parameters for the trial balance.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceQuery {
    /// Last day included (`YYYY-MM-DD`); all time when absent.
    pub as_of: Option<String>,
}

/// GET `/trial-balance` - Debit/credit totals per ledger path.
async fn get_trial_balance(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Query(query): Query<TrialBalanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let as_of = parse_date("asOf", query.as_of.as_deref())?;
    let report = state.ledger.trial_balance(org_id, as_of).await?;
    Ok(Json(json!({ "success": true, "data": report })))
}
