//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::json;

use khata_core::catalog::{AccountSubtype, AccountType, CreateAccountInput, UpdateAccountInput};
use khata_shared::types::AccountId;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{OrgScope, parse_id};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{account_id}", get(get_account).put(update_account))
        .route("/accounts/code/{code}/children", get(list_children))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Account code (unique within the organization).
    pub code: String,
    /// Account name; becomes the last path segment.
    pub name: String,
    /// Account type: asset, liability, equity, income, expense.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Detailed classification.
    pub subtype: Option<String>,
    /// Parent account code.
    pub parent_code: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Balance carried in from before the ledger started.
    pub opening_balance: Option<Decimal>,
}

/// Request body for updating an account. Explicit `null` clears a field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// New type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// New subtype.
    #[serde(default, deserialize_with = "double_option")]
    pub subtype: Option<Option<String>>,
    /// New opening balance.
    #[serde(default, deserialize_with = "double_option")]
    pub opening_balance: Option<Option<Decimal>>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_subtype(raw: Option<&str>) -> Result<Option<AccountSubtype>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse::<AccountSubtype>()?)),
        None => Ok(None),
    }
}

impl UpdateAccountRequest {
    fn into_input(self) -> Result<UpdateAccountInput, ApiError> {
        let account_type = self
            .account_type
            .as_deref()
            .map(str::parse::<AccountType>)
            .transpose()?;
        let subtype = match self.subtype {
            Some(raw) => Some(parse_subtype(raw.as_deref())?),
            None => None,
        };
        Ok(UpdateAccountInput {
            name: self.name,
            description: self.description,
            account_type,
            subtype,
            opening_balance: self.opening_balance,
        })
    }
}

/// GET `/accounts` - List the organization's accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.catalog.list_accounts(org_id).await?;
    Ok(Json(json!({ "success": true, "data": { "accounts": accounts } })))
}

/// POST `/accounts` - Create an account under an optional parent.
async fn create_account(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateAccountInput {
        organization_id: org_id,
        code: payload.code,
        name: payload.name,
        account_type: payload.account_type.parse()?,
        subtype: parse_subtype(payload.subtype.as_deref())?,
        parent_code: payload.parent_code,
        description: payload.description,
        opening_balance: payload.opening_balance,
    };

    let account = state.catalog.create_account(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "account": account } })),
    ))
}

/// GET `/accounts/{account_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id("account id", &account_id)?;
    let account = state.catalog.get_by_id(org_id, id).await?;
    Ok(Json(json!({ "success": true, "data": { "account": account } })))
}

/// PUT `/accounts/{account_id}` - Update name, description, type, subtype or opening balance.
async fn update_account(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(account_id): Path<String>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id: AccountId = parse_id("account id", &account_id)?;
    let account = state
        .catalog
        .update_account(org_id, id, payload.into_input()?)
        .await?;
    Ok(Json(json!({ "success": true, "data": { "account": account } })))
}

/// GET `/accounts/code/{code}/children` - Direct children of an account.
async fn list_children(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let children = state.catalog.list_children(org_id, Some(&code)).await?;
    Ok(Json(json!({ "success": true, "data": { "accounts": children } })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateAccountRequest =
            serde_json::from_str(r#"{"description": null, "name": "Petty Cash"}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.subtype, None);
        assert_eq!(req.opening_balance, None);

        let input = req.into_input().unwrap();
        assert_eq!(input.name.as_deref(), Some("Petty Cash"));
        assert_eq!(input.description, Some(None));
    }

    #[test]
    fn test_update_request_rejects_unknown_type() {
        let req: UpdateAccountRequest = serde_json::from_str(r#"{"type": "gizmo"}"#).unwrap();
        let err = req.into_input().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
