//! Journal entry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use khata_core::ledger::{
    CreateJournalEntryInput, JournalEntry, JournalLineInput, JournalStatus, LineMeta, Side,
    TransactionLine,
};
use khata_shared::types::{JournalEntryId, OrganizationId, TransactionLineId};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::{OrgScope, parse_id};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", post(create_journal_entry))
        .route("/journal-entries/{journal_id}", get(get_journal_entry))
        .route("/journal-entries/{journal_id}/void", post(void_journal_entry))
}

/// Request body for creating a journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    /// Free-text memo.
    #[serde(default)]
    pub memo: String,
    /// Posting time; defaults to now.
    pub datetime: Option<DateTime<Utc>>,
    /// Lines in submission order.
    #[serde(default)]
    pub transactions: Vec<JournalLineRequest>,
}

/// One submitted line.
#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    /// Ledger path.
    #[serde(default)]
    pub account: String,
    /// Amount as a JSON number or a decimal string.
    #[serde(default)]
    pub amount: Value,
    /// `debit` or `credit`.
    #[serde(rename = "type", default)]
    pub entry_type: String,
    /// Free-form metadata.
    #[serde(default)]
    pub meta: Value,
}

/// Request body for voiding.
#[derive(Debug, Default, Deserialize)]
pub struct VoidJournalEntryRequest {
    /// Why the entry is voided.
    pub reason: Option<String>,
}

/// Wire shape of a persisted transaction line.
#[derive(Debug, Serialize)]
pub struct TransactionLineResponse {
    /// Line ID.
    pub id: TransactionLineId,
    /// Literal ledger path.
    pub accounts: String,
    /// Debit flag.
    pub debit: bool,
    /// Credit flag.
    pub credit: bool,
    /// Positive amount.
    pub amount: Decimal,
    /// Posting time.
    pub datetime: DateTime<Utc>,
    /// Metadata.
    pub meta: Value,
    /// Parent journal entry.
    #[serde(rename = "_journal")]
    pub journal: JournalEntryId,
}

impl From<TransactionLine> for TransactionLineResponse {
    fn from(line: TransactionLine) -> Self {
        Self {
            id: line.id,
            accounts: line.accounts,
            debit: line.side == Side::Debit,
            credit: line.side == Side::Credit,
            amount: line.amount,
            datetime: line.datetime,
            meta: line.meta.into_value(),
            journal: line.journal_id,
        }
    }
}

/// Wire shape of a journal entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Memo.
    pub memo: String,
    /// Posting time.
    pub datetime: DateTime<Utc>,
    /// Lifecycle state.
    pub status: JournalStatus,
    /// Void reason.
    pub void_reason: Option<String>,
    /// Void time.
    pub voided_at: Option<DateTime<Utc>>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Lines.
    pub transactions: Vec<TransactionLineResponse>,
}

impl From<JournalEntry> for JournalEntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            status: entry.status(),
            memo: entry.memo,
            datetime: entry.datetime,
            void_reason: entry.void_reason,
            voided_at: entry.voided_at,
            created_at: entry.created_at,
            transactions: entry.lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Amount text as submitted; numbers keep their JSON spelling.
fn amount_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl CreateJournalEntryRequest {
    fn into_input(self, organization_id: OrganizationId) -> CreateJournalEntryInput {
        CreateJournalEntryInput {
            organization_id,
            memo: self.memo,
            datetime: self.datetime,
            lines: self
                .transactions
                .into_iter()
                .map(|line| JournalLineInput {
                    amount: amount_text(&line.amount),
                    account: line.account,
                    entry_type: line.entry_type,
                    meta: LineMeta::from_value(line.meta),
                })
                .collect(),
        }
    }
}

/// POST `/journal-entries` - Validate, balance and commit an entry.
async fn create_journal_entry(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Json(payload): Json<CreateJournalEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .ledger
        .create_journal_entry(payload.into_input(org_id))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "journalEntry": JournalEntryResponse::from(entry) }
        })),
    ))
}

/// GET `/journal-entries/{journal_id}` - Entry with its lines.
async fn get_journal_entry(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(journal_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: JournalEntryId = parse_id("journal entry id", &journal_id)?;
    let entry = state.ledger.get_journal_entry(org_id, id).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "journalEntry": JournalEntryResponse::from(entry) }
    })))
}

/// POST `/journal-entries/{journal_id}/void` - Void a committed entry.
async fn void_journal_entry(
    State(state): State<AppState>,
    OrgScope(org_id): OrgScope,
    Path(journal_id): Path<String>,
    payload: Option<Json<VoidJournalEntryRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let id: JournalEntryId = parse_id("journal entry id", &journal_id)?;
    let reason = payload.and_then(|Json(body)| body.reason);
    let entry = state.ledger.void_journal_entry(org_id, id, reason).await?;
    Ok(Json(json!({
        "success": true,
        "data": { "journalEntry": JournalEntryResponse::from(entry) }
    })))
}
