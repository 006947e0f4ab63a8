//! Journal repository: atomic entry commits and line queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use khata_core::ledger::{JournalEntry, LineMeta, Side, TransactionLine};
use khata_core::resolver::{CandidateSet, PathCandidate};
use khata_core::store::{JournalStore, LineQuery, StoreError};
use khata_shared::types::{JournalEntryId, OrganizationId, TransactionLineId};

use super::{corrupt, date_bounds, store_error};
use crate::entities::{journal_entries, transaction_lines};

/// SeaORM-backed [`JournalStore`].
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_lines(&self, journal: &journal_entries::Model) -> Result<Vec<TransactionLine>, StoreError> {
        transaction_lines::Entity::find()
            .filter(transaction_lines::Column::JournalId.eq(journal.id))
            .order_by_asc(transaction_lines::Column::Position)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(|line| line_to_domain(line, &journal.memo))
            .collect()
    }

    async fn load_entry(&self, journal: journal_entries::Model) -> Result<JournalEntry, StoreError> {
        let lines = self.load_lines(&journal).await?;
        Ok(entry_to_domain(journal, lines))
    }
}

fn line_to_domain(model: transaction_lines::Model, memo: &str) -> Result<TransactionLine, StoreError> {
    let side = Side::from_flags(model.debit, model.credit)
        .ok_or_else(|| corrupt("debit/credit", &format!("{}/{}", model.debit, model.credit)))?;

    Ok(TransactionLine {
        id: TransactionLineId::from_uuid(model.id),
        journal_id: JournalEntryId::from_uuid(model.journal_id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        accounts: model.accounts,
        side,
        amount: model.amount,
        datetime: model.datetime.with_timezone(&Utc),
        meta: LineMeta::from_value(model.meta),
        memo: memo.to_string(),
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn entry_to_domain(model: journal_entries::Model, lines: Vec<TransactionLine>) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        memo: model.memo,
        datetime: model.datetime.with_timezone(&Utc),
        voided: model.voided,
        void_reason: model.void_reason,
        voided_at: model.voided_at.map(|at| at.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        lines,
    }
}

/// Pushes a candidate set down as a disjunctive SQL predicate.
///
/// Rows are re-checked with [`LineQuery::matches`] afterwards, so this only
/// has to be at least as wide as the in-process interpreter.
fn candidate_condition(candidates: &CandidateSet) -> Condition {
    candidates.iter().fold(Condition::any(), |cond, candidate| match candidate {
        PathCandidate::Exact { path } => cond.add(transaction_lines::Column::Accounts.eq(path.as_str())),
        PathCandidate::Prefix { prefix } => {
            cond.add(transaction_lines::Column::Accounts.starts_with(prefix.as_str()))
        }
        PathCandidate::Regex { pattern } => cond.add(Expr::cust_with_values(
            "transaction_lines.accounts ~* $1",
            [pattern.as_str()],
        )),
        PathCandidate::MetaMatch { path, field, value } => cond.add(
            Condition::all()
                .add(Expr::cust_with_values(
                    "lower(transaction_lines.accounts) = lower($1)",
                    [path.as_str()],
                ))
                .add(Expr::cust_with_values(
                    "transaction_lines.meta ->> $1 = $2",
                    [field.meta_key(), value.as_str()],
                )),
        ),
    })
}

#[async_trait]
impl JournalStore for JournalRepository {
    async fn commit_journal(&self, entry: JournalEntry) -> Result<JournalEntry, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        journal_entries::ActiveModel {
            id: Set(entry.id.into_inner()),
            organization_id: Set(entry.organization_id.into_inner()),
            memo: Set(entry.memo.clone()),
            datetime: Set(entry.datetime.into()),
            voided: Set(false),
            void_reason: Set(None),
            voided_at: Set(None),
            created_at: Set(entry.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(store_error)?;

        let lines = entry.lines.iter().zip(0..).map(|(line, position)| transaction_lines::ActiveModel {
            id: Set(line.id.into_inner()),
            journal_id: Set(entry.id.into_inner()),
            organization_id: Set(line.organization_id.into_inner()),
            position: Set(position),
            accounts: Set(line.accounts.clone()),
            debit: Set(line.side == Side::Debit),
            credit: Set(line.side == Side::Credit),
            amount: Set(line.amount),
            datetime: Set(line.datetime.into()),
            meta: Set(line.meta.clone().into_value()),
            created_at: Set(line.created_at.into()),
        });
        transaction_lines::Entity::insert_many(lines)
            .exec(&txn)
            .await
            .map_err(store_error)?;

        txn.commit().await.map_err(store_error)?;
        debug!(journal_id = %entry.id, lines = entry.lines.len(), "Journal entry persisted");
        Ok(entry)
    }

    async fn find_journal(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        let journal = journal_entries::Entity::find_by_id(id.into_inner())
            .filter(journal_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        match journal {
            Some(model) => Ok(Some(self.load_entry(model).await?)),
            None => Ok(None),
        }
    }

    async fn mark_voided(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
        reason: Option<String>,
        voided_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError> {
        let journal = journal_entries::Entity::find_by_id(id.into_inner())
            .filter(journal_entries::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::Database(format!("journal entry {id} does not exist")))?;

        let mut active = journal.into_active_model();
        active.voided = Set(true);
        active.void_reason = Set(reason);
        active.voided_at = Set(Some(voided_at.into()));
        let updated = active.update(&self.db).await.map_err(store_error)?;

        self.load_entry(updated).await
    }

    async fn find_lines(&self, query: &LineQuery) -> Result<Vec<TransactionLine>, StoreError> {
        let mut select = transaction_lines::Entity::find()
            .find_also_related(journal_entries::Entity)
            .filter(transaction_lines::Column::OrganizationId.eq(query.organization_id.into_inner()))
            .filter(journal_entries::Column::Voided.eq(false))
            .filter(date_bounds(transaction_lines::Column::Datetime, &query.since, &query.until));

        if let Some(candidates) = &query.candidates {
            if candidates.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(candidate_condition(candidates));
        }

        let rows = select
            .order_by_asc(transaction_lines::Column::Datetime)
            .order_by_asc(transaction_lines::Column::CreatedAt)
            .order_by_asc(transaction_lines::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        let mut lines = Vec::with_capacity(rows.len());
        for (line, journal) in rows {
            let memo = journal.map(|j| j.memo).unwrap_or_default();
            let line = line_to_domain(line, &memo)?;
            if query.matches(&line) {
                lines.push(line);
            }
        }
        Ok(lines)
    }
}
