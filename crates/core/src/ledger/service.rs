//! Ledger service: account ledgers, journal commits, voids and trial balance.

use std::collections::HashMap;
use std::ops::Bound;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use khata_shared::types::{AccountId, JournalEntryId, OrganizationId, TransactionLineId};

use super::balance::NormalBalance;
use super::engine::{compute_ledger, opening_balance};
use super::entry::TransactionLine;
use super::error::LedgerError;
use super::journal::JournalEntry;
use super::trial_balance::TrialBalance;
use super::types::{CreateJournalEntryInput, DateRange, LedgerReport};
use super::writer;
use crate::catalog::Account;
use crate::inventory::{InventoryService, StockLedger, is_inventory_item_path};
use crate::resolver::{Degradation, PathResolver, Resolution, ResolveOptions};
use crate::store::{LineQuery, Stores};

/// Ledger for one catalog account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LedgerView {
    /// Monetary ledger from transaction lines.
    Monetary {
        /// The account.
        account: Account,
        /// Opening, rows and closing.
        report: LedgerReport,
        /// Best-effort steps that fell through.
        #[serde(skip)]
        degraded: Vec<Degradation>,
    },
    /// Quantity ledger for an inventory item account.
    Inventory {
        /// The account.
        account: Account,
        /// Stock ledger of the matching item.
        stock: StockLedger,
    },
}

impl LedgerView {
    /// The account the ledger belongs to.
    #[must_use]
    pub fn account(&self) -> &Account {
        match self {
            Self::Monetary { account, .. } | Self::Inventory { account, .. } => account,
        }
    }
}

/// Orchestrates resolution, balance computation and journal writes.
#[derive(Debug, Clone)]
pub struct LedgerService {
    stores: Stores,
    resolver: PathResolver,
    inventory: InventoryService,
}

impl LedgerService {
    /// Creates a ledger service over a store registry.
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        let resolver = PathResolver::new(stores.counterparties.clone());
        let inventory = InventoryService::new(stores.items.clone(), stores.stock.clone());
        Self {
            stores,
            resolver,
            inventory,
        }
    }

    /// Inventory service sharing the same stores.
    #[must_use]
    pub fn inventory(&self) -> &InventoryService {
        &self.inventory
    }

    /// Computes the ledger of an account over a date range.
    ///
    /// Inventory item accounts yield a stock ledger instead.
    #[instrument(skip(self, range, options), fields(organization_id = %organization_id, account_id = %account_id))]
    pub async fn account_ledger(
        &self,
        organization_id: OrganizationId,
        account_id: AccountId,
        range: DateRange,
        options: ResolveOptions,
    ) -> Result<LedgerView, LedgerError> {
        let account = self
            .stores
            .accounts
            .find_account_by_id(organization_id, account_id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_id.to_string()))?;

        if is_inventory_item_path(&account.path) {
            let stock = self.inventory.stock_ledger_for_account(&account, range).await?;
            return Ok(LedgerView::Inventory { account, stock });
        }

        let Resolution {
            candidates,
            mut degraded,
        } = self.resolver.resolve(&account, options).await;
        let normal = NormalBalance::for_account_type(account.account_type);

        let opening = match range.start {
            Some(start) => {
                let query = LineQuery::matching(organization_id, candidates.clone())
                    .between(Bound::Unbounded, Bound::Excluded(start));
                let prior = self.stores.journals.find_lines(&query).await?;
                opening_balance(normal, &prior)
                    .ok_or_else(|| LedgerError::BalanceOverflow(account.path.clone()))?
            }
            None => account.opening_balance.unwrap_or(Decimal::ZERO),
        };

        let query = LineQuery::matching(organization_id, candidates)
            .between(range.since_bound(), range.until_bound());
        let lines = self.stores.journals.find_lines(&query).await?;

        let references = self.references(&lines, &mut degraded).await;
        let report = compute_ledger(normal, opening, lines, |line| {
            references
                .get(&line.id)
                .cloned()
                .unwrap_or_else(|| line.journal_id.to_string())
        })
        .ok_or_else(|| LedgerError::BalanceOverflow(account.path.clone()))?;

        for degradation in &degraded {
            if matches!(degradation, Degradation::UnmappedCategory { .. }) {
                debug!(%degradation, "Ledger resolved without prefix mapping");
            } else {
                warn!(%degradation, "Ledger lookup degraded");
            }
        }

        Ok(LedgerView::Monetary {
            account,
            report,
            degraded,
        })
    }

    async fn references(
        &self,
        lines: &[TransactionLine],
        degraded: &mut Vec<Degradation>,
    ) -> HashMap<TransactionLineId, String> {
        let mut references = HashMap::with_capacity(lines.len());
        for line in lines {
            let reference = self.stores.vouchers.reference_for(line).await;
            if let Some(degradation) = reference.degradation {
                degraded.push(degradation);
            }
            references.insert(line.id, reference.text);
        }
        references
    }

    /// Validates, balances and atomically commits a journal entry.
    #[instrument(skip(self, input), fields(organization_id = %input.organization_id, lines = input.lines.len()))]
    pub async fn create_journal_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<JournalEntry, LedgerError> {
        let now = Utc::now();
        let draft = writer::draft(input, now)?;
        let totals = draft.totals;
        let entry = draft.into_entry(now);

        let committed = self.stores.journals.commit_journal(entry).await?;
        info!(
            journal_id = %committed.id,
            debit = %totals.debit,
            credit = %totals.credit,
            "Journal entry committed"
        );
        Ok(committed)
    }

    /// Loads a journal entry with its lines.
    pub async fn get_journal_entry(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
    ) -> Result<JournalEntry, LedgerError> {
        self.stores
            .journals
            .find_journal(organization_id, id)
            .await?
            .ok_or(LedgerError::JournalEntryNotFound(id))
    }

    /// Voids a committed entry; voiding twice is an error.
    #[instrument(skip(self, reason), fields(organization_id = %organization_id, journal_id = %id))]
    pub async fn void_journal_entry(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
        reason: Option<String>,
    ) -> Result<JournalEntry, LedgerError> {
        let entry = self.get_journal_entry(organization_id, id).await?;
        if !entry.can_void() {
            return Err(LedgerError::AlreadyVoided(id));
        }

        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        let voided = self
            .stores
            .journals
            .mark_voided(organization_id, id, reason, Utc::now())
            .await?;
        info!(reason = ?voided.void_reason, "Journal entry voided");
        Ok(voided)
    }

    /// Trial balance per literal ledger path up to and including `as_of`.
    #[instrument(skip(self), fields(organization_id = %organization_id))]
    pub async fn trial_balance(
        &self,
        organization_id: OrganizationId,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalance, LedgerError> {
        let range = DateRange::from_dates(None, as_of)?;
        let query = LineQuery::all(organization_id).between(Bound::Unbounded, range.until_bound());
        let lines = self.stores.journals.find_lines(&query).await?;
        TrialBalance::from_lines(as_of, &lines).ok_or_else(|| LedgerError::BalanceOverflow("trial balance".into()))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
