//! Store collaborator traits.
//!
//! Services in this crate never touch a database directly. They are handed a
//! [`Stores`] registry of trait objects, filled either with the SeaORM
//! repositories of the `db` crate or with [`memory::MemoryStore`].

pub mod memory;

use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use khata_shared::types::{AccountId, ItemId, JournalEntryId, OrganizationId, VoucherId};

use crate::catalog::Account;
use crate::counterparty::{Counterparty, CounterpartyKind};
use crate::inventory::{Item, StockEntry};
use crate::ledger::{JournalEntry, TransactionLine};
use crate::resolver::CandidateSet;
use crate::voucher::{VoucherDirectory, VoucherKind, VoucherNumbers};

/// Whether `datetime` lies inside a pair of range bounds.
#[must_use]
pub fn within_bounds(
    datetime: &DateTime<Utc>,
    since: &Bound<DateTime<Utc>>,
    until: &Bound<DateTime<Utc>>,
) -> bool {
    let after_start = match since {
        Bound::Included(start) => datetime >= start,
        Bound::Excluded(start) => datetime > start,
        Bound::Unbounded => true,
    };
    let before_end = match until {
        Bound::Included(end) => datetime <= end,
        Bound::Excluded(end) => datetime < end,
        Bound::Unbounded => true,
    };
    after_start && before_end
}

/// Errors raised by store implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Selection of transaction lines for one organization.
///
/// Lines belonging to voided journal entries are never returned.
#[derive(Debug, Clone)]
pub struct LineQuery {
    /// Tenant scope.
    pub organization_id: OrganizationId,
    /// Path filter; `None` selects every line of the organization.
    pub candidates: Option<CandidateSet>,
    /// Lower datetime bound.
    pub since: Bound<DateTime<Utc>>,
    /// Upper datetime bound.
    pub until: Bound<DateTime<Utc>>,
}

impl LineQuery {
    /// Every line of the organization.
    #[must_use]
    pub fn all(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            candidates: None,
            since: Bound::Unbounded,
            until: Bound::Unbounded,
        }
    }

    /// Lines whose account path matches any candidate.
    #[must_use]
    pub fn matching(organization_id: OrganizationId, candidates: CandidateSet) -> Self {
        Self {
            candidates: Some(candidates),
            ..Self::all(organization_id)
        }
    }

    /// Restricts the query to `since ..= until` style bounds.
    #[must_use]
    pub fn between(mut self, since: Bound<DateTime<Utc>>, until: Bound<DateTime<Utc>>) -> Self {
        self.since = since;
        self.until = until;
        self
    }

    /// Whether a datetime falls inside the query bounds.
    #[must_use]
    pub fn contains_datetime(&self, datetime: &DateTime<Utc>) -> bool {
        within_bounds(datetime, &self.since, &self.until)
    }

    /// Whether a line satisfies the tenant, path and date filters.
    #[must_use]
    pub fn matches(&self, line: &TransactionLine) -> bool {
        line.organization_id == self.organization_id
            && self.contains_datetime(&line.datetime)
            && self.candidates.as_ref().is_none_or(|set| set.matches(line))
    }
}

/// Chart of accounts persistence.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. Duplicate codes surface as [`StoreError::Conflict`].
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;

    /// Replaces an existing account.
    async fn update_account(&self, account: Account) -> Result<Account, StoreError>;

    /// Finds an account by id within an organization.
    async fn find_account_by_id(
        &self,
        organization_id: OrganizationId,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError>;

    /// Finds an account by its code.
    async fn find_account_by_code(
        &self,
        organization_id: OrganizationId,
        code: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Finds an account by its exact path.
    async fn find_account_by_path(
        &self,
        organization_id: OrganizationId,
        path: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Lists all accounts ordered by code.
    async fn list_accounts(&self, organization_id: OrganizationId) -> Result<Vec<Account>, StoreError>;

    /// Lists direct children of `parent_code`, or the roots when `None`.
    async fn list_children(
        &self,
        organization_id: OrganizationId,
        parent_code: Option<&str>,
    ) -> Result<Vec<Account>, StoreError>;
}

/// Journal entry and transaction line persistence.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Persists the entry and all of its lines atomically.
    async fn commit_journal(&self, entry: JournalEntry) -> Result<JournalEntry, StoreError>;

    /// Loads an entry with its lines.
    async fn find_journal(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError>;

    /// Flags an entry as voided.
    async fn mark_voided(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
        reason: Option<String>,
        voided_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError>;

    /// Finds lines matching the query, excluding voided entries.
    async fn find_lines(&self, query: &LineQuery) -> Result<Vec<TransactionLine>, StoreError>;
}

/// Customer and supplier lookup.
#[async_trait]
pub trait CounterpartyDirectory: Send + Sync {
    /// Finds a counterparty by name within an organization, ignoring case.
    async fn find_by_name(
        &self,
        kind: CounterpartyKind,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Counterparty>, StoreError>;

    /// Adds a counterparty.
    async fn insert_counterparty(&self, counterparty: Counterparty) -> Result<Counterparty, StoreError>;
}

/// Inventory item lookup.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Finds an item by id.
    async fn find_item_by_id(
        &self,
        organization_id: OrganizationId,
        id: ItemId,
    ) -> Result<Option<Item>, StoreError>;

    /// Finds an item by exact name.
    async fn find_item_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Item>, StoreError>;

    /// Adds an item.
    async fn insert_item(&self, item: Item) -> Result<Item, StoreError>;
}

/// Stock movement persistence.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Appends a stock entry.
    async fn insert_stock_entry(&self, entry: StockEntry) -> Result<StockEntry, StoreError>;

    /// Entries for one item whose date falls within the bounds.
    async fn find_stock_entries(
        &self,
        organization_id: OrganizationId,
        item_id: ItemId,
        since: Bound<DateTime<Utc>>,
        until: Bound<DateTime<Utc>>,
    ) -> Result<Vec<StockEntry>, StoreError>;
}

/// Source of human-facing voucher numbers for one voucher kind.
#[async_trait]
pub trait VoucherSource: Send + Sync {
    /// Returns the voucher's numbers, or `None` if the voucher does not exist.
    async fn find_voucher(
        &self,
        kind: VoucherKind,
        organization_id: OrganizationId,
        id: VoucherId,
    ) -> Result<Option<VoucherNumbers>, StoreError>;
}

/// Registry of store collaborators handed to services.
#[derive(Clone)]
pub struct Stores {
    /// Chart of accounts.
    pub accounts: Arc<dyn AccountStore>,
    /// Journal entries and lines.
    pub journals: Arc<dyn JournalStore>,
    /// Customers and suppliers.
    pub counterparties: Arc<dyn CounterpartyDirectory>,
    /// Inventory items.
    pub items: Arc<dyn ItemStore>,
    /// Stock movements.
    pub stock: Arc<dyn StockStore>,
    /// Voucher number sources keyed by voucher kind.
    pub vouchers: VoucherDirectory,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("vouchers", &self.vouchers)
            .finish_non_exhaustive()
    }
}
