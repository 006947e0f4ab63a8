//! In-memory store.
//!
//! Backs every store trait with `RwLock<HashMap>` tables. Used by tests and
//! by the server when no database URL is configured.

use std::collections::HashMap;
use std::ops::Bound;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use khata_shared::types::{AccountId, ItemId, JournalEntryId, OrganizationId, VoucherId};

use super::{
    AccountStore, CounterpartyDirectory, ItemStore, JournalStore, LineQuery, StockStore,
    StoreError, Stores, VoucherSource, within_bounds,
};
use crate::catalog::Account;
use crate::counterparty::{Counterparty, CounterpartyKind};
use crate::inventory::{Item, StockEntry};
use crate::ledger::{JournalEntry, TransactionLine};
use crate::voucher::{VoucherDirectory, VoucherKind, VoucherNumbers};

type VoucherTable = HashMap<(VoucherKind, VoucherId), (OrganizationId, VoucherNumbers)>;

/// Thread-safe in-memory implementation of all store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
    journals: RwLock<HashMap<JournalEntryId, JournalEntry>>,
    counterparties: RwLock<Vec<Counterparty>>,
    items: RwLock<HashMap<ItemId, Item>>,
    stock: RwLock<Vec<StockEntry>>,
    vouchers: RwLock<VoucherTable>,
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Database("in-memory store lock poisoned".to_string())
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(poisoned)
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store registry where every collaborator is this store.
    #[must_use]
    pub fn stores(store: Arc<Self>) -> Stores {
        Stores {
            accounts: store.clone(),
            journals: store.clone(),
            counterparties: store.clone(),
            items: store.clone(),
            stock: store.clone(),
            vouchers: VoucherDirectory::uniform(store),
        }
    }

    /// Registers the numbers of a voucher document.
    pub fn insert_voucher(
        &self,
        kind: VoucherKind,
        organization_id: OrganizationId,
        id: VoucherId,
        numbers: VoucherNumbers,
    ) -> Result<(), StoreError> {
        write(&self.vouchers)?.insert((kind, id), (organization_id, numbers));
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = write(&self.accounts)?;
        if accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!("account {} already exists", account.id)));
        }
        if accounts
            .values()
            .any(|a| a.organization_id == account.organization_id && a.code == account.code)
        {
            return Err(StoreError::Conflict(format!("account code {} already exists", account.code)));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = write(&self.accounts)?;
        if !accounts.contains_key(&account.id) {
            return Err(StoreError::Database(format!("account {} does not exist", account.id)));
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account_by_id(
        &self,
        organization_id: OrganizationId,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        Ok(read(&self.accounts)?
            .get(&id)
            .filter(|a| a.organization_id == organization_id)
            .cloned())
    }

    async fn find_account_by_code(
        &self,
        organization_id: OrganizationId,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(read(&self.accounts)?
            .values()
            .find(|a| a.organization_id == organization_id && a.code == code)
            .cloned())
    }

    async fn find_account_by_path(
        &self,
        organization_id: OrganizationId,
        path: &str,
    ) -> Result<Option<Account>, StoreError> {
        Ok(read(&self.accounts)?
            .values()
            .find(|a| a.organization_id == organization_id && a.path == path)
            .cloned())
    }

    async fn list_accounts(&self, organization_id: OrganizationId) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = read(&self.accounts)?
            .values()
            .filter(|a| a.organization_id == organization_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn list_children(
        &self,
        organization_id: OrganizationId,
        parent_code: Option<&str>,
    ) -> Result<Vec<Account>, StoreError> {
        let mut children: Vec<Account> = read(&self.accounts)?
            .values()
            .filter(|a| a.organization_id == organization_id && a.parent_code.as_deref() == parent_code)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(children)
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn commit_journal(&self, entry: JournalEntry) -> Result<JournalEntry, StoreError> {
        let mut journals = write(&self.journals)?;
        if journals.contains_key(&entry.id) {
            return Err(StoreError::Conflict(format!("journal entry {} already exists", entry.id)));
        }
        journals.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn find_journal(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, StoreError> {
        Ok(read(&self.journals)?
            .get(&id)
            .filter(|j| j.organization_id == organization_id)
            .cloned())
    }

    async fn mark_voided(
        &self,
        organization_id: OrganizationId,
        id: JournalEntryId,
        reason: Option<String>,
        voided_at: DateTime<Utc>,
    ) -> Result<JournalEntry, StoreError> {
        let mut journals = write(&self.journals)?;
        let entry = journals
            .get_mut(&id)
            .filter(|j| j.organization_id == organization_id)
            .ok_or_else(|| StoreError::Database(format!("journal entry {id} does not exist")))?;
        entry.voided = true;
        entry.void_reason = reason;
        entry.voided_at = Some(voided_at);
        Ok(entry.clone())
    }

    async fn find_lines(&self, query: &LineQuery) -> Result<Vec<TransactionLine>, StoreError> {
        let mut lines: Vec<TransactionLine> = read(&self.journals)?
            .values()
            .filter(|j| !j.voided && j.organization_id == query.organization_id)
            .flat_map(|j| j.lines.iter())
            .filter(|line| query.matches(line))
            .cloned()
            .collect();
        lines.sort_by(|a, b| (a.datetime, a.created_at, a.id).cmp(&(b.datetime, b.created_at, b.id)));
        Ok(lines)
    }
}

#[async_trait]
impl CounterpartyDirectory for MemoryStore {
    async fn find_by_name(
        &self,
        kind: CounterpartyKind,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Counterparty>, StoreError> {
        let wanted = name.trim().to_lowercase();
        Ok(read(&self.counterparties)?
            .iter()
            .find(|c| {
                c.kind == kind
                    && c.organization_id == organization_id
                    && c.name.trim().to_lowercase() == wanted
            })
            .cloned())
    }

    async fn insert_counterparty(&self, counterparty: Counterparty) -> Result<Counterparty, StoreError> {
        let mut counterparties = write(&self.counterparties)?;
        if counterparties.iter().any(|c| c.id == counterparty.id) {
            return Err(StoreError::Conflict(format!("counterparty {} already exists", counterparty.id)));
        }
        counterparties.push(counterparty.clone());
        Ok(counterparty)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn find_item_by_id(
        &self,
        organization_id: OrganizationId,
        id: ItemId,
    ) -> Result<Option<Item>, StoreError> {
        Ok(read(&self.items)?
            .get(&id)
            .filter(|i| i.organization_id == organization_id)
            .cloned())
    }

    async fn find_item_by_name(
        &self,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Option<Item>, StoreError> {
        Ok(read(&self.items)?
            .values()
            .find(|i| i.organization_id == organization_id && i.name == name)
            .cloned())
    }

    async fn insert_item(&self, item: Item) -> Result<Item, StoreError> {
        let mut items = write(&self.items)?;
        if items.contains_key(&item.id) {
            return Err(StoreError::Conflict(format!("item {} already exists", item.id)));
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }
}

#[async_trait]
impl StockStore for MemoryStore {
    async fn insert_stock_entry(&self, entry: StockEntry) -> Result<StockEntry, StoreError> {
        write(&self.stock)?.push(entry.clone());
        Ok(entry)
    }

    async fn find_stock_entries(
        &self,
        organization_id: OrganizationId,
        item_id: ItemId,
        since: Bound<DateTime<Utc>>,
        until: Bound<DateTime<Utc>>,
    ) -> Result<Vec<StockEntry>, StoreError> {
        let mut entries: Vec<StockEntry> = read(&self.stock)?
            .iter()
            .filter(|e| {
                e.organization_id == organization_id
                    && e.item_id == item_id
                    && within_bounds(&e.date, &since, &until)
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| (a.date, a.created_at, a.id).cmp(&(b.date, b.created_at, b.id)));
        Ok(entries)
    }
}

#[async_trait]
impl VoucherSource for MemoryStore {
    async fn find_voucher(
        &self,
        kind: VoucherKind,
        organization_id: OrganizationId,
        id: VoucherId,
    ) -> Result<Option<VoucherNumbers>, StoreError> {
        Ok(read(&self.vouchers)?
            .get(&(kind, id))
            .filter(|(org, _)| *org == organization_id)
            .map(|(_, numbers)| numbers.clone()))
    }
}
