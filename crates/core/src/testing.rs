//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use khata_shared::types::{
    AccountId, ItemId, JournalEntryId, OrganizationId, StockEntryId, TransactionLineId, VoucherId,
};

use crate::catalog::{Account, AccountType, path};
use crate::counterparty::{Counterparty, CounterpartyKind};
use crate::inventory::{Item, StockEntry};
use crate::ledger::{JournalEntry, LineMeta, Side, TransactionLine};
use crate::store::{CounterpartyDirectory, StoreError, VoucherSource};
use crate::voucher::{VoucherKind, VoucherNumbers};

static NEXT_CODE: AtomicU32 = AtomicU32::new(1000);

/// Midnight UTC on the given day.
pub fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .expect("valid test date")
}

/// An account fixture in a fresh organization.
pub fn account(account_path: &str, account_type: AccountType) -> Account {
    let now = Utc::now();
    Account {
        id: AccountId::new(),
        organization_id: OrganizationId::new(),
        code: NEXT_CODE.fetch_add(1, Ordering::Relaxed).to_string(),
        name: path::leaf(account_path).to_string(),
        path: account_path.to_string(),
        account_type,
        subtype: None,
        parent_code: None,
        description: None,
        opening_balance: None,
        created_at: now,
        updated_at: now,
    }
}

/// A line in a fresh organization and journal.
pub fn line_at(accounts: &str, side: Side, amount: Decimal, datetime: DateTime<Utc>) -> TransactionLine {
    TransactionLine {
        id: TransactionLineId::new(),
        journal_id: JournalEntryId::new(),
        organization_id: OrganizationId::new(),
        accounts: accounts.to_string(),
        side,
        amount,
        datetime,
        meta: LineMeta::new(),
        memo: "Test entry".to_string(),
        created_at: datetime,
    }
}

/// A cash debit carrying the given metadata object.
pub fn line_with_meta(meta: Value) -> TransactionLine {
    let mut line = line_at("Assets:Cash", Side::Debit, Decimal::ONE, ymd(2024, 1, 1));
    line.meta = LineMeta::from_value(meta);
    line
}

/// A committed journal entry with the given lines.
pub fn journal_with_lines(lines: &[(&str, Side, Decimal)]) -> JournalEntry {
    let id = JournalEntryId::new();
    let organization_id = OrganizationId::new();
    let datetime = ymd(2024, 1, 1);
    JournalEntry {
        id,
        organization_id,
        memo: "Test entry".to_string(),
        datetime,
        voided: false,
        void_reason: None,
        voided_at: None,
        created_at: datetime,
        lines: lines
            .iter()
            .map(|(accounts, side, amount)| {
                let mut line = line_at(accounts, *side, *amount, datetime);
                line.journal_id = id;
                line.organization_id = organization_id;
                line
            })
            .collect(),
    }
}

/// An inventory item in a fresh organization.
pub fn item(name: &str, opening_stock: Decimal) -> Item {
    Item {
        id: ItemId::new(),
        organization_id: OrganizationId::new(),
        name: name.to_string(),
        opening_stock,
        unit: Some("pcs".to_string()),
        created_at: ymd(2024, 1, 1),
    }
}

/// A stock movement for `item`.
pub fn stock_entry(
    item: &Item,
    quantity: Decimal,
    transaction_type: Option<&str>,
    date: DateTime<Utc>,
) -> StockEntry {
    StockEntry {
        id: StockEntryId::new(),
        organization_id: item.organization_id,
        item_id: item.id,
        warehouse_id: None,
        date,
        quantity,
        transaction_type: transaction_type.map(str::to_string),
        reference_id: None,
        notes: None,
        created_at: date,
    }
}

/// Voucher source answering from a fixed table.
#[derive(Debug, Default)]
pub struct FixedVouchers {
    numbers: HashMap<VoucherId, VoucherNumbers>,
    failing: bool,
}

impl FixedVouchers {
    pub fn with(id: VoucherId, voucher_no: &str) -> Self {
        let mut numbers = HashMap::new();
        numbers.insert(
            id,
            VoucherNumbers {
                voucher_no: Some(voucher_no.to_string()),
                reference_no: None,
            },
        );
        Self {
            numbers,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            numbers: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl VoucherSource for FixedVouchers {
    async fn find_voucher(
        &self,
        _kind: VoucherKind,
        _organization_id: OrganizationId,
        id: VoucherId,
    ) -> Result<Option<VoucherNumbers>, StoreError> {
        if self.failing {
            return Err(StoreError::Database("connection refused".into()));
        }
        Ok(self.numbers.get(&id).cloned())
    }
}

/// Counterparty directory whose every call fails.
#[derive(Debug)]
pub struct FailingCounterparties;

#[async_trait]
impl CounterpartyDirectory for FailingCounterparties {
    async fn find_by_name(
        &self,
        _kind: CounterpartyKind,
        _organization_id: OrganizationId,
        _name: &str,
    ) -> Result<Option<Counterparty>, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }

    async fn insert_counterparty(&self, _counterparty: Counterparty) -> Result<Counterparty, StoreError> {
        Err(StoreError::Database("connection refused".into()))
    }
}
