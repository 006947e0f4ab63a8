//! Tests for LedgerService against the in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use khata_shared::types::{CounterpartyId, OrganizationId, VoucherId};

use super::*;
use crate::catalog::AccountType;
use crate::counterparty::{Counterparty, CounterpartyKind};
use crate::ledger::{JournalLineInput, LineMeta};
use crate::store::memory::MemoryStore;
use crate::store::{AccountStore, CounterpartyDirectory, ItemStore, StockStore};
use crate::testing::{account, item, stock_entry, ymd};
use crate::voucher::{VoucherKind, VoucherNumbers};

struct Fixture {
    store: Arc<MemoryStore>,
    service: LedgerService,
    org: OrganizationId,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let service = LedgerService::new(MemoryStore::stores(store.clone()));
        Self {
            store,
            service,
            org: OrganizationId::new(),
        }
    }

    async fn open(&self, path: &str, account_type: AccountType) -> Account {
        let mut acc = account(path, account_type);
        acc.organization_id = self.org;
        self.store.insert_account(acc.clone()).await.unwrap();
        acc
    }

    async fn post(&self, memo: &str, day: u32, lines: Vec<JournalLineInput>) -> JournalEntry {
        self.service
            .create_journal_entry(CreateJournalEntryInput {
                organization_id: self.org,
                memo: memo.to_string(),
                datetime: Some(ymd(2024, 1, day)),
                lines,
            })
            .await
            .unwrap()
    }

    async fn monetary(&self, acc: &Account, range: DateRange) -> (LedgerReport, Vec<Degradation>) {
        match self
            .service
            .account_ledger(self.org, acc.id, range, ResolveOptions::default())
            .await
            .unwrap()
        {
            LedgerView::Monetary {
                report, degraded, ..
            } => (report, degraded),
            LedgerView::Inventory { .. } => panic!("expected a monetary ledger"),
        }
    }
}

fn jl(account: &str, amount: &str, entry_type: &str) -> JournalLineInput {
    JournalLineInput {
        account: account.to_string(),
        amount: amount.to_string(),
        entry_type: entry_type.to_string(),
        meta: LineMeta::new(),
    }
}

async fn cash_book(fx: &Fixture) -> (Account, JournalEntry) {
    let cash = fx.open("Assets:Cash", AccountType::Asset).await;
    fx.post(
        "Cash sale",
        5,
        vec![
            JournalLineInput {
                meta: LineMeta::new().with("voucherNumber", "SI-1"),
                ..jl("Assets:Cash", "500", "debit")
            },
            jl("Income:Sales Revenue", "500", "credit"),
        ],
    )
    .await;
    let rent = fx
        .post(
            "January rent",
            10,
            vec![jl("Expenses:Rent", "200", "debit"), jl("Cash", "200", "credit")],
        )
        .await;
    (cash, rent)
}

#[tokio::test]
async fn test_ledger_includes_legacy_paths_and_references() {
    let fx = Fixture::new();
    let (cash, rent) = cash_book(&fx).await;

    let (report, _) = fx.monetary(&cash, DateRange::unbounded()).await;

    assert_eq!(report.opening_balance, dec!(0));
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.transactions[0].reference, "SI-1");
    assert_eq!(report.transactions[0].balance, dec!(500));
    assert_eq!(report.transactions[1].reference, rent.id.to_string());
    assert_eq!(report.transactions[1].description, "January rent");
    assert_eq!(report.transactions[1].balance, dec!(300));
    assert_eq!(report.closing_balance, dec!(300));
}

#[tokio::test]
async fn test_range_start_folds_prior_lines_into_opening() {
    let fx = Fixture::new();
    let (cash, _) = cash_book(&fx).await;

    let range = DateRange::from_dates(NaiveDate::from_ymd_opt(2024, 1, 6), None).unwrap();
    let (report, _) = fx.monetary(&cash, range).await;

    assert_eq!(report.opening_balance, dec!(500));
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.closing_balance, dec!(300));
}

#[tokio::test]
async fn test_stored_opening_balance_used_without_start_date() {
    let fx = Fixture::new();
    let mut rent = account("Expenses:Rent", AccountType::Expense);
    rent.organization_id = fx.org;
    rent.opening_balance = Some(dec!(50));
    fx.store.insert_account(rent.clone()).await.unwrap();
    fx.post(
        "January rent",
        10,
        vec![jl("Expenses:Rent", "200", "debit"), jl("Assets:Bank", "200", "credit")],
    )
    .await;

    let (report, _) = fx.monetary(&rent, DateRange::unbounded()).await;
    assert_eq!(report.opening_balance, dec!(50));
    assert_eq!(report.closing_balance, dec!(250));
}

#[tokio::test]
async fn test_payable_ledger_collects_supplier_lines() {
    let fx = Fixture::new();
    let acme = fx
        .open("Liabilities:Accounts Payable:Acme", AccountType::Liability)
        .await;
    let supplier = Counterparty {
        id: CounterpartyId::new(),
        organization_id: fx.org,
        kind: CounterpartyKind::Supplier,
        name: "Acme".into(),
    };
    fx.store.insert_counterparty(supplier.clone()).await.unwrap();

    fx.post(
        "Office chairs",
        3,
        vec![
            jl("Expenses:Office", "100", "debit"),
            JournalLineInput {
                meta: LineMeta::new().with("supplierId", supplier.id.to_string()),
                ..jl("Liabilities:Accounts Payable", "100", "credit")
            },
        ],
    )
    .await;
    fx.post(
        "Paper",
        4,
        vec![jl("Expenses:Office", "50", "debit"), jl("Liabilities:Accounts Payable:ACME", "50", "credit")],
    )
    .await;
    fx.post(
        "Other supplier",
        5,
        vec![jl("Expenses:Office", "70", "debit"), jl("Liabilities:Accounts Payable:Initech", "70", "credit")],
    )
    .await;

    let (report, degraded) = fx.monetary(&acme, DateRange::unbounded()).await;
    assert!(degraded.is_empty());
    assert_eq!(report.transactions.len(), 2);
    assert_eq!(report.closing_balance, dec!(150));
}

#[tokio::test]
async fn test_repeated_ledger_reads_are_identical() {
    let fx = Fixture::new();
    let receivable = fx
        .open("Assets:Accounts Receivable:Acme Retail", AccountType::Asset)
        .await;
    let customer = Counterparty {
        id: CounterpartyId::new(),
        organization_id: fx.org,
        kind: CounterpartyKind::Customer,
        name: "Acme Retail".into(),
    };
    fx.store.insert_counterparty(customer.clone()).await.unwrap();
    let invoice = VoucherId::new();
    fx.store
        .insert_voucher(
            VoucherKind::SalesInvoice,
            fx.org,
            invoice,
            VoucherNumbers {
                voucher_no: Some("SI-0042".into()),
                reference_no: None,
            },
        )
        .unwrap();

    fx.post(
        "Invoice via generic receivable",
        2,
        vec![
            JournalLineInput {
                meta: LineMeta::new()
                    .with("customerId", customer.id.to_string())
                    .with("voucherType", "SalesInvoice")
                    .with("voucherId", invoice.to_string()),
                ..jl("Assets:Accounts Receivable", "300", "debit")
            },
            jl("Income:Sales", "300", "credit"),
        ],
    )
    .await;
    fx.post(
        "Legacy receipt",
        6,
        vec![
            jl("Assets:Cash", "120", "debit"),
            JournalLineInput {
                meta: LineMeta::new().with("voucherNumber", "RC-7"),
                ..jl("Accounts Receivable:ACME RETAIL", "120", "credit")
            },
        ],
    )
    .await;
    fx.post(
        "Canonical invoice",
        6,
        vec![
            jl("Assets:Accounts Receivable:Acme Retail", "80", "debit"),
            jl("Income:Sales", "80", "credit"),
        ],
    )
    .await;

    let range = DateRange::from_dates(NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 1, 31)).unwrap();
    let mut views = Vec::new();
    for _ in 0..2 {
        let view = fx
            .service
            .account_ledger(fx.org, receivable.id, range, ResolveOptions::default())
            .await
            .unwrap();
        views.push(view);
    }
    assert_eq!(views[0], views[1]);
    let first = views.swap_remove(0);

    let LedgerView::Monetary { report, degraded, .. } = first else {
        panic!("expected a monetary ledger");
    };
    assert!(degraded.is_empty());
    let references: Vec<&str> = report.transactions.iter().map(|r| r.reference.as_str()).collect();
    assert_eq!(report.transactions.len(), 3);
    assert_eq!(references[0], "SI-0042");
    assert!(references.contains(&"RC-7"));
    assert_eq!(report.closing_balance, dec!(260));
}

#[tokio::test]
async fn test_void_removes_lines_and_cannot_repeat() {
    let fx = Fixture::new();
    let (cash, rent) = cash_book(&fx).await;

    let voided = fx
        .service
        .void_journal_entry(fx.org, rent.id, Some("  duplicate  ".into()))
        .await
        .unwrap();
    assert!(voided.voided);
    assert_eq!(voided.void_reason.as_deref(), Some("duplicate"));

    let (report, _) = fx.monetary(&cash, DateRange::unbounded()).await;
    assert_eq!(report.closing_balance, dec!(500));

    let err = fx
        .service
        .void_journal_entry(fx.org, rent.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyVoided(id) if id == rent.id));
}

#[tokio::test]
async fn test_unbalanced_entry_is_not_committed() {
    let fx = Fixture::new();
    let err = fx
        .service
        .create_journal_entry(CreateJournalEntryInput {
            organization_id: fx.org,
            memo: "Split".into(),
            datetime: None,
            lines: vec![
                jl("Expenses:Rent", "100", "debit"),
                jl("Expenses:Power", "10", "debit"),
                jl("Assets:Bank", "100", "credit"),
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::UnbalancedEntry { .. }));

    let tb = fx.service.trial_balance(fx.org, None).await.unwrap();
    assert!(tb.accounts.is_empty());
}

#[tokio::test]
async fn test_overflowing_stored_balances_are_errors() {
    let fx = Fixture::new();
    let cash = fx.open("Assets:Cash", AccountType::Asset).await;
    let max = Decimal::MAX.to_string();
    for day in [2, 3] {
        fx.post("Huge", day, vec![jl("Assets:Cash", &max, "debit"), jl("Equity:Capital", &max, "credit")])
            .await;
    }

    let err = fx
        .service
        .account_ledger(fx.org, cash.id, DateRange::unbounded(), ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceOverflow(ref path) if path == "Assets:Cash"));

    let later = DateRange::from_dates(NaiveDate::from_ymd_opt(2024, 1, 4), None).unwrap();
    let err = fx
        .service
        .account_ledger(fx.org, cash.id, later, ResolveOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceOverflow(_)));

    let err = fx.service.trial_balance(fx.org, None).await.unwrap_err();
    assert_eq!(err.error_code(), "BALANCE_OVERFLOW");
}

#[tokio::test]
async fn test_overflowing_entry_is_rejected_before_commit() {
    let fx = Fixture::new();
    let huge = "70000000000000000000000000000";
    let err = fx
        .service
        .create_journal_entry(CreateJournalEntryInput {
            organization_id: fx.org,
            memo: "Huge".into(),
            datetime: None,
            lines: vec![
                jl("Assets:Cash", huge, "debit"),
                jl("Assets:Bank", huge, "debit"),
                jl("Income:Sales", "1", "credit"),
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AmountOverflow));
    assert_eq!(err.http_status_code(), 400);
    assert!(fx.service.trial_balance(fx.org, None).await.unwrap().accounts.is_empty());
}

#[tokio::test]
async fn test_trial_balance_respects_as_of() {
    let fx = Fixture::new();
    cash_book(&fx).await;

    let all = fx.service.trial_balance(fx.org, None).await.unwrap();
    assert_eq!(all.accounts.len(), 4);
    assert!(all.totals.is_balanced);

    let early = fx
        .service
        .trial_balance(fx.org, NaiveDate::from_ymd_opt(2024, 1, 5))
        .await
        .unwrap();
    assert_eq!(early.accounts.len(), 2);
    assert_eq!(early.totals.total_debit, dec!(500));
}

#[tokio::test]
async fn test_inventory_account_yields_stock_ledger() {
    let fx = Fixture::new();
    let acc = fx.open("Assets:Inventory:WidgetA", AccountType::Asset).await;
    let mut widget = item("WidgetA", dec!(10));
    widget.organization_id = fx.org;
    fx.store.insert_item(widget.clone()).await.unwrap();
    fx.store
        .insert_stock_entry(stock_entry(&widget, dec!(5), Some("purchase"), ymd(2024, 1, 2)))
        .await
        .unwrap();

    let view = fx
        .service
        .account_ledger(fx.org, acc.id, DateRange::unbounded(), ResolveOptions::default())
        .await
        .unwrap();
    match view {
        LedgerView::Inventory { stock, .. } => assert_eq!(stock.closing_stock, dec!(15)),
        LedgerView::Monetary { .. } => panic!("expected an inventory ledger"),
    }
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .service
        .account_ledger(
            fx.org,
            khata_shared::types::AccountId::new(),
            DateRange::unbounded(),
            ResolveOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}
