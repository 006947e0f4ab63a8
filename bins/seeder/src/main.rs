//! Demo-data seeder for Khata development and testing.
//!
//! Seeds one organization with a small chart of accounts, a customer and a
//! supplier, an inventory item with stock movements, and a handful of
//! balanced journal entries that exercise counterparty and voucher lookups.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use khata_core::catalog::{AccountType, CatalogService, CreateAccountInput};
use khata_core::counterparty::{Counterparty, CounterpartyKind};
use khata_core::inventory::{Item, RecordStockEntryInput, StockMovementKind};
use khata_core::ledger::{CreateJournalEntryInput, JournalLineInput, LedgerService, LineMeta, meta_keys};
use khata_core::store::{CounterpartyDirectory, ItemStore, Stores};
use khata_core::voucher::{VoucherKind, VoucherNumbers};
use khata_db::VoucherRepository;
use khata_shared::types::{CounterpartyId, ItemId, OrganizationId, VoucherId};

/// Demo organization ID (consistent for all seeds)
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";

/// `(code, name, type, parent code)`
const CHART: &[(&str, &str, AccountType, Option<&str>)] = &[
    ("1000", "Assets", AccountType::Asset, None),
    ("1100", "Cash", AccountType::Asset, Some("1000")),
    ("1200", "Accounts Receivable", AccountType::Asset, Some("1000")),
    ("1210", "Acme Retail", AccountType::Asset, Some("1200")),
    ("1300", "Inventory", AccountType::Asset, Some("1000")),
    ("1310", "Widget", AccountType::Asset, Some("1300")),
    ("2000", "Liabilities", AccountType::Liability, None),
    ("2100", "Accounts Payable", AccountType::Liability, Some("2000")),
    ("2110", "Globex Supply", AccountType::Liability, Some("2100")),
    ("3000", "Equity", AccountType::Equity, None),
    ("3100", "Capital", AccountType::Equity, Some("3000")),
    ("4000", "Income", AccountType::Revenue, None),
    ("4100", "Sales", AccountType::Revenue, Some("4000")),
    ("5000", "Expenses", AccountType::Expense, None),
    ("5100", "Rent", AccountType::Expense, Some("5000")),
];

struct Seeder {
    org: OrganizationId,
    stores: Stores,
    catalog: CatalogService,
    ledger: LedgerService,
    vouchers: VoucherRepository,
}

fn on(day: u32) -> anyhow::Result<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(2024, 1, day).context("invalid seed date")?;
    Ok(date.and_hms_opt(9, 0, 0).context("invalid seed time")?.and_utc())
}

fn line(account: &str, amount: &str, entry_type: &str, meta: LineMeta) -> JournalLineInput {
    JournalLineInput {
        account: account.to_string(),
        amount: amount.to_string(),
        entry_type: entry_type.to_string(),
        meta,
    }
}

impl Seeder {
    async fn already_seeded(&self) -> anyhow::Result<bool> {
        Ok(self.catalog.get_by_code(self.org, "1000").await.is_ok())
    }

    async fn seed_chart(&self) -> anyhow::Result<()> {
        for (code, name, account_type, parent) in CHART {
            self.catalog
                .create_account(CreateAccountInput {
                    organization_id: self.org,
                    code: (*code).to_string(),
                    name: (*name).to_string(),
                    account_type: *account_type,
                    subtype: None,
                    parent_code: parent.map(str::to_string),
                    description: None,
                    opening_balance: None,
                })
                .await?;
        }
        Ok(())
    }

    async fn seed_counterparty(&self, kind: CounterpartyKind, name: &str) -> anyhow::Result<CounterpartyId> {
        let saved = self
            .stores
            .counterparties
            .insert_counterparty(Counterparty {
                id: CounterpartyId::new(),
                organization_id: self.org,
                kind,
                name: name.to_string(),
            })
            .await?;
        Ok(saved.id)
    }

    async fn seed_voucher(&self, kind: VoucherKind, number: &str) -> anyhow::Result<VoucherId> {
        let id = VoucherId::new();
        self.vouchers
            .insert_voucher(
                kind,
                self.org,
                id,
                VoucherNumbers {
                    voucher_no: Some(number.to_string()),
                    reference_no: None,
                },
            )
            .await?;
        Ok(id)
    }

    async fn post(&self, memo: &str, day: u32, lines: Vec<JournalLineInput>) -> anyhow::Result<()> {
        self.ledger
            .create_journal_entry(CreateJournalEntryInput {
                organization_id: self.org,
                memo: memo.to_string(),
                datetime: Some(on(day)?),
                lines,
            })
            .await?;
        Ok(())
    }

    async fn seed_journal(&self, customer: CounterpartyId, supplier: CounterpartyId) -> anyhow::Result<()> {
        self.post(
            "Owner capital",
            1,
            vec![
                line("Assets:Cash", "10000", "debit", LineMeta::new()),
                line("Equity:Capital", "10000", "credit", LineMeta::new()),
            ],
        )
        .await?;

        let invoice = self.seed_voucher(VoucherKind::SalesInvoice, "SI-0001").await?;
        let invoice_meta = LineMeta::new()
            .with(meta_keys::VOUCHER_TYPE, VoucherKind::SalesInvoice.as_str())
            .with(meta_keys::VOUCHER_ID, invoice.to_string());
        self.post(
            "Credit sale to Acme Retail",
            5,
            vec![
                line(
                    "Assets:Accounts Receivable",
                    "1500.00",
                    "debit",
                    invoice_meta.clone().with(meta_keys::CUSTOMER_ID, customer.to_string()),
                ),
                line("Income:Sales", "1500.00", "credit", invoice_meta),
            ],
        )
        .await?;

        let bill = self.seed_voucher(VoucherKind::PurchaseInvoice, "PI-0001").await?;
        let bill_meta = LineMeta::new()
            .with(meta_keys::VOUCHER_TYPE, VoucherKind::PurchaseInvoice.as_str())
            .with(meta_keys::VOUCHER_ID, bill.to_string());
        self.post(
            "January rent from Globex",
            10,
            vec![
                line("Expenses:Rent", "800.00", "debit", bill_meta.clone()),
                line(
                    "Liabilities:Accounts Payable",
                    "800.00",
                    "credit",
                    bill_meta.with(meta_keys::SUPPLIER_ID, supplier.to_string()),
                ),
            ],
        )
        .await?;

        self.post(
            "Acme pays part of SI-0001",
            20,
            vec![
                line("Assets:Cash", "1000.00", "debit", LineMeta::new()),
                line("Assets:Accounts Receivable:Acme Retail", "1000.00", "credit", LineMeta::new()),
            ],
        )
        .await
    }

    async fn seed_inventory(&self) -> anyhow::Result<()> {
        let widget = self
            .stores
            .items
            .insert_item(Item {
                id: ItemId::new(),
                organization_id: self.org,
                name: "Widget".to_string(),
                opening_stock: Decimal::from(25),
                unit: Some("pcs".to_string()),
                created_at: Utc::now(),
            })
            .await?;

        for (day, quantity, kind) in [
            (3, 10, StockMovementKind::Purchase),
            (5, -4, StockMovementKind::Sales),
            (12, -1, StockMovementKind::Adjustment),
        ] {
            self.ledger
                .inventory()
                .record_stock_entry(RecordStockEntryInput {
                    organization_id: self.org,
                    item_id: widget.id,
                    warehouse_id: None,
                    date: Some(on(day)?),
                    quantity: Decimal::from(quantity),
                    transaction_type: kind,
                    reference_id: None,
                    notes: None,
                })
                .await?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let stores = khata_db::stores(&db);
    let seeder = Seeder {
        org: OrganizationId::from_uuid(Uuid::from_str(DEMO_ORG_ID)?),
        catalog: CatalogService::new(stores.accounts.clone()),
        ledger: LedgerService::new(stores.clone()),
        vouchers: VoucherRepository::new(db),
        stores,
    };

    if seeder.already_seeded().await? {
        println!("  Demo organization already seeded, skipping...");
        return Ok(());
    }

    println!("Seeding chart of accounts...");
    seeder.seed_chart().await?;

    println!("Seeding customers and suppliers...");
    let customer = seeder.seed_counterparty(CounterpartyKind::Customer, "Acme Retail").await?;
    let supplier = seeder.seed_counterparty(CounterpartyKind::Supplier, "Globex Supply").await?;

    println!("Seeding journal entries...");
    seeder.seed_journal(customer, supplier).await?;

    println!("Seeding inventory...");
    seeder.seed_inventory().await?;

    println!("Seeding complete! Organization: {DEMO_ORG_ID}");
    Ok(())
}
