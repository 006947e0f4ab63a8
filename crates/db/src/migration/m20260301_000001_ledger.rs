//! Ledger schema migration.
//!
//! Creates the chart of accounts, journal entries with their transaction
//! lines, the counterparty directories, inventory tables and voucher numbers.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: JOURNAL ENTRIES & TRANSACTION LINES
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(TRANSACTION_LINES_SQL).await?;

        // ============================================================
        // PART 3: COUNTERPARTIES
        // ============================================================
        db.execute_unprepared(COUNTERPARTIES_SQL).await?;

        // ============================================================
        // PART 4: INVENTORY
        // ============================================================
        db.execute_unprepared(INVENTORY_SQL).await?;

        // ============================================================
        // PART 5: VOUCHERS
        // ============================================================
        db.execute_unprepared(VOUCHERS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(IMMUTABILITY_TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    path TEXT NOT NULL,
    account_type VARCHAR(20) NOT NULL
        CHECK (account_type IN ('asset', 'liability', 'equity', 'revenue', 'expense')),
    subtype VARCHAR(50),
    parent_code VARCHAR(50),
    description TEXT,
    opening_balance NUMERIC(19, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (organization_id, code)
);

CREATE UNIQUE INDEX idx_coa_path ON chart_of_accounts(organization_id, lower(path));
CREATE INDEX idx_coa_parent ON chart_of_accounts(organization_id, parent_code);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    memo TEXT NOT NULL CHECK (length(trim(memo)) > 0),
    datetime TIMESTAMPTZ NOT NULL,
    voided BOOLEAN NOT NULL DEFAULT false,
    void_reason TEXT,
    voided_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journal_org_date ON journal_entries(organization_id, datetime);
";

const TRANSACTION_LINES_SQL: &str = r"
CREATE TABLE transaction_lines (
    id UUID PRIMARY KEY,
    journal_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL,
    position INTEGER NOT NULL,
    accounts TEXT NOT NULL CHECK (length(trim(accounts)) > 0),
    debit BOOLEAN NOT NULL,
    credit BOOLEAN NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    datetime TIMESTAMPTZ NOT NULL,
    meta JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK (debit <> credit),
    UNIQUE (journal_id, position)
);

CREATE INDEX idx_lines_org_accounts ON transaction_lines(organization_id, accounts);
CREATE INDEX idx_lines_org_lower_accounts ON transaction_lines(organization_id, lower(accounts));
CREATE INDEX idx_lines_org_datetime ON transaction_lines(organization_id, datetime);
CREATE INDEX idx_lines_meta ON transaction_lines USING GIN (meta);
";

const COUNTERPARTIES_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_customers_name ON customers(organization_id, lower(name));

CREATE TABLE suppliers (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_suppliers_name ON suppliers(organization_id, lower(name));
";

const INVENTORY_SQL: &str = r"
CREATE TABLE items (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    opening_stock NUMERIC(19, 4) NOT NULL DEFAULT 0,
    unit VARCHAR(30),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (organization_id, name)
);

CREATE TABLE stock_entries (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    item_id UUID NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    warehouse_id UUID,
    date TIMESTAMPTZ NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL CHECK (quantity <> 0),
    transaction_type VARCHAR(30),
    reference_id TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_stock_item_date ON stock_entries(organization_id, item_id, date);
";

const VOUCHERS_SQL: &str = r"
CREATE TABLE vouchers (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    voucher_type VARCHAR(30) NOT NULL,
    voucher_no VARCHAR(100),
    reference_no VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_vouchers_type ON vouchers(organization_id, voucher_type);
";

const IMMUTABILITY_TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION prevent_line_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Transaction lines are immutable. Void the journal entry instead.';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_line_update
    BEFORE UPDATE ON transaction_lines
    FOR EACH ROW EXECUTE FUNCTION prevent_line_modification();

CREATE OR REPLACE FUNCTION prevent_unvoid()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.voided AND NOT NEW.voided THEN
        RAISE EXCEPTION 'Cannot restore a voided journal entry.';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_unvoid
    BEFORE UPDATE ON journal_entries
    FOR EACH ROW EXECUTE FUNCTION prevent_unvoid();
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TRIGGER IF EXISTS trg_prevent_unvoid ON journal_entries;
DROP TRIGGER IF EXISTS trg_prevent_line_update ON transaction_lines;
DROP FUNCTION IF EXISTS prevent_unvoid();
DROP FUNCTION IF EXISTS prevent_line_modification();

DROP TABLE IF EXISTS vouchers;
DROP TABLE IF EXISTS stock_entries;
DROP TABLE IF EXISTS items;
DROP TABLE IF EXISTS suppliers;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS transaction_lines;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS chart_of_accounts;
";
