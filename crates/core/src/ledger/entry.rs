//! Transaction line domain types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use khata_shared::types::{JournalEntryId, OrganizationId, TransactionLineId};

/// Side of a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit line (increases assets/expenses, decreases liabilities/equity/revenue).
    Debit,
    /// Credit line (decreases assets/expenses, increases liabilities/equity/revenue).
    Credit,
}

impl Side {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Builds a side from the persisted `debit`/`credit` flag pair.
    ///
    /// Returns `None` unless exactly one flag is set.
    #[must_use]
    pub const fn from_flags(debit: bool, credit: bool) -> Option<Self> {
        match (debit, credit) {
            (true, false) => Some(Self::Debit),
            (false, true) => Some(Self::Credit),
            _ => None,
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" | "dr" => Ok(Self::Debit),
            "credit" | "cr" => Ok(Self::Credit),
            other => Err(other.to_string()),
        }
    }
}

/// Well-known metadata keys.
pub mod meta_keys {
    /// Customer the line concerns.
    pub const CUSTOMER_ID: &str = "customerId";
    /// Supplier the line concerns.
    pub const SUPPLIER_ID: &str = "supplierId";
    /// Printed voucher number.
    pub const VOUCHER_NUMBER: &str = "voucherNumber";
    /// Invoice number.
    pub const INVOICE_NUMBER: &str = "invoiceNumber";
    /// Kind of voucher document backing the line.
    pub const VOUCHER_TYPE: &str = "voucherType";
    /// Id of the voucher document backing the line.
    pub const VOUCHER_ID: &str = "voucherId";
    /// Row description overriding the journal memo.
    pub const DESCRIPTION: &str = "description";
}

/// Free-form line metadata, stored as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineMeta(pub Map<String, Value>);

impl LineMeta {
    /// Empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds metadata from a JSON value; non-objects become empty metadata.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Sets a key, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Returns a value as trimmed text. Numbers are rendered; blanks read as absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.0.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// `voucherNumber`, falling back to `invoiceNumber`.
    #[must_use]
    pub fn voucher_number(&self) -> Option<String> {
        self.text(meta_keys::VOUCHER_NUMBER)
            .or_else(|| self.text(meta_keys::INVOICE_NUMBER))
    }

    /// `voucherType`.
    #[must_use]
    pub fn voucher_type(&self) -> Option<String> {
        self.text(meta_keys::VOUCHER_TYPE)
    }

    /// `voucherId`.
    #[must_use]
    pub fn voucher_id(&self) -> Option<String> {
        self.text(meta_keys::VOUCHER_ID)
    }

    /// `description`.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.text(meta_keys::DESCRIPTION)
    }

    /// Underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the metadata into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// A single debit or credit posted against a literal ledger path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    /// Line ID.
    pub id: TransactionLineId,
    /// Parent journal entry.
    pub journal_id: JournalEntryId,
    /// Tenant.
    pub organization_id: OrganizationId,
    /// Literal ledger path; may differ from the catalog path of the same account.
    pub accounts: String,
    /// Debit or credit.
    pub side: Side,
    /// Always positive.
    pub amount: Decimal,
    /// Posting time.
    pub datetime: DateTime<Utc>,
    /// Free-form metadata.
    pub meta: LineMeta,
    /// Parent journal memo, used as the default row description.
    pub memo: String,
    /// Insertion time, the secondary sort key.
    pub created_at: DateTime<Utc>,
}

impl TransactionLine {
    /// Debit amount, zero for credit lines.
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => Decimal::ZERO,
        }
    }

    /// Credit amount, zero for debit lines.
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.side {
            Side::Debit => Decimal::ZERO,
            Side::Credit => self.amount,
        }
    }

    /// Row description: `meta.description`, else the journal memo.
    #[must_use]
    pub fn description(&self) -> String {
        self.meta.description().unwrap_or_else(|| self.memo.clone())
    }
}
