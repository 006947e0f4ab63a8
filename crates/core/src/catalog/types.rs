//! Chart of accounts domain types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::{AccountId, OrganizationId};

use super::error::CatalogError;
use super::path;

/// Top-level classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Lowercase name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(CatalogError::InvalidAccountType(s.to_string())),
        }
    }
}

/// Detailed classification; each subtype belongs to exactly one [`AccountType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum AccountSubtype {
    // Asset
    Cash,
    Bank,
    AccountsReceivable,
    Inventory,
    Prepaid,
    FixedAsset,
    AccumulatedDepreciation,
    OtherAsset,
    // Liability
    AccountsPayable,
    CreditCard,
    AccruedLiability,
    ShortTermDebt,
    LongTermDebt,
    OtherLiability,
    // Equity
    OwnerEquity,
    RetainedEarnings,
    CommonStock,
    OtherEquity,
    // Revenue
    OperatingRevenue,
    OtherRevenue,
    // Expense
    CostOfGoodsSold,
    OperatingExpense,
    PayrollExpense,
    DepreciationExpense,
    InterestExpense,
    TaxExpense,
    OtherExpense,
}

impl AccountSubtype {
    /// Every subtype.
    pub const ALL: [Self; 27] = [
        Self::Cash,
        Self::Bank,
        Self::AccountsReceivable,
        Self::Inventory,
        Self::Prepaid,
        Self::FixedAsset,
        Self::AccumulatedDepreciation,
        Self::OtherAsset,
        Self::AccountsPayable,
        Self::CreditCard,
        Self::AccruedLiability,
        Self::ShortTermDebt,
        Self::LongTermDebt,
        Self::OtherLiability,
        Self::OwnerEquity,
        Self::RetainedEarnings,
        Self::CommonStock,
        Self::OtherEquity,
        Self::OperatingRevenue,
        Self::OtherRevenue,
        Self::CostOfGoodsSold,
        Self::OperatingExpense,
        Self::PayrollExpense,
        Self::DepreciationExpense,
        Self::InterestExpense,
        Self::TaxExpense,
        Self::OtherExpense,
    ];

    /// The account type this subtype belongs to.
    #[must_use]
    pub const fn account_type(self) -> AccountType {
        match self {
            Self::Cash
            | Self::Bank
            | Self::AccountsReceivable
            | Self::Inventory
            | Self::Prepaid
            | Self::FixedAsset
            | Self::AccumulatedDepreciation
            | Self::OtherAsset => AccountType::Asset,
            Self::AccountsPayable
            | Self::CreditCard
            | Self::AccruedLiability
            | Self::ShortTermDebt
            | Self::LongTermDebt
            | Self::OtherLiability => AccountType::Liability,
            Self::OwnerEquity | Self::RetainedEarnings | Self::CommonStock | Self::OtherEquity => {
                AccountType::Equity
            }
            Self::OperatingRevenue | Self::OtherRevenue => AccountType::Revenue,
            Self::CostOfGoodsSold
            | Self::OperatingExpense
            | Self::PayrollExpense
            | Self::DepreciationExpense
            | Self::InterestExpense
            | Self::TaxExpense
            | Self::OtherExpense => AccountType::Expense,
        }
    }

    /// Whether this subtype is allowed for `account_type`.
    #[must_use]
    pub fn belongs_to(self, account_type: AccountType) -> bool {
        self.account_type() == account_type
    }

    /// Subtypes allowed for an account type.
    pub fn for_type(account_type: AccountType) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |s| s.belongs_to(account_type))
    }

    /// Snake-case name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
            Self::AccountsReceivable => "accounts_receivable",
            Self::Inventory => "inventory",
            Self::Prepaid => "prepaid",
            Self::FixedAsset => "fixed_asset",
            Self::AccumulatedDepreciation => "accumulated_depreciation",
            Self::OtherAsset => "other_asset",
            Self::AccountsPayable => "accounts_payable",
            Self::CreditCard => "credit_card",
            Self::AccruedLiability => "accrued_liability",
            Self::ShortTermDebt => "short_term_debt",
            Self::LongTermDebt => "long_term_debt",
            Self::OtherLiability => "other_liability",
            Self::OwnerEquity => "owner_equity",
            Self::RetainedEarnings => "retained_earnings",
            Self::CommonStock => "common_stock",
            Self::OtherEquity => "other_equity",
            Self::OperatingRevenue => "operating_revenue",
            Self::OtherRevenue => "other_revenue",
            Self::CostOfGoodsSold => "cost_of_goods_sold",
            Self::OperatingExpense => "operating_expense",
            Self::PayrollExpense => "payroll_expense",
            Self::DepreciationExpense => "depreciation_expense",
            Self::InterestExpense => "interest_expense",
            Self::TaxExpense => "tax_expense",
            Self::OtherExpense => "other_expense",
        }
    }
}

impl std::fmt::Display for AccountSubtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountSubtype {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|subtype| subtype.as_str() == wanted)
            .ok_or_else(|| CatalogError::UnknownSubtype(s.to_string()))
    }
}

/// A chart of accounts node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Human code, immutable after creation.
    pub code: String,
    /// Display name; also the last path segment.
    pub name: String,
    /// Colon-delimited position in the hierarchy.
    pub path: String,
    /// Classification.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Detailed classification.
    pub subtype: Option<AccountSubtype>,
    /// Parent account code; `None` for roots.
    pub parent_code: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Balance carried in from before the ledger started.
    pub opening_balance: Option<Decimal>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Path segments, top-level first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        path::segments(&self.path)
    }

    /// Last path segment.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        path::leaf(&self.path)
    }

    /// Whether this account is a root of the hierarchy.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_code.is_none()
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Unique code.
    pub code: String,
    /// Display name (single path segment).
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Detailed classification.
    pub subtype: Option<AccountSubtype>,
    /// Parent code, or `None` for a top-level account.
    pub parent_code: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Stored opening balance.
    pub opening_balance: Option<Decimal>,
}

/// Partial update of an account. `None` leaves a field untouched.
///
/// Code and parent are not editable.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name; recomputes the path.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New type; requires `subtype` to be set as well when the account has one.
    pub account_type: Option<AccountType>,
    /// New subtype; `Some(None)` clears it.
    pub subtype: Option<Option<AccountSubtype>>,
    /// New opening balance; `Some(None)` clears it.
    pub opening_balance: Option<Option<Decimal>>,
}

impl UpdateAccountInput {
    /// Whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.account_type.is_none()
            && self.subtype.is_none()
            && self.opening_balance.is_none()
    }
}
