//! Customer and supplier directory types.

use serde::{Deserialize, Serialize};

use khata_shared::types::{CounterpartyId, OrganizationId};

/// Which directory a counterparty lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyKind {
    /// Owes us money; referenced from receivable lines.
    Customer,
    /// We owe them money; referenced from payable lines.
    Supplier,
}

impl CounterpartyKind {
    /// Line metadata key that carries this counterparty's id.
    #[must_use]
    pub const fn meta_key(self) -> &'static str {
        match self {
            Self::Customer => "customerId",
            Self::Supplier => "supplierId",
        }
    }

    /// Returns the lowercase name used in storage and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

impl std::fmt::Display for CounterpartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer or supplier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Counterparty ID.
    pub id: CounterpartyId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Customer or supplier.
    pub kind: CounterpartyKind,
    /// Display name, matched against the leaf of an account path.
    pub name: String,
}
