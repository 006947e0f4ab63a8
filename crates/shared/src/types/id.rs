//! Typed IDs for ledger entities.
//!
//! Every id is a UUID v7, so ids minted later sort later. Ledger rows use the
//! line id as the last tie-breaker after posting and insertion time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mints a time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            /// Parses a hyphenated or simple UUID; surrounding whitespace is ignored.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

typed_id!(OrganizationId, "Unique identifier for an organization (tenant).");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(
    TransactionLineId,
    "Unique identifier for a single debit or credit line of a journal entry."
);
typed_id!(CounterpartyId, "Unique identifier for a customer or supplier.");
typed_id!(ItemId, "Unique identifier for an inventory item.");
typed_id!(StockEntryId, "Unique identifier for a stock movement record.");
typed_id!(WarehouseId, "Unique identifier for a warehouse.");
typed_id!(VoucherId, "Unique identifier for a sales/purchase/payment voucher.");
