//! Voucher reference lookup for ledger rows.
//!
//! A ledger row shows a human-facing reference. The first non-empty of these wins:
//! `meta.voucherNumber`, the voucher document named by `meta.voucherType` +
//! `meta.voucherId`, and finally the journal entry id.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use khata_shared::types::{OrganizationId, VoucherId};

use crate::ledger::TransactionLine;
use crate::resolver::Degradation;
use crate::store::{StoreError, VoucherSource};

/// Business documents that can back a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    /// Sales invoice.
    SalesInvoice,
    /// Purchase invoice / bill.
    PurchaseInvoice,
    /// Goods returned by a customer.
    SalesReturn,
    /// Goods returned to a supplier.
    PurchaseReturn,
    /// Money received.
    PaymentIn,
    /// Money paid out.
    PaymentOut,
    /// Manual journal voucher.
    JournalVoucher,
    /// Expense voucher.
    Expense,
}

impl VoucherKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::SalesInvoice,
        Self::PurchaseInvoice,
        Self::SalesReturn,
        Self::PurchaseReturn,
        Self::PaymentIn,
        Self::PaymentOut,
        Self::JournalVoucher,
        Self::Expense,
    ];

    /// Snake-case name used for storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalesInvoice => "sales_invoice",
            Self::PurchaseInvoice => "purchase_invoice",
            Self::SalesReturn => "sales_return",
            Self::PurchaseReturn => "purchase_return",
            Self::PaymentIn => "payment_in",
            Self::PaymentOut => "payment_out",
            Self::JournalVoucher => "journal_voucher",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for VoucherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a voucher type string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown voucher type: {0}")]
pub struct UnknownVoucherType(pub String);

impl FromStr for VoucherKind {
    type Err = UnknownVoucherType;

    /// Accepts `sales_invoice`, `SalesInvoice`, `sales-invoice` and `Sales Invoice` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().replace('_', "") == normalized)
            .ok_or_else(|| UnknownVoucherType(s.to_string()))
    }
}

/// Numbers printed on a voucher document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherNumbers {
    /// Sequential voucher number.
    pub voucher_no: Option<String>,
    /// External reference, e.g. the supplier's bill number.
    pub reference_no: Option<String>,
}

impl VoucherNumbers {
    /// Voucher number if set, otherwise the reference number.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        [&self.voucher_no, &self.reference_no]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .map(str::trim)
            .find(|n| !n.is_empty())
    }
}

/// Reference text for a ledger row and any degradation hit while finding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReference {
    /// Text shown in the reference column.
    pub text: String,
    /// Set when a voucher was named but could not be used.
    pub degradation: Option<Degradation>,
}

/// Voucher sources keyed by kind, built once at start-up.
#[derive(Clone, Default)]
pub struct VoucherDirectory {
    sources: HashMap<VoucherKind, Arc<dyn VoucherSource>>,
}

impl std::fmt::Debug for VoucherDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.sources.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("VoucherDirectory").field("kinds", &kinds).finish()
    }
}

impl VoucherDirectory {
    /// An empty directory; every lookup yields `None`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the same source for every voucher kind.
    #[must_use]
    pub fn uniform(source: Arc<dyn VoucherSource>) -> Self {
        let mut directory = Self::new();
        for kind in VoucherKind::ALL {
            directory.register(kind, Arc::clone(&source));
        }
        directory
    }

    /// Registers a source for one kind, replacing any previous one.
    pub fn register(&mut self, kind: VoucherKind, source: Arc<dyn VoucherSource>) {
        self.sources.insert(kind, source);
    }

    /// Looks up a voucher by its type string and id string.
    ///
    /// Unknown types, kinds with no source and malformed ids all yield `Ok(None)`.
    pub async fn find(
        &self,
        voucher_type: &str,
        organization_id: OrganizationId,
        voucher_id: &str,
    ) -> Result<Option<VoucherNumbers>, StoreError> {
        let Ok(kind) = voucher_type.parse::<VoucherKind>() else {
            return Ok(None);
        };
        let Some(source) = self.sources.get(&kind) else {
            return Ok(None);
        };
        let Ok(id) = voucher_id.trim().parse::<VoucherId>() else {
            return Ok(None);
        };
        source.find_voucher(kind, organization_id, id).await
    }

    /// Resolves the display reference for a line.
    pub async fn reference_for(&self, line: &TransactionLine) -> LineReference {
        let fallback = line.journal_id.to_string();

        if let Some(number) = line.meta.voucher_number() {
            return LineReference {
                text: number,
                degradation: None,
            };
        }

        let (Some(voucher_type), Some(voucher_id)) = (line.meta.voucher_type(), line.meta.voucher_id())
        else {
            return LineReference {
                text: fallback,
                degradation: None,
            };
        };

        match self.find(&voucher_type, line.organization_id, &voucher_id).await {
            Ok(Some(numbers)) => match numbers.display() {
                Some(text) => LineReference {
                    text: text.to_string(),
                    degradation: None,
                },
                None => LineReference {
                    text: fallback,
                    degradation: Some(Degradation::VoucherUnresolved {
                        voucher_type,
                        voucher_id,
                    }),
                },
            },
            Ok(None) => LineReference {
                text: fallback,
                degradation: Some(Degradation::VoucherUnresolved {
                    voucher_type,
                    voucher_id,
                }),
            },
            Err(e) => LineReference {
                text: fallback,
                degradation: Some(Degradation::VoucherLookupFailed {
                    voucher_type,
                    voucher_id,
                    reason: e.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedVouchers, line_with_meta};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("sales_invoice", VoucherKind::SalesInvoice)]
    #[case("SalesInvoice", VoucherKind::SalesInvoice)]
    #[case("Purchase Invoice", VoucherKind::PurchaseInvoice)]
    #[case("payment-in", VoucherKind::PaymentIn)]
    #[case("JOURNAL_VOUCHER", VoucherKind::JournalVoucher)]
    fn test_voucher_kind_parse_is_lenient(#[case] input: &str, #[case] expected: VoucherKind) {
        assert_eq!(input.parse::<VoucherKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_voucher_kind() {
        assert!("CreditNoteThing".parse::<VoucherKind>().is_err());
    }

    #[test]
    fn test_voucher_numbers_display_prefers_voucher_no() {
        let numbers = VoucherNumbers {
            voucher_no: Some("SI-0001".into()),
            reference_no: Some("REF-9".into()),
        };
        assert_eq!(numbers.display(), Some("SI-0001"));

        let numbers = VoucherNumbers {
            voucher_no: Some("  ".into()),
            reference_no: Some("REF-9".into()),
        };
        assert_eq!(numbers.display(), Some("REF-9"));
        assert_eq!(VoucherNumbers::default().display(), None);
    }

    #[tokio::test]
    async fn test_reference_prefers_explicit_voucher_number() {
        let directory = VoucherDirectory::new();
        let line = line_with_meta(json!({ "voucherNumber": "PI-0042" }));
        let reference = directory.reference_for(&line).await;
        assert_eq!(reference.text, "PI-0042");
        assert!(reference.degradation.is_none());
    }

    #[tokio::test]
    async fn test_reference_looks_up_voucher_document() {
        let id = VoucherId::new();
        let source = FixedVouchers::with(id, "SI-0007");
        let directory = VoucherDirectory::uniform(Arc::new(source));
        let line = line_with_meta(json!({ "voucherType": "SalesInvoice", "voucherId": id.to_string() }));

        let reference = directory.reference_for(&line).await;
        assert_eq!(reference.text, "SI-0007");
    }

    #[tokio::test]
    async fn test_reference_unknown_type_falls_back_to_journal_id() {
        let directory = VoucherDirectory::uniform(Arc::new(FixedVouchers::default()));
        let line = line_with_meta(json!({ "voucherType": "Telegram", "voucherId": "abc" }));

        let reference = directory.reference_for(&line).await;
        assert_eq!(reference.text, line.journal_id.to_string());
        assert!(matches!(
            reference.degradation,
            Some(Degradation::VoucherUnresolved { .. })
        ));
    }

    #[tokio::test]
    async fn test_reference_store_failure_degrades() {
        let directory = VoucherDirectory::uniform(Arc::new(FixedVouchers::failing()));
        let line = line_with_meta(json!({
            "voucherType": "sales_invoice",
            "voucherId": VoucherId::new().to_string()
        }));

        let reference = directory.reference_for(&line).await;
        assert_eq!(reference.text, line.journal_id.to_string());
        assert!(matches!(
            reference.degradation,
            Some(Degradation::VoucherLookupFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_reference_without_meta_uses_journal_id() {
        let directory = VoucherDirectory::new();
        let line = line_with_meta(json!({}));
        let reference = directory.reference_for(&line).await;
        assert_eq!(reference.text, line.journal_id.to_string());
        assert!(reference.degradation.is_none());
    }
}
