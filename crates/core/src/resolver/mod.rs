//! Path resolution: which ledger paths belong to a logical account.
//!
//! Ledger lines store a literal path string. Over time the same account was
//! posted under flat names (`Cash`), canonical names (`Assets:Cash`), nested
//! names (`Assets:Current Assets:Cash`) and case variants. Resolution turns a
//! catalog [`Account`] into a [`CandidateSet`] covering all of them.
//!
//! Planning is pure ([`plan::plan`]); [`PathResolver::resolve`] adds the
//! counterparty lookup. Lookup failures never abort a read: they are returned
//! as [`Degradation`]s and logged.

pub mod candidate;
pub mod plan;
pub mod prefix_map;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::catalog::Account;
use crate::counterparty::CounterpartyKind;
use crate::store::CounterpartyDirectory;

pub use candidate::{CandidateSet, PathCandidate, PathPattern};
pub use plan::{ResolutionPlan, ResolveOptions, case_variants, plan};

/// Best-effort step that did not contribute candidates or a reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Degradation {
    /// No segment of the path is in the prefix map.
    #[error("No prefix mapping for category '{segment}'")]
    UnmappedCategory {
        /// Top-level segment.
        segment: String,
    },

    /// No customer/supplier with the leaf's name.
    #[error("No {kind} named '{name}'")]
    CounterpartyNotFound {
        /// Directory searched.
        kind: CounterpartyKind,
        /// Name searched.
        name: String,
    },

    /// Customer/supplier directory failed.
    #[error("{kind} lookup for '{name}' failed: {reason}")]
    CounterpartyLookupFailed {
        /// Directory searched.
        kind: CounterpartyKind,
        /// Name searched.
        name: String,
        /// Store error text.
        reason: String,
    },

    /// A generated pattern did not compile.
    #[error("Pattern '{pattern}' is invalid: {reason}")]
    InvalidPattern {
        /// Pattern text.
        pattern: String,
        /// Compiler error text.
        reason: String,
    },

    /// Voucher type unknown, id malformed, or voucher missing.
    #[error("Voucher {voucher_type}/{voucher_id} not found")]
    VoucherUnresolved {
        /// `meta.voucherType`.
        voucher_type: String,
        /// `meta.voucherId`.
        voucher_id: String,
    },

    /// Voucher source failed.
    #[error("Voucher {voucher_type}/{voucher_id} lookup failed: {reason}")]
    VoucherLookupFailed {
        /// `meta.voucherType`.
        voucher_type: String,
        /// `meta.voucherId`.
        voucher_id: String,
        /// Store error text.
        reason: String,
    },
}

impl Degradation {
    /// Whether the degradation comes from a failing collaborator rather than missing data.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::CounterpartyLookupFailed { .. } | Self::VoucherLookupFailed { .. } | Self::InvalidPattern { .. }
        )
    }
}

/// Candidate set for an account plus what could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Disjunctive path filter.
    pub candidates: CandidateSet,
    /// Best-effort steps that fell through.
    pub degraded: Vec<Degradation>,
}

/// Resolves accounts to candidate sets.
#[derive(Clone)]
pub struct PathResolver {
    counterparties: Arc<dyn CounterpartyDirectory>,
}

impl PathResolver {
    /// Creates a resolver backed by a counterparty directory.
    #[must_use]
    pub fn new(counterparties: Arc<dyn CounterpartyDirectory>) -> Self {
        Self { counterparties }
    }

    /// Builds the full candidate set, including counterparty metadata matches.
    #[instrument(skip(self, account), fields(account_id = %account.id, path = %account.path))]
    pub async fn resolve(&self, account: &Account, options: ResolveOptions) -> Resolution {
        let ResolutionPlan {
            mut candidates,
            mut degraded,
            counterparty,
        } = plan(account, options);

        if let Some(request) = counterparty {
            match self
                .counterparties
                .find_by_name(request.kind, account.organization_id, &request.name)
                .await
            {
                Ok(Some(entity)) => {
                    candidates.push(PathCandidate::MetaMatch {
                        path: request.generic_path,
                        field: request.kind,
                        value: entity.id.to_string(),
                    });
                }
                Ok(None) => degraded.push(Degradation::CounterpartyNotFound {
                    kind: request.kind,
                    name: request.name,
                }),
                Err(e) => degraded.push(Degradation::CounterpartyLookupFailed {
                    kind: request.kind,
                    name: request.name,
                    reason: e.to_string(),
                }),
            }
        }

        for degradation in &degraded {
            match degradation {
                Degradation::UnmappedCategory { .. } => debug!(%degradation, "Resolution degraded"),
                _ => warn!(%degradation, "Resolution degraded"),
            }
        }
        debug!(candidates = candidates.len(), "Resolved candidate set");

        Resolution {
            candidates,
            degraded,
        }
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AccountType;
    use crate::counterparty::Counterparty;
    use crate::ledger::Side;
    use crate::store::memory::MemoryStore;
    use crate::store::{CounterpartyDirectory, StoreError};
    use crate::testing::{FailingCounterparties, account, line_at, ymd};
    use async_trait::async_trait;
    use khata_shared::types::{CounterpartyId, OrganizationId};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_payable_resolves_supplier_meta_match() {
        let store = Arc::new(MemoryStore::new());
        let acc = account("Liabilities:Accounts Payable:Acme", AccountType::Liability);
        let supplier = Counterparty {
            id: CounterpartyId::new(),
            organization_id: acc.organization_id,
            kind: CounterpartyKind::Supplier,
            name: "Acme".into(),
        };
        store.insert_counterparty(supplier.clone()).await.unwrap();

        let resolution = PathResolver::new(store).resolve(&acc, ResolveOptions::default()).await;
        assert!(resolution.degraded.is_empty());

        let mut generic = line_at("Liabilities:Accounts Payable", Side::Credit, dec!(10), ymd(2024, 1, 1));
        generic.meta = generic.meta.with("supplierId", supplier.id.to_string());
        assert!(resolution.candidates.matches(&generic));

        let upper = line_at("Liabilities:Accounts Payable:ACME", Side::Credit, dec!(10), ymd(2024, 1, 1));
        assert!(resolution.candidates.matches(&upper));

        let other = line_at("Liabilities:Accounts Payable:Initech", Side::Credit, dec!(10), ymd(2024, 1, 1));
        assert!(!resolution.candidates.matches(&other));
    }

    #[tokio::test]
    async fn test_missing_counterparty_degrades() {
        let store = Arc::new(MemoryStore::new());
        let acc = account("Assets:Accounts Receivable:Globex", AccountType::Asset);
        let resolution = PathResolver::new(store).resolve(&acc, ResolveOptions::default()).await;

        assert_eq!(
            resolution.degraded,
            vec![Degradation::CounterpartyNotFound {
                kind: CounterpartyKind::Customer,
                name: "Globex".into()
            }]
        );
        assert!(resolution
            .candidates
            .exact_paths()
            .any(|p| p == "Assets:Accounts Receivable:GLOBEX"));
    }

    #[tokio::test]
    async fn test_failing_directory_degrades_to_path_candidates() {
        let acc = account("Liabilities:Accounts Payable:Acme", AccountType::Liability);
        let resolution = PathResolver::new(Arc::new(FailingCounterparties))
            .resolve(&acc, ResolveOptions::default())
            .await;

        assert!(matches!(
            resolution.degraded.as_slice(),
            [Degradation::CounterpartyLookupFailed { .. }]
        ));
        assert!(resolution.degraded[0].is_failure());
        assert!(!resolution.candidates.is_empty());
        assert!(!resolution
            .candidates
            .iter()
            .any(|c| matches!(c, PathCandidate::MetaMatch { .. })));
    }

    struct NamedOnly(OrganizationId);

    #[async_trait]
    impl CounterpartyDirectory for NamedOnly {
        async fn find_by_name(
            &self,
            kind: CounterpartyKind,
            organization_id: OrganizationId,
            name: &str,
        ) -> Result<Option<Counterparty>, StoreError> {
            Ok((organization_id == self.0).then(|| Counterparty {
                id: CounterpartyId::new(),
                organization_id,
                kind,
                name: name.to_string(),
            }))
        }

        async fn insert_counterparty(&self, counterparty: Counterparty) -> Result<Counterparty, StoreError> {
            Ok(counterparty)
        }
    }

    #[tokio::test]
    async fn test_counterparty_lookup_is_scoped_to_organization() {
        let acc = account("Liabilities:Accounts Payable:Acme", AccountType::Liability);
        let resolver = PathResolver::new(Arc::new(NamedOnly(OrganizationId::new())));
        let resolution = resolver.resolve(&acc, ResolveOptions::default()).await;
        assert!(matches!(
            resolution.degraded.as_slice(),
            [Degradation::CounterpartyNotFound { .. }]
        ));
    }
}
