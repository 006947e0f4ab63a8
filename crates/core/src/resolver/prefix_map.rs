//! Informal category names and the canonical prefixes they were posted under.

use crate::counterparty::CounterpartyKind;

/// What a mapped category means for candidate generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Supplier sub-ledgers.
    Payable,
    /// Customer sub-ledgers.
    Receivable,
    /// Cash.
    Cash,
    /// Cash in hand.
    CashInHand,
    /// Sales and other income.
    Revenue,
}

impl CategoryKind {
    /// Whether leaf accounts under this category are posted as `{prefix}:{leaf}`.
    #[must_use]
    pub const fn is_leaf_scoped(self) -> bool {
        matches!(self, Self::Payable | Self::Receivable | Self::Cash | Self::CashInHand)
    }

    /// Directory whose records name the leaves of this category.
    #[must_use]
    pub const fn counterparty(self) -> Option<CounterpartyKind> {
        match self {
            Self::Payable => Some(CounterpartyKind::Supplier),
            Self::Receivable => Some(CounterpartyKind::Customer),
            _ => None,
        }
    }
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMapping {
    /// Informal name, matched case-insensitively.
    pub name: &'static str,
    /// Canonical prefix.
    pub prefix: &'static str,
    /// Category semantics.
    pub kind: CategoryKind,
}

const MAPPINGS: &[PrefixMapping] = &[
    PrefixMapping {
        name: "Accounts Payable",
        prefix: "Liabilities:Accounts Payable",
        kind: CategoryKind::Payable,
    },
    PrefixMapping {
        name: "Sundry Creditors",
        prefix: "Liabilities:Accounts Payable",
        kind: CategoryKind::Payable,
    },
    PrefixMapping {
        name: "Accounts Receivable",
        prefix: "Assets:Accounts Receivable",
        kind: CategoryKind::Receivable,
    },
    PrefixMapping {
        name: "Sundry Debtors",
        prefix: "Assets:Accounts Receivable",
        kind: CategoryKind::Receivable,
    },
    PrefixMapping {
        name: "Cash",
        prefix: "Assets:Cash",
        kind: CategoryKind::Cash,
    },
    PrefixMapping {
        name: "Cash in Hand",
        prefix: "Assets:Cash in Hand",
        kind: CategoryKind::CashInHand,
    },
    PrefixMapping {
        name: "Cash-in-Hand",
        prefix: "Assets:Cash in Hand",
        kind: CategoryKind::CashInHand,
    },
    PrefixMapping {
        name: "Sales",
        prefix: "Income:Sales Revenue",
        kind: CategoryKind::Revenue,
    },
    PrefixMapping {
        name: "Sales Revenue",
        prefix: "Income:Sales Revenue",
        kind: CategoryKind::Revenue,
    },
    PrefixMapping {
        name: "Revenue",
        prefix: "Income:Sales Revenue",
        kind: CategoryKind::Revenue,
    },
    PrefixMapping {
        name: "Income",
        prefix: "Income:Sales Revenue",
        kind: CategoryKind::Revenue,
    },
];

/// Looks up a single path segment, ignoring case and surrounding whitespace.
#[must_use]
pub fn lookup(segment: &str) -> Option<&'static PrefixMapping> {
    let wanted = segment.trim();
    MAPPINGS.iter().find(|m| m.name.eq_ignore_ascii_case(wanted))
}

/// The full mapping table.
#[must_use]
pub fn mappings() -> &'static [PrefixMapping] {
    MAPPINGS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Accounts Payable", "Liabilities:Accounts Payable")]
    #[case("accounts payable", "Liabilities:Accounts Payable")]
    #[case("SUNDRY DEBTORS", "Assets:Accounts Receivable")]
    #[case("Cash", "Assets:Cash")]
    #[case(" cash in hand ", "Assets:Cash in Hand")]
    #[case("Sales", "Income:Sales Revenue")]
    #[case("revenue", "Income:Sales Revenue")]
    #[case("Income", "Income:Sales Revenue")]
    fn test_lookup(#[case] segment: &str, #[case] prefix: &str) {
        assert_eq!(lookup(segment).map(|m| m.prefix), Some(prefix));
    }

    #[test]
    fn test_unmapped_segment() {
        assert!(lookup("Expenses").is_none());
        assert!(lookup("Liabilities").is_none());
    }

    #[test]
    fn test_counterparty_kinds() {
        assert_eq!(CategoryKind::Payable.counterparty(), Some(CounterpartyKind::Supplier));
        assert_eq!(CategoryKind::Receivable.counterparty(), Some(CounterpartyKind::Customer));
        assert_eq!(CategoryKind::Cash.counterparty(), None);
        assert!(!CategoryKind::Revenue.is_leaf_scoped());
    }
}
