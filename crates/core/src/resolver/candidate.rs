//! Candidate ledger-path matchers and their interpreter.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::catalog::path;
use crate::counterparty::CounterpartyKind;
use crate::ledger::TransactionLine;

/// A case-insensitive, unanchored pattern over ledger paths.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// Compiles a pattern; matching ignores case.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Pattern text, as pushed down to a store.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern occurs anywhere in `path`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl Serialize for PathPattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// One way a transaction line can belong to a logical account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PathCandidate {
    /// Literal path, compared exactly.
    Exact {
        /// Path.
        path: String,
    },
    /// Paths starting with this text, compared exactly.
    Prefix {
        /// Prefix.
        prefix: String,
    },
    /// Case-insensitive substring pattern.
    Regex {
        /// Pattern.
        pattern: PathPattern,
    },
    /// Path equal (ignoring case) to `path` and `meta[field] == value`.
    MetaMatch {
        /// Generic path, e.g. `Liabilities:Accounts Payable`.
        path: String,
        /// Metadata field holding the counterparty id.
        field: CounterpartyKind,
        /// Counterparty id.
        value: String,
    },
}

impl PathCandidate {
    /// Exact candidate.
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact { path: path.into() }
    }

    /// Prefix candidate.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix {
            prefix: prefix.into(),
        }
    }

    /// Regex candidate.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex {
            pattern: PathPattern::new(pattern)?,
        })
    }

    /// Evaluates the candidate against one line.
    #[must_use]
    pub fn matches(&self, line: &TransactionLine) -> bool {
        match self {
            Self::Exact { path } => line.accounts == *path,
            Self::Prefix { prefix } => line.accounts.starts_with(prefix.as_str()),
            Self::Regex { pattern } => pattern.is_match(&line.accounts),
            Self::MetaMatch { path, field, value } => {
                path::eq_ignore_case(&line.accounts, path)
                    && line.meta.text(field.meta_key()).as_deref() == Some(value.as_str())
            }
        }
    }
}

/// Ordered, de-duplicated set of candidates forming one disjunctive filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateSet {
    candidates: Vec<PathCandidate>,
}

impl CandidateSet {
    /// Empty set; matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate unless an equal one is present. Returns whether it was added.
    pub fn push(&mut self, candidate: PathCandidate) -> bool {
        if self.candidates.contains(&candidate) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    /// Whether any candidate matches the line.
    #[must_use]
    pub fn matches(&self, line: &TransactionLine) -> bool {
        self.candidates.iter().any(|c| c.matches(line))
    }

    /// Candidates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PathCandidate> {
        self.candidates.iter()
    }

    /// Literal paths of the exact candidates.
    pub fn exact_paths(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().filter_map(|c| match c {
            PathCandidate::Exact { path } => Some(path.as_str()),
            _ => None,
        })
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a PathCandidate;
    type IntoIter = std::slice::Iter<'a, PathCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Side;
    use crate::testing::{line_at, ymd};
    use rust_decimal_macros::dec;

    fn line(path: &str) -> TransactionLine {
        line_at(path, Side::Debit, dec!(1), ymd(2024, 1, 1))
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let c = PathCandidate::exact("Assets:Cash");
        assert!(c.matches(&line("Assets:Cash")));
        assert!(!c.matches(&line("assets:cash")));
    }

    #[test]
    fn test_prefix() {
        let c = PathCandidate::prefix("Assets:Current Assets:");
        assert!(c.matches(&line("Assets:Current Assets:Cash")));
        assert!(!c.matches(&line("Assets:Current Assets")));
    }

    #[test]
    fn test_regex_is_unanchored_and_case_insensitive() {
        let c = PathCandidate::regex(".*Sales.*Revenue.*").unwrap();
        assert!(c.matches(&line("Income:SALES revenue")));
        assert!(!c.matches(&line("Income:Consulting")));
        let c = PathCandidate::regex("Income:.*Widgets").unwrap();
        assert!(c.matches(&line("Legacy:income:Product widgets")));
    }

    #[test]
    fn test_meta_match_requires_path_and_meta() {
        let c = PathCandidate::MetaMatch {
            path: "Liabilities:Accounts Payable".into(),
            field: CounterpartyKind::Supplier,
            value: "sup-1".into(),
        };
        let mut tagged = line("liabilities:accounts payable");
        tagged.meta = tagged.meta.with("supplierId", "sup-1");
        assert!(c.matches(&tagged));

        let mut other_supplier = line("Liabilities:Accounts Payable");
        other_supplier.meta = other_supplier.meta.with("supplierId", "sup-2");
        assert!(!c.matches(&other_supplier));

        let mut wrong_path = line("Liabilities:Loans");
        wrong_path.meta = wrong_path.meta.with("supplierId", "sup-1");
        assert!(!c.matches(&wrong_path));
    }

    #[test]
    fn test_set_deduplicates_and_keeps_order() {
        let mut set = CandidateSet::new();
        assert!(set.push(PathCandidate::exact("A")));
        assert!(set.push(PathCandidate::exact("B")));
        assert!(!set.push(PathCandidate::exact("A")));
        assert_eq!(set.exact_paths().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        assert!(!CandidateSet::new().matches(&line("Assets:Cash")));
    }
}
