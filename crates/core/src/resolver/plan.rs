//! Pure candidate planning for one account.

use crate::catalog::{Account, AccountType, path};
use crate::counterparty::CounterpartyKind;

use super::Degradation;
use super::candidate::{CandidateSet, PathCandidate};
use super::prefix_map::{self, CategoryKind};

/// Options that widen the candidate set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Also match every descendant path.
    pub include_sub_accounts: bool,
}

/// A counterparty lookup the async step must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterpartyRequest {
    /// Directory to search.
    pub kind: CounterpartyKind,
    /// Name to search for (the account's leaf).
    pub name: String,
    /// Generic control path the counterparty's lines were posted under.
    pub generic_path: String,
}

/// Candidates known without touching a store, plus any pending lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Candidates so far.
    pub candidates: CandidateSet,
    /// Degradations hit while planning.
    pub degraded: Vec<Degradation>,
    /// Counterparty lookup still to run.
    pub counterparty: Option<CounterpartyRequest>,
}

/// `s` as written, first-letter-capitalized, all-lower and all-upper.
#[must_use]
pub fn case_variants(s: &str) -> Vec<String> {
    let mut chars = s.chars();
    let capitalized = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    });

    let mut variants = Vec::with_capacity(4);
    for variant in [s.to_string(), capitalized, s.to_lowercase(), s.to_uppercase()] {
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

fn push_revenue_patterns(account_leaf: &str, plan: &mut ResolutionPlan) {
    let patterns = [
        format!("Income:.*{}", regex::escape(account_leaf)),
        ".*Sales.*Revenue.*".to_string(),
        ".*Sales.*".to_string(),
    ];
    for pattern in patterns {
        match PathCandidate::regex(&pattern) {
            Ok(candidate) => {
                plan.candidates.push(candidate);
            }
            Err(e) => plan.degraded.push(Degradation::InvalidPattern {
                pattern,
                reason: e.to_string(),
            }),
        }
    }
}

/// Builds the store-independent part of an account's candidate set.
///
/// 1. The canonical path (and its descendants when asked)
/// 2. For a leaf under a mapped category: `{canonical prefix}:{leaf}` and
///    `{informal name}:{leaf}` in every case variant
/// 3. For an account that is itself a mapped category: its flat legacy name
///    and the canonical prefix, in every case variant
/// 4. Broad regexes for revenue-like accounts
/// 5. A counterparty lookup request for payable/receivable leaves
#[must_use]
pub fn plan(account: &Account, options: ResolveOptions) -> ResolutionPlan {
    let mut plan = ResolutionPlan {
        candidates: CandidateSet::new(),
        degraded: Vec::new(),
        counterparty: None,
    };
    plan.candidates.push(PathCandidate::exact(account.path.clone()));
    if options.include_sub_accounts {
        plan.candidates
            .push(PathCandidate::prefix(path::descendant_prefix(&account.path)));
    }

    let segments: Vec<&str> = path::segments(&account.path).collect();
    let Some((&leaf, parents)) = segments.split_last() else {
        return plan;
    };

    // Deepest mapped ancestor wins.
    let category = parents
        .iter()
        .rev()
        .find_map(|segment| prefix_map::lookup(segment).map(|m| (*segment, m)));
    let own_mapping = prefix_map::lookup(leaf);
    let mut revenue_like = account.account_type == AccountType::Revenue;

    if let Some((segment, mapping)) = category {
        if mapping.kind.is_leaf_scoped() {
            for variant in case_variants(leaf) {
                plan.candidates
                    .push(PathCandidate::exact(format!("{}:{variant}", mapping.prefix)));
                plan.candidates
                    .push(PathCandidate::exact(format!("{segment}:{variant}")));
            }
        }
        if let Some(kind) = mapping.kind.counterparty() {
            plan.counterparty = Some(CounterpartyRequest {
                kind,
                name: leaf.to_string(),
                generic_path: mapping.prefix.to_string(),
            });
        }
        revenue_like |= mapping.kind == CategoryKind::Revenue;
    }

    if let Some(mapping) = own_mapping {
        for variant in case_variants(leaf).into_iter().chain(case_variants(mapping.prefix)) {
            plan.candidates.push(PathCandidate::exact(variant));
        }
        revenue_like |= mapping.kind == CategoryKind::Revenue;
    }

    if category.is_none() && own_mapping.is_none() && !parents.is_empty() {
        plan.degraded.push(Degradation::UnmappedCategory {
            segment: path::top_level(&account.path).to_string(),
        });
    }

    if revenue_like {
        push_revenue_patterns(leaf, &mut plan);
    }

    plan
}
