//! Colon-delimited ledger path helpers.

/// Separator between path segments.
pub const SEPARATOR: char = ':';

/// Splits a path into trimmed, non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).map(str::trim).filter(|s| !s.is_empty())
}

/// Number of segments in a path.
#[must_use]
pub fn depth(path: &str) -> usize {
    segments(path).count()
}

/// Last segment, or `""` for an empty path.
#[must_use]
pub fn leaf(path: &str) -> &str {
    segments(path).last().unwrap_or("")
}

/// First segment, or `""` for an empty path.
#[must_use]
pub fn top_level(path: &str) -> &str {
    segments(path).next().unwrap_or("")
}

/// Everything before the last separator, or `None` for a root path.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// Builds a child path under `parent` (or a root path when `parent` is `None`).
#[must_use]
pub fn join(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}{SEPARATOR}{}", name.trim()),
        _ => name.trim().to_string(),
    }
}

/// Case-insensitive path equality, the rule used for collision checks.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Prefix shared by every descendant path of `path`.
#[must_use]
pub fn descendant_prefix(path: &str) -> String {
    format!("{path}{SEPARATOR}")
}

/// Whether `name` can be used as a single segment.
#[must_use]
pub fn is_valid_segment(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(SEPARATOR)
}
