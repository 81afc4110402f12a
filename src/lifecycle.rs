//! Release lifecycle classification: open vs closed.
//!
//! A release is open iff its stored description is absent or blank after
//! trimming; anything else, even a lone "-", closes it. Every KPI in the
//! dashboards depends on which releases count as done, so this rule lives
//! here and nowhere else. Callers wanting the closed set derive it as the
//! set-difference against their full name set instead of re-deriving the
//! blank-description rule.

use std::collections::{BTreeMap, BTreeSet};

use crate::mapper::CanonicalIssue;

/// Stored release metadata: name to optional description.
pub type ReleaseLookup = BTreeMap<String, Option<String>>;

/// True iff the release has no recorded description: unknown to the store,
/// stored without one, or stored with a blank one.
pub fn is_open(name: &str, lookup: &ReleaseLookup) -> bool {
    match lookup.get(name) {
        None | Some(None) => true,
        Some(Some(description)) => description.trim().is_empty(),
    }
}

/// Partitions `names` and returns the open subset. Closed is the caller's
/// set-difference.
pub fn classify<'a, I>(names: I, lookup: &ReleaseLookup) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| is_open(name, lookup))
        .map(str::to_string)
        .collect()
}

/// Drops issues attributed to an open release. Issues with no fix-version
/// are kept: they belong to no release, open or otherwise.
pub fn filter_to_closed_only(
    issues: Vec<CanonicalIssue>,
    open_names: &BTreeSet<String>,
) -> Vec<CanonicalIssue> {
    issues
        .into_iter()
        .filter(|issue| {
            issue
                .fix_version
                .as_deref()
                .is_none_or(|version| !open_names.contains(version))
        })
        .collect()
}
