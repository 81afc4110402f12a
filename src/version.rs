//! Best-effort ordering of release version strings.
//!
//! Versions are compared by the runs of digits they contain ("Release
//! 2.10.0" becomes `[2, 10, 0]`), element by element, with missing trailing
//! components treated as zero. This is deliberately not a semantic-version
//! parser: alpha/beta/rc suffixes compare by whatever digits they happen to
//! carry, and a string with no digits at all sorts as `[0]`, i.e. lowest.

use std::cmp::Ordering;

/// Ordered digit runs of a version string. No digits yields `[0]`.
pub fn version_components(version: &str) -> Vec<u64> {
    let mut components = Vec::new();
    let mut current: Option<u64> = None;
    for ch in version.chars() {
        match ch.to_digit(10) {
            Some(digit) => {
                let acc = current.unwrap_or(0);
                current = Some(acc.saturating_mul(10).saturating_add(u64::from(digit)));
            }
            None => {
                if let Some(value) = current.take() {
                    components.push(value);
                }
            }
        }
    }
    if let Some(value) = current {
        components.push(value);
    }
    if components.is_empty() {
        components.push(0);
    }
    components
}

/// Numeric, component-wise comparison; first difference decides.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = version_components(a);
    let right = version_components(b);
    let len = left.len().max(right.len());
    for idx in 0..len {
        let lhs = left.get(idx).copied().unwrap_or(0);
        let rhs = right.get(idx).copied().unwrap_or(0);
        match lhs.cmp(&rhs) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }
    Ordering::Equal
}

/// The highest-sorting version among `versions`; ties keep the first one
/// encountered. An export may list several fix-versions for one issue and
/// analytics attribute the issue to the latest of them.
pub fn highest_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) => {
            if compare_versions(candidate, current) == Ordering::Greater {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    })
}
