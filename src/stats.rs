//! Per-release aggregation for the `stats` command.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mapper::CanonicalIssue;

/// Bucket label for issues carrying no fix-version.
pub const UNVERSIONED: &str = "(none)";

#[derive(Debug, Default, Serialize)]
pub struct ReleaseStats {
    pub release: String,
    pub issues: usize,
    pub resolved: usize,
    pub mean_lead_time_days: Option<f64>,
}

/// Groups issues by fix-version and summarizes counts and lead time. The
/// mean only covers issues that have a lead time, i.e. resolved ones with
/// a parsable creation date.
pub fn release_stats(issues: &[CanonicalIssue]) -> Vec<ReleaseStats> {
    let mut buckets: BTreeMap<String, (usize, usize, i64, usize)> = BTreeMap::new();
    for issue in issues {
        let release = issue
            .fix_version
            .clone()
            .unwrap_or_else(|| UNVERSIONED.to_string());
        let entry = buckets.entry(release).or_default();
        entry.0 += 1;
        if issue.resolved_date.is_some() {
            entry.1 += 1;
        }
        if let Some(days) = issue.lead_time_days {
            entry.2 += days;
            entry.3 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(release, (issues, resolved, total_days, samples))| ReleaseStats {
            release,
            issues,
            resolved,
            mean_lead_time_days: (samples > 0)
                .then(|| total_days as f64 / samples as f64),
        })
        .collect()
}
