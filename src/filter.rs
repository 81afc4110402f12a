//! Host-side query predicates over stored issues.
//!
//! These run before aggregation and are deliberately outside the
//! normalization engine: an inclusive date range on the resolution date and
//! exact matches on system, fix-version, and issue type. The engine itself
//! only ever partitions by lifecycle.

use chrono::NaiveDate;

use crate::mapper::CanonicalIssue;

#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub resolved_from: Option<NaiveDate>,
    pub resolved_to: Option<NaiveDate>,
    pub system: Option<String>,
    pub fix_version: Option<String>,
    pub issue_type: Option<String>,
}

impl IssueFilter {
    pub fn is_empty(&self) -> bool {
        self.resolved_from.is_none()
            && self.resolved_to.is_none()
            && self.system.is_none()
            && self.fix_version.is_none()
            && self.issue_type.is_none()
    }

    /// An issue with no resolution date fails any date-range bound.
    pub fn matches(&self, issue: &CanonicalIssue) -> bool {
        if self.resolved_from.is_some() || self.resolved_to.is_some() {
            let Some(resolved) = issue.resolved_date else {
                return false;
            };
            if self.resolved_from.is_some_and(|from| resolved < from) {
                return false;
            }
            if self.resolved_to.is_some_and(|to| resolved > to) {
                return false;
            }
        }
        exact_match(self.system.as_deref(), issue.system.as_deref())
            && exact_match(self.fix_version.as_deref(), issue.fix_version.as_deref())
            && exact_match(self.issue_type.as_deref(), issue.issue_type.as_deref())
    }

    pub fn apply(&self, issues: Vec<CanonicalIssue>) -> Vec<CanonicalIssue> {
        if self.is_empty() {
            return issues;
        }
        issues
            .into_iter()
            .filter(|issue| self.matches(issue))
            .collect()
    }
}

fn exact_match(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(expected) => actual == Some(expected),
    }
}
