//! Maps raw export rows onto canonical issue records.
//!
//! A row without an issue key is structurally broken and is dropped with an
//! error naming the row; every other defect degrades to an absent field and
//! an advisory warning. The invariant callers rely on:
//! `issues.len() + key-missing errors == rows.len()`.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    normalize::{lead_time_days, parse_export_date, parse_time_value, system_from_summary},
    schema::{CanonicalField, find_all_column_values, find_column},
    tabular::RawRow,
    version::highest_version,
};

/// The normalized unit of work: one Jira issue, never mutated after
/// construction. All fields but the key are optional; dates are calendar
/// dates with time-of-day discarded, durations are decimal hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIssue {
    pub issue_key: String,
    pub summary: Option<String>,
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub project: Option<String>,
    pub fix_version: Option<String>,
    pub created_date: Option<NaiveDate>,
    pub resolved_date: Option<NaiveDate>,
    /// Derived from the summary's leading bracket tag, not from any
    /// component column.
    pub system: Option<String>,
    /// Present iff both dates parsed and resolution is not before creation.
    pub lead_time_days: Option<i64>,
    pub original_estimate: Option<f64>,
    pub time_spent: Option<f64>,
    pub parent_key: Option<String>,
}

/// Result of mapping one batch of rows.
#[derive(Debug, Default)]
pub struct MapOutcome {
    pub issues: Vec<CanonicalIssue>,
    /// Structural errors: each one corresponds to a dropped row.
    pub errors: Vec<String>,
    /// Advisory only; the rows behind these were still emitted.
    pub warnings: Vec<String>,
}

/// Maps every row to a [`CanonicalIssue`] or a structural error. Rows are
/// 1-indexed with the header as line 1, so the first data row reports as
/// row 2.
pub fn map_rows(rows: &[RawRow]) -> MapOutcome {
    let mut outcome = MapOutcome::default();
    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 2;
        match map_row(row, row_number, &mut outcome.warnings) {
            Some(issue) => outcome.issues.push(issue),
            None => outcome
                .errors
                .push(format!("row {row_number}: missing issue key, row skipped")),
        }
    }
    outcome
}

fn map_row(row: &RawRow, row_number: usize, warnings: &mut Vec<String>) -> Option<CanonicalIssue> {
    let issue_key = find_column(row, CanonicalField::IssueKey)?.to_string();

    let created_date =
        normalized_date(row, CanonicalField::CreatedDate, "created", row_number, warnings);
    let resolved_date =
        normalized_date(row, CanonicalField::ResolvedDate, "resolved", row_number, warnings);

    let versions = find_all_column_values(row, CanonicalField::FixVersion);
    let fix_version =
        highest_version(versions.iter().map(String::as_str)).map(str::to_string);

    let summary = find_column(row, CanonicalField::Summary).map(str::to_string);
    let system = summary.as_deref().and_then(system_from_summary);

    let lead_time = match (created_date, resolved_date) {
        (Some(created), Some(resolved)) => lead_time_days(created, resolved),
        _ => None,
    };

    Some(CanonicalIssue {
        issue_key,
        summary,
        issue_type: find_column(row, CanonicalField::IssueType).map(str::to_string),
        status: find_column(row, CanonicalField::Status).map(str::to_string),
        project: find_column(row, CanonicalField::Project).map(str::to_string),
        fix_version,
        created_date,
        resolved_date,
        system,
        lead_time_days: lead_time,
        original_estimate: normalized_duration(row, CanonicalField::OriginalEstimate),
        time_spent: normalized_duration(row, CanonicalField::TimeSpent),
        parent_key: find_column(row, CanonicalField::ParentKey).map(str::to_string),
    })
}

fn normalized_date(
    row: &RawRow,
    field: CanonicalField,
    label: &str,
    row_number: usize,
    warnings: &mut Vec<String>,
) -> Option<NaiveDate> {
    let raw = find_column(row, field)?;
    let parsed = parse_export_date(raw);
    if parsed.is_none() {
        let message = format!("row {row_number}: unparsable {label} date '{raw}'");
        warn!("{message}");
        warnings.push(message);
    }
    parsed
}

fn normalized_duration(row: &RawRow, field: CanonicalField) -> Option<f64> {
    find_column(row, field).and_then(parse_time_value)
}
