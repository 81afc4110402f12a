//! Import run orchestration for the two accepted export shapes.
//!
//! An issue import never aborts mid-run: structural errors drop their row,
//! soft errors degrade to warnings, and a failed per-row write is terminal
//! for that row only. Release imports are stricter: the shape has exactly
//! two required headers and a file missing either is rejected before any
//! row is processed, because there is no sensible per-row recovery.

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::{
    mapper::map_rows,
    store::{IssueSink, Store, Upsert},
    tabular::{self, RawRow},
};

pub const RELEASE_NAME_HEADER: &str = "RELEASE";
pub const RELEASE_DESCRIPTION_HEADER: &str = "DESCRIÇÃO";
const RELEASE_DESCRIPTION_HEADER_PLAIN: &str = "DESCRICAO";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("release export is missing required header(s): {}", missing.join(", "))]
    MissingHeaders { missing: Vec<String> },
    #[error(transparent)]
    Parse(#[from] anyhow::Error),
}

/// Outcome of one import run: counters plus the human-readable error and
/// warning lists the host surfaces to the user.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub inserted: usize,
    pub updated: usize,
    pub rejected: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RunReport {
    fn record(&mut self, upsert: Upsert) {
        match upsert {
            Upsert::Inserted => self.inserted += 1,
            Upsert::Updated => self.updated += 1,
        }
    }
}

/// Runs an issue import over raw CSV text: parse, map, then upsert each
/// record sequentially in input order through `sink`. Insert-vs-update is
/// decided against the key snapshot taken once at the start of the run,
/// so a key repeated within one file counts as inserted each time.
pub fn import_issues<S: IssueSink>(text: &str, sink: &mut S) -> Result<RunReport, RunError> {
    let rows = tabular::parse(text)?;
    let outcome = map_rows(&rows);

    let mut report = RunReport {
        rejected: outcome.errors.len(),
        errors: outcome.errors,
        warnings: outcome.warnings,
        ..RunReport::default()
    };

    let existing = sink.existing_keys();
    for issue in outcome.issues {
        let key = issue.issue_key.clone();
        match sink.upsert_issue(issue) {
            Ok(()) => {
                if existing.contains(&key) {
                    report.record(Upsert::Updated);
                } else {
                    report.record(Upsert::Inserted);
                }
            }
            Err(err) => report.errors.push(format!("{key}: {err}")),
        }
    }

    info!(
        "Imported {} issue(s) ({} new, {} updated), {} row(s) rejected",
        report.inserted + report.updated,
        report.inserted,
        report.updated,
        report.rejected
    );
    Ok(report)
}

/// Runs a release-description import. The shape is two required columns,
/// one release per row; rows without a release name are rejected
/// individually, a blank description is recorded as "no description yet".
pub fn import_releases(text: &str, store: &mut Store) -> Result<RunReport, RunError> {
    // Header validation must not depend on data rows being present; a
    // wrongly shaped file with an empty body is still wrongly shaped.
    let headers = tabular::parse_headers(text)?;
    if !headers.is_empty() {
        validate_release_headers(&headers)?;
    }
    let rows = tabular::parse(text)?;

    let mut report = RunReport::default();
    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 2;
        let Some(name) = release_column(row, RELEASE_NAME_HEADER)
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            report.rejected += 1;
            report
                .errors
                .push(format!("row {row_number}: missing release name, row skipped"));
            continue;
        };
        let description = release_column(row, RELEASE_DESCRIPTION_HEADER)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        report.record(store.upsert_release(name.to_string(), description));
    }

    info!(
        "Imported {} release(s) ({} new, {} updated), {} row(s) rejected",
        report.inserted + report.updated,
        report.inserted,
        report.updated,
        report.rejected
    );
    Ok(report)
}

/// Case-insensitive lookup that also tolerates the diacritic-free spelling
/// of the description header some export tools emit.
fn release_column<'a>(row: &'a RawRow, wanted: &str) -> Option<&'a str> {
    row.columns()
        .find(|(header, _)| release_header_matches(header, wanted))
        .map(|(_, value)| value)
}

fn release_header_matches(header: &str, wanted: &str) -> bool {
    let upper = header.trim().to_uppercase();
    if upper == wanted {
        return true;
    }
    wanted == RELEASE_DESCRIPTION_HEADER && upper == RELEASE_DESCRIPTION_HEADER_PLAIN
}

fn validate_release_headers(headers: &[String]) -> Result<(), RunError> {
    let mut missing = Vec::new();
    for required in [RELEASE_NAME_HEADER, RELEASE_DESCRIPTION_HEADER] {
        if !headers
            .iter()
            .any(|header| release_header_matches(header, required))
        {
            missing.push(required.to_string());
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RunError::MissingHeaders { missing })
    }
}
