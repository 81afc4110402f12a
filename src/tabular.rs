//! Tabular parsing of raw export text into header-keyed rows.
//!
//! Jira CSV exports are loosely structured: repeated header names (one per
//! fix-version column), stray blank lines, and quoted fields containing
//! commas and escaped quotes. [`parse()`] reads the whole text through the
//! `csv` crate and layers the export-specific cleanup on top: duplicate
//! headers are disambiguated with positional suffixes (`_2`, `_3`, ...) and
//! rows that survive the reader but carry no data are dropped.

use std::collections::HashMap;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

/// One data row: disambiguated header name paired with its trimmed value,
/// in column order. Column order matters for multi-value lookups, so this
/// is a vector rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    columns: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(columns: Vec<(String, String)>) -> Self {
        Self { columns }
    }

    /// Value for an exact header name, or `None` if the column is absent.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    /// Columns in file order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|(_, value)| value.is_empty())
    }
}

/// The disambiguated header line alone, or an empty list for blank text.
/// Lets callers validate a file's shape even when it carries no data rows.
pub fn parse_headers(text: &str) -> Result<Vec<String>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = export_reader(text);
    Ok(disambiguate_headers(
        reader
            .headers()
            .context("Reading header line")?
            .iter()
            .collect::<Vec<_>>()
            .as_slice(),
    ))
}

/// Parses comma-delimited, double-quote-escaped text into rows keyed by the
/// (duplicate-disambiguated) header line.
///
/// Returns an empty sequence when the text has fewer than two non-blank
/// lines: a header with no body is not an error, just nothing to import.
pub fn parse(text: &str) -> Result<Vec<RawRow>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = export_reader(text);
    let headers = disambiguate_headers(
        reader
            .headers()
            .context("Reading header line")?
            .iter()
            .collect::<Vec<_>>()
            .as_slice(),
    );

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        // A lone empty field is a blank line that survived the reader.
        if record.is_empty() || (record.len() == 1 && record[0].trim().is_empty()) {
            continue;
        }
        let columns = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let value = record.get(col).unwrap_or("").trim().to_string();
                (header.clone(), value)
            })
            .collect();
        rows.push(RawRow::new(columns));
    }
    Ok(rows)
}

fn export_reader(text: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .double_quote(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes())
}

/// Appends `_2`, `_3`, ... to the second, third, ... occurrence of a header
/// name so repeated columns stay addressable downstream.
fn disambiguate_headers(headers: &[&str]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .map(|raw| {
            let name = raw.trim().to_string();
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{name}_{count}")
            }
        })
        .collect()
}
