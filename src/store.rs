//! JSON-backed issue and release store.
//!
//! The engine treats persistence as an external collaborator; this module
//! is the host-side implementation the CLI uses. The whole store is one
//! JSON document with BTreeMap-backed sections so output is deterministic.
//! The [`IssueSink`] trait is the seam the import run writes through: the
//! JSON store cannot fail per row, but a host backed by a real database
//! can, and the run reports such failures per key without stopping.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{lifecycle::ReleaseLookup, mapper::CanonicalIssue};

/// Whether an upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Per-row write target for an import run. The key snapshot is taken once
/// at the start of the run and decides insert-vs-update for every row in
/// it, including repeated keys within one file.
pub trait IssueSink {
    fn existing_keys(&self) -> BTreeSet<String>;
    fn upsert_issue(&mut self, issue: CanonicalIssue) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    pub issues: BTreeMap<String, CanonicalIssue>,
    pub releases: ReleaseLookup,
}

impl Store {
    /// Loads the store file; a missing file is an empty store, not an
    /// error, so first runs need no setup step.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Store::default());
        }
        let file = File::open(path).with_context(|| format!("Opening store file {path:?}"))?;
        let store = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing store file {path:?}"))?;
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating store file {path:?}"))?;
        serde_json::to_writer_pretty(file, self)
            .with_context(|| format!("Writing store file {path:?}"))
    }

    pub fn upsert_release(&mut self, name: String, description: Option<String>) -> Upsert {
        let normalized = description.filter(|text| !text.trim().is_empty());
        match self.releases.insert(name, normalized) {
            None => Upsert::Inserted,
            Some(_) => Upsert::Updated,
        }
    }

    /// Distinct fix-versions referenced by stored issues.
    pub fn referenced_releases(&self) -> BTreeSet<String> {
        self.issues
            .values()
            .filter_map(|issue| issue.fix_version.clone())
            .collect()
    }
}

impl IssueSink for Store {
    fn existing_keys(&self) -> BTreeSet<String> {
        self.issues.keys().cloned().collect()
    }

    fn upsert_issue(&mut self, issue: CanonicalIssue) -> Result<()> {
        self.issues.insert(issue.issue_key.clone(), issue);
        Ok(())
    }
}
