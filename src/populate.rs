//! Bulk feed from a directory tree into a property store.
//!
//! Every key/value pair of every parsed file becomes one record tagged with
//! the file's location. Records are buffered and written in transactions of
//! `batch_size`; per-file failures are only counted, a storage failure ends
//! the run.

use crate::error::ApiError;
use crate::store::PropertyStore;
use crate::types::PropertyRecord;
use crate::walker::{DirectoryWalker, FailureKind, FileOutcome, WalkFailure};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Outcome of one populate run.
#[derive(Debug, Clone, Default)]
pub struct PopulateReport {
    pub root: PathBuf,
    pub files_seen: usize,
    pub files_parsed: usize,
    pub unsupported: Vec<PathBuf>,
    pub malformed: Vec<WalkFailure>,
    pub misplaced: Vec<PathBuf>,
    pub unreadable: Vec<WalkFailure>,
    pub properties_added: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PopulateReport {
    pub fn skipped(&self) -> usize {
        self.unsupported.len() + self.malformed.len() + self.misplaced.len() + self.unreadable.len()
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> serde_json::Value {
        let descriptions = |failures: &[WalkFailure]| -> Vec<String> {
            failures.iter().map(|f| f.description.clone()).collect()
        };
        let paths = |paths: &[PathBuf]| -> Vec<String> {
            paths.iter().map(|p| p.display().to_string()).collect()
        };
        json!({
            "root": self.root.display().to_string(),
            "files_seen": self.files_seen,
            "files_parsed": self.files_parsed,
            "properties_added": self.properties_added,
            "unsupported": paths(&self.unsupported),
            "misplaced": paths(&self.misplaced),
            "malformed": descriptions(&self.malformed),
            "unreadable": descriptions(&self.unreadable),
            "started_at": self.started_at.to_rfc3339(),
            "finished_at": self.finished_at.to_rfc3339(),
            "duration_ms": (self.finished_at - self.started_at).num_milliseconds(),
        })
    }

    fn record_failure(&mut self, failure: WalkFailure) {
        match failure.kind {
            FailureKind::Unsupported => self.unsupported.push(failure.path),
            FailureKind::Misplaced => self.misplaced.push(failure.path),
            FailureKind::Malformed => self.malformed.push(failure),
            FailureKind::Unreadable => self.unreadable.push(failure),
        }
    }
}

impl fmt::Display for PopulateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added {} properties to database", self.properties_added)?;
        writeln!(
            f,
            "Parsed {} of {} files under {}",
            self.files_parsed,
            self.files_seen,
            self.root.display()
        )?;
        if !self.unsupported.is_empty() {
            writeln!(f, "Skipped {} unsupported files", self.unsupported.len())?;
        }
        if !self.misplaced.is_empty() {
            writeln!(
                f,
                "Skipped {} files outside environment/fabric/node depth",
                self.misplaced.len()
            )?;
        }
        for failure in self.malformed.iter().chain(&self.unreadable) {
            writeln!(f, "  {}", failure.description)?;
        }
        Ok(())
    }
}

/// Feeds walker output into a store in fixed-size transactions.
pub struct BulkFeeder<'s> {
    store: &'s mut dyn PropertyStore,
    batch_size: usize,
    buffer: Vec<PropertyRecord>,
}

impl<'s> BulkFeeder<'s> {
    pub fn new(store: &'s mut dyn PropertyStore, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
        }
    }

    /// Walk `walker`'s root to completion.
    pub fn populate(mut self, walker: &DirectoryWalker) -> Result<PopulateReport, ApiError> {
        let mut report = PopulateReport {
            root: walker.root().to_path_buf(),
            started_at: Utc::now(),
            ..PopulateReport::default()
        };
        info!(root = %walker.root().display(), batch_size = self.batch_size, "Populate started");

        for outcome in walker.files() {
            report.files_seen += 1;
            match outcome {
                FileOutcome::Parsed(file) => {
                    report.files_parsed += 1;
                    debug!(
                        path = %file.path.display(),
                        format = file.format.name(),
                        properties = file.properties.len(),
                        "Parsed file"
                    );
                    for (key, value) in &file.properties {
                        self.buffer
                            .push(PropertyRecord::new(key.as_str(), value.as_str(), &file.location));
                        if self.buffer.len() >= self.batch_size {
                            report.properties_added += self.flush_buffer()?;
                        }
                    }
                }
                FileOutcome::Failed(failure) => {
                    warn!(path = %failure.path.display(), kind = ?failure.kind, "{}", failure.description);
                    report.record_failure(failure);
                }
            }
        }
        report.properties_added += self.flush_buffer()?;
        self.store.flush()?;
        report.finished_at = Utc::now();

        info!(
            files = report.files_seen,
            parsed = report.files_parsed,
            skipped = report.skipped(),
            added = report.properties_added,
            "Populate finished"
        );
        Ok(report)
    }

    fn flush_buffer(&mut self) -> Result<u64, ApiError> {
        if self.buffer.is_empty() {
            return Ok(0);
        }
        if let Err(e) = self.store.insert_batch(&self.buffer) {
            error!(rows = self.buffer.len(), error = %e, "Insert batch failed");
            return Err(e.into());
        }
        let written = self.buffer.len() as u64;
        self.buffer.clear();
        Ok(written)
    }
}

/// Populate `store` from the tree at `walker`'s root.
pub fn populate(
    store: &mut dyn PropertyStore,
    walker: &DirectoryWalker,
    batch_size: usize,
) -> Result<PopulateReport, ApiError> {
    BulkFeeder::new(store, batch_size).populate(walker)
}
