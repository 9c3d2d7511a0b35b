//! Query/Reporting Engine
//!
//! Read-only questions over a [`PropertyStore`]: which environments exist,
//! what the hierarchy looks like, where a key is defined, and which keys
//! match a pattern. Results are plain data; [`format`] turns them into text.

pub mod format;

use crate::error::ApiError;
use crate::store::{PropertyFilter, PropertyStore};
use crate::tree::PathIndex;
use crate::types::PropertyRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// environment -> fabric -> node -> files, all sorted and deduplicated.
pub type Structure = BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeSet<String>>>>;

/// Lowest hierarchy level shown by a structure report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StructureLevel {
    File = 1,
    Node = 2,
    Fabric = 3,
    Environment = 4,
}

impl StructureLevel {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(StructureLevel::File),
            2 => Some(StructureLevel::Node),
            3 => Some(StructureLevel::Fabric),
            4 => Some(StructureLevel::Environment),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StructureLevel::File => "FILE",
            StructureLevel::Node => "NODE",
            StructureLevel::Fabric => "FABRIC",
            StructureLevel::Environment => "ENVIRONMENT",
        }
    }

    /// Number of hierarchy levels printed, environment first.
    pub fn depth(self) -> usize {
        5 - self as usize
    }
}

impl fmt::Display for StructureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-environment counts for the info report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSummary {
    pub name: String,
    pub fabrics: usize,
    pub nodes: usize,
    pub files: usize,
}

/// Store-wide counts for the info report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreSummary {
    pub properties: u64,
    pub fabrics: usize,
    pub nodes: usize,
    pub files: usize,
    pub environments: Vec<EnvironmentSummary>,
}

/// Read-only reporting over a borrowed store.
pub struct QueryEngine<'s> {
    store: &'s dyn PropertyStore,
}

impl<'s> QueryEngine<'s> {
    pub fn new(store: &'s dyn PropertyStore) -> Self {
        Self { store }
    }

    pub fn is_empty(&self) -> Result<bool, ApiError> {
        Ok(self.store.count()? == 0)
    }

    /// Distinct environment names across all records.
    pub fn environments(&self) -> Result<BTreeSet<String>, ApiError> {
        Ok(self
            .all_records()?
            .into_iter()
            .map(|r| r.environment)
            .collect())
    }

    /// The hierarchy of every stored record.
    pub fn structure(&self) -> Result<Structure, ApiError> {
        let mut structure = Structure::new();
        for record in self.all_records()? {
            structure
                .entry(record.environment)
                .or_default()
                .entry(record.fabric)
                .or_default()
                .entry(record.node)
                .or_default()
                .insert(record.filename);
        }
        Ok(structure)
    }

    /// Structure report down to `level`, headed by the level name.
    pub fn print_structure(&self, level: StructureLevel) -> Result<String, ApiError> {
        Ok(format::format_structure(&self.structure()?, level))
    }

    /// Records with exactly `key`, optionally restricted to a wildcard
    /// location such as `env/*/*/*`.
    pub fn find(&self, key: &str, location: Option<&str>) -> Result<Vec<PropertyRecord>, ApiError> {
        let filter = PropertyFilter::key_at(key, location)?;
        Ok(self.store.select(&filter)?)
    }

    /// One aligned `PATH: ... VALUE: ...` line per match; empty when nothing
    /// matches.
    pub fn find_prop(&self, key: &str, location: Option<&str>) -> Result<Vec<String>, ApiError> {
        Ok(self
            .find(key, location)?
            .iter()
            .map(format::format_location_line)
            .collect())
    }

    /// Distinct keys containing `pattern`.
    pub fn grep(&self, pattern: &str) -> Result<BTreeSet<String>, ApiError> {
        Ok(self
            .all_records()?
            .into_iter()
            .map(|r| r.key)
            .filter(|key| key.contains(pattern))
            .collect())
    }

    /// Path index over every record's `environment/fabric/node/filename`.
    pub fn path_index(&self) -> Result<PathIndex, ApiError> {
        let mut index = PathIndex::new();
        for record in self.all_records()? {
            index.insert(&record.path)?;
        }
        Ok(index)
    }

    pub fn summary(&self) -> Result<StoreSummary, ApiError> {
        let records = self.all_records()?;
        let mut index = PathIndex::new();
        let mut files: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for record in &records {
            index.insert(&record.path)?;
            files
                .entry(record.environment.as_str())
                .or_default()
                .insert(record.path.as_str());
        }

        let mut summary = StoreSummary {
            properties: self.store.count()?,
            files: files.values().map(BTreeSet::len).sum(),
            ..StoreSummary::default()
        };
        let Some(root) = index.root() else {
            return Ok(summary);
        };
        summary.fabrics = index.count_nodes(root, 2, true);
        summary.nodes = index.count_nodes(root, 3, true);
        for (env, paths) in &files {
            let Some(id) = index.find(env) else { continue };
            summary.environments.push(EnvironmentSummary {
                name: env.to_string(),
                fabrics: index.count_nodes(id, 1, true),
                nodes: index.count_nodes(id, 2, true),
                files: paths.len(),
            });
        }
        Ok(summary)
    }

    fn all_records(&self) -> Result<Vec<PropertyRecord>, ApiError> {
        Ok(self.store.select(&PropertyFilter::all())?)
    }
}
