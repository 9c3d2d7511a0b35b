//! Property Store
//!
//! Backend-neutral CRUD and filter surface for normalized property records.
//! The query layer talks only to [`PropertyStore`]; a document-oriented
//! backend ([`SledPropertyStore`]) and a relational backend
//! ([`SqlitePropertyStore`]) implement it.
//!
//! Every batch operation is all-or-nothing: a failure part way through leaves
//! the store exactly as it was before the batch.

pub mod filter;
pub mod persistence;
pub mod query_builder;
pub mod sqlite;

pub use filter::PropertyFilter;
pub use persistence::SledPropertyStore;
pub use sqlite::SqlitePropertyStore;

use crate::error::StorageError;
use crate::types::{Field, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Column assignments for [`PropertyStore::update`].
pub type FieldValues = BTreeMap<Field, String>;

/// Property store interface
pub trait PropertyStore {
    fn insert(&mut self, record: &PropertyRecord) -> Result<(), StorageError>;

    /// Insert all records in one transaction.
    fn insert_batch(&mut self, records: &[PropertyRecord]) -> Result<(), StorageError>;

    /// Apply `updated` to every record matching `filter`. Returns the number
    /// of records changed; an empty `updated` is a no-op.
    fn update(
        &mut self,
        updated: &FieldValues,
        filter: &PropertyFilter,
    ) -> Result<usize, StorageError>;

    fn delete(&mut self, filter: &PropertyFilter) -> Result<usize, StorageError>;

    /// Delete the union of all filters in one transaction.
    fn delete_batch(&mut self, filters: &[PropertyFilter]) -> Result<usize, StorageError>;

    fn select(&self, filter: &PropertyFilter) -> Result<Vec<PropertyRecord>, StorageError>;

    fn count(&self) -> Result<u64, StorageError>;

    /// Remove every record, returning how many were removed.
    fn clear(&mut self) -> Result<u64, StorageError>;

    fn flush(&self) -> Result<(), StorageError>;
}

/// Storage technology behind a [`PropertyStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Document store: one serialized record per entry.
    #[default]
    Sled,
    /// Relational store: one `properties` table.
    Sqlite,
}

/// Open the store for `backend` at `path`.
pub fn open_store(
    backend: StoreBackend,
    path: &Path,
    connect_timeout: Duration,
) -> Result<Box<dyn PropertyStore>, StorageError> {
    match backend {
        StoreBackend::Sled => Ok(Box::new(SledPropertyStore::open(path)?)),
        StoreBackend::Sqlite => Ok(Box::new(SqlitePropertyStore::open(path, connect_timeout)?)),
    }
}
