//! Document backend: sled tree of bincode-encoded property records.
//!
//! Each record lives under a monotonically generated id. Filters are
//! evaluated by scanning; every multi-record write goes through a single
//! atomic `apply_batch`.

use super::{FieldValues, PropertyFilter, PropertyStore};
use crate::error::StorageError;
use crate::types::PropertyRecord;
use sled::{Batch, IVec};
use std::path::Path;
use tracing::debug;

const PROPERTIES_TREE: &str = "properties";

pub struct SledPropertyStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledPropertyStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        debug!(path = %path.display(), "Opened sled property store");
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(PROPERTIES_TREE)?;
        Ok(Self { db, tree })
    }

    /// Store that disappears when dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn next_id(&self) -> Result<[u8; 8], StorageError> {
        Ok(self.db.generate_id()?.to_be_bytes())
    }

    fn scan<'a>(
        &'a self,
        filter: &'a PropertyFilter,
    ) -> impl Iterator<Item = Result<(IVec, PropertyRecord), StorageError>> + 'a {
        self.tree.iter().filter_map(move |entry| {
            let decoded = entry.map_err(StorageError::from).and_then(|(id, bytes)| {
                let record: PropertyRecord = bincode::deserialize(&bytes)?;
                Ok((id, record))
            });
            match decoded {
                Ok((id, record)) if filter.matches(&record) => Some(Ok((id, record))),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            }
        })
    }

    fn matching_ids(&self, filter: &PropertyFilter) -> Result<Vec<IVec>, StorageError> {
        self.scan(filter).map(|r| r.map(|(id, _)| id)).collect()
    }
}

impl PropertyStore for SledPropertyStore {
    fn insert(&mut self, record: &PropertyRecord) -> Result<(), StorageError> {
        let id = self.next_id()?;
        self.tree.insert(id, bincode::serialize(record)?)?;
        Ok(())
    }

    fn insert_batch(&mut self, records: &[PropertyRecord]) -> Result<(), StorageError> {
        let mut batch = Batch::default();
        for (index, record) in records.iter().enumerate() {
            let bytes = bincode::serialize(record).map_err(|e| StorageError::BatchRejected {
                index,
                reason: e.to_string(),
            })?;
            batch.insert(self.next_id()?.to_vec(), bytes);
        }
        self.tree.apply_batch(batch)?;
        debug!(rows = records.len(), "Committed insert batch");
        Ok(())
    }

    fn update(
        &mut self,
        updated: &FieldValues,
        filter: &PropertyFilter,
    ) -> Result<usize, StorageError> {
        if updated.is_empty() {
            return Ok(0);
        }
        let mut batch = Batch::default();
        let mut changed = 0;
        for entry in self.scan(filter) {
            let (id, mut record) = entry?;
            for (field, value) in updated {
                record.set(*field, value)?;
            }
            batch.insert(id, bincode::serialize(&record)?);
            changed += 1;
        }
        self.tree.apply_batch(batch)?;
        Ok(changed)
    }

    fn delete(&mut self, filter: &PropertyFilter) -> Result<usize, StorageError> {
        self.delete_batch(std::slice::from_ref(filter))
    }

    fn delete_batch(&mut self, filters: &[PropertyFilter]) -> Result<usize, StorageError> {
        let mut ids = std::collections::BTreeSet::new();
        for filter in filters {
            ids.extend(self.matching_ids(filter)?);
        }
        let mut batch = Batch::default();
        for id in &ids {
            batch.remove(id.clone());
        }
        self.tree.apply_batch(batch)?;
        Ok(ids.len())
    }

    fn select(&self, filter: &PropertyFilter) -> Result<Vec<PropertyRecord>, StorageError> {
        self.scan(filter).map(|r| r.map(|(_, record)| record)).collect()
    }

    fn count(&self) -> Result<u64, StorageError> {
        Ok(self.tree.len() as u64)
    }

    fn clear(&mut self) -> Result<u64, StorageError> {
        let size = self.tree.len() as u64;
        self.tree.clear()?;
        Ok(size)
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.tree.flush()?;
        Ok(())
    }
}
