//! Relational backend: a single SQLite `properties` table.

use super::query_builder::{self, Statement};
use super::{FieldValues, PropertyFilter, PropertyStore};
use crate::error::StorageError;
use crate::types::{parse_flag, Field, PropertyRecord};
use rusqlite::{params_from_iter, Connection, Row};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub struct SqlitePropertyStore {
    conn: Connection,
}

impl SqlitePropertyStore {
    /// Open (creating if needed) the database file and its schema.
    pub fn open(path: &Path, connect_timeout: Duration) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(connect_timeout)?;
        debug!(path = %path.display(), "Opened SQLite property store");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(&query_builder::create_table())?;
        Ok(Self { conn })
    }

    fn execute(&self, stmt: &Statement) -> Result<usize, StorageError> {
        Ok(self.conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))?)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PropertyRecord> {
    let text = |field: Field| -> rusqlite::Result<String> {
        let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let ignore = text(Field::Ignore)?;
    Ok(PropertyRecord {
        key: text(Field::Key)?,
        value: text(Field::Value)?,
        filename: text(Field::Filename)?,
        node: text(Field::Node)?,
        fabric: text(Field::Fabric)?,
        environment: text(Field::Environment)?,
        path: text(Field::Path)?,
        extension: text(Field::Extension)?,
        ignore: parse_flag(&ignore).unwrap_or(false),
    })
}

impl PropertyStore for SqlitePropertyStore {
    fn insert(&mut self, record: &PropertyRecord) -> Result<(), StorageError> {
        self.execute(&query_builder::insert(record))?;
        Ok(())
    }

    fn insert_batch(&mut self, records: &[PropertyRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction()?;
        {
            let mut prepared = tx.prepare_cached(&query_builder::insert(&records[0]).sql)?;
            for (index, record) in records.iter().enumerate() {
                let stmt = query_builder::insert(record);
                prepared
                    .execute(params_from_iter(stmt.params.iter()))
                    .map_err(|e| StorageError::BatchRejected {
                        index,
                        reason: e.to_string(),
                    })?;
            }
        }
        tx.commit()?;
        debug!(rows = records.len(), "Committed insert batch");
        Ok(())
    }

    fn update(
        &mut self,
        updated: &FieldValues,
        filter: &PropertyFilter,
    ) -> Result<usize, StorageError> {
        if let Some(value) = updated.get(&Field::Ignore) {
            if parse_flag(value).is_none() {
                return Err(StorageError::InvalidValue {
                    field: Field::Ignore.column(),
                    value: value.clone(),
                });
            }
        }
        match query_builder::update(updated, filter) {
            Some(stmt) => self.execute(&stmt),
            None => Ok(0),
        }
    }

    fn delete(&mut self, filter: &PropertyFilter) -> Result<usize, StorageError> {
        self.execute(&query_builder::delete(filter))
    }

    fn delete_batch(&mut self, filters: &[PropertyFilter]) -> Result<usize, StorageError> {
        if filters.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for (index, filter) in filters.iter().enumerate() {
            let stmt = query_builder::delete(filter);
            removed += tx
                .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
                .map_err(|e| StorageError::BatchRejected {
                    index,
                    reason: e.to_string(),
                })?;
        }
        tx.commit()?;
        Ok(removed)
    }

    fn select(&self, filter: &PropertyFilter) -> Result<Vec<PropertyRecord>, StorageError> {
        let stmt = query_builder::select(filter);
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let rows = prepared.query_map(params_from_iter(stmt.params.iter()), record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<u64, StorageError> {
        let stmt = query_builder::count();
        let count: i64 = self.conn.query_row(&stmt.sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear(&mut self) -> Result<u64, StorageError> {
        let removed = self.execute(&query_builder::delete(&PropertyFilter::all()))?;
        Ok(removed as u64)
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
