//! Error types
//!
//! Parse failures stay inside the parser boundary as [`FormatError`] and are
//! reported per file. Storage failures ([`StorageError`]) are terminal and
//! propagate to the top level through [`ApiError`].

use std::path::PathBuf;
use thiserror::Error;

/// Per-file normalization failure. Never fatal to a walk.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("unsupported: {}", path.display())]
    Unsupported { path: PathBuf },

    #[error("{} is not in correct {format} format: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Property store failure. Fatal for the current run.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid value {value:?} for field {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("batch rejected at row {index}: {reason}")]
    BatchRejected { index: usize, reason: String },
}

/// Path index misuse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no such path: {0}")]
    NoSuchPath(String),
}

/// Top-level error surfaced to the command layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("database access error: {0}")]
    StorageError(#[from] StorageError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
