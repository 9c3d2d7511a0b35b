//! Lighthouse: Configuration Property Normalization
//!
//! Walks a directory tree laid out as `environment/fabric/node/file`,
//! normalizes every supported configuration format into flat key/value
//! pairs, stores them with their location in a pluggable property store, and
//! answers structural and lookup queries over the result.

pub mod config;
pub mod error;
pub mod logging;
pub mod parser;
pub mod populate;
pub mod query;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod walker;
