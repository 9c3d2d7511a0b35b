//! Core types for the property normalization system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized key/value pairs produced by one file, ordered by key.
///
/// Later writes to the same key replace earlier ones.
pub type PropertyMap = std::collections::BTreeMap<String, String>;

/// Hierarchy levels in fixed order, outermost first.
pub const HIERARCHY: [Field; 4] = [
    Field::Environment,
    Field::Fabric,
    Field::Node,
    Field::Filename,
];

/// Wildcard token for location filters.
pub const WILDCARD: &str = "*";

/// A column of a property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Key,
    Value,
    Filename,
    Node,
    Fabric,
    Environment,
    Path,
    Extension,
    Ignore,
}

impl Field {
    /// All columns in relational table order.
    pub const ALL: [Field; 9] = [
        Field::Key,
        Field::Value,
        Field::Filename,
        Field::Node,
        Field::Fabric,
        Field::Environment,
        Field::Path,
        Field::Extension,
        Field::Ignore,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Key => "key",
            Field::Value => "value",
            Field::Filename => "filename",
            Field::Node => "node",
            Field::Fabric => "fabric",
            Field::Environment => "environment",
            Field::Path => "path",
            Field::Extension => "extension",
            Field::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Four-level position of a file in the scanned hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub environment: String,
    pub fabric: String,
    pub node: String,
    pub filename: String,
}

impl Location {
    pub fn new(
        environment: impl Into<String>,
        fabric: impl Into<String>,
        node: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            fabric: fabric.into(),
            node: node.into(),
            filename: filename.into(),
        }
    }

    /// `environment/fabric/node/filename`
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.environment, self.fabric, self.node, self.filename
        )
    }

    /// Lower-cased extension of the filename, empty when there is none.
    pub fn extension(&self) -> String {
        let name = self.filename.rsplit('/').next().unwrap_or_default();
        match name.rfind('.') {
            Some(i) if i + 1 < name.len() => name[i + 1..].to_ascii_lowercase(),
            _ => String::new(),
        }
    }
}

/// One normalized key/value pair plus its location metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub key: String,
    pub value: String,
    pub environment: String,
    pub fabric: String,
    pub node: String,
    pub filename: String,
    pub path: String,
    pub extension: String,
    pub ignore: bool,
}

impl PropertyRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>, location: &Location) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            environment: location.environment.clone(),
            fabric: location.fabric.clone(),
            node: location.node.clone(),
            filename: location.filename.clone(),
            path: location.path(),
            extension: location.extension(),
            ignore: false,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.environment.clone(),
            self.fabric.clone(),
            self.node.clone(),
            self.filename.clone(),
        )
    }

    /// Text value of a column; `ignore` renders as `"true"`/`"false"`.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Key => self.key.clone(),
            Field::Value => self.value.clone(),
            Field::Filename => self.filename.clone(),
            Field::Node => self.node.clone(),
            Field::Fabric => self.fabric.clone(),
            Field::Environment => self.environment.clone(),
            Field::Path => self.path.clone(),
            Field::Extension => self.extension.clone(),
            Field::Ignore => self.ignore.to_string(),
        }
    }

    /// Set a column from its text value.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), crate::error::StorageError> {
        match field {
            Field::Key => self.key = value.to_string(),
            Field::Value => self.value = value.to_string(),
            Field::Filename => self.filename = value.to_string(),
            Field::Node => self.node = value.to_string(),
            Field::Fabric => self.fabric = value.to_string(),
            Field::Environment => self.environment = value.to_string(),
            Field::Path => self.path = value.to_string(),
            Field::Extension => self.extension = value.to_string(),
            Field::Ignore => {
                self.ignore = parse_flag(value).ok_or_else(|| {
                    crate::error::StorageError::InvalidValue {
                        field: Field::Ignore.column(),
                        value: value.to_string(),
                    }
                })?
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
