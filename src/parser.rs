//! Format Normalizers
//!
//! Each supported configuration syntax is one variant of [`Format`]. Every
//! variant shares the same contract: read a whole file's contents, write
//! dotted keys and string values into a [`PropertyMap`], and report the first
//! syntax violation as a [`Malformed`] without unwinding past this module.
//! The map is left in whatever state it reached when a violation is found.
//!
//! [`FileParser`] selects the variant for a path and drives it.

mod conf;
mod dispatch;
mod format;
mod hosts;
mod info;
mod list;
mod properties;
mod xml;
mod yaml;

pub use dispatch::FileParser;
pub use format::{Format, ListKind};

use crate::types::PropertyMap;
use std::fmt;

/// A syntax violation inside one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformed {
    pub line: Option<usize>,
    pub reason: String,
}

impl Malformed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            line: None,
            reason: reason.into(),
        }
    }

    /// Violation on a 1-based line number.
    pub fn at(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

/// Uniform normalizer signature shared by every format.
pub(crate) type NormalizeFn = fn(&str, &mut PropertyMap) -> Result<(), Malformed>;

/// Split `line` at the first of `separators`, trimming key and value
/// independently.
pub(crate) fn split_pair<'a>(line: &'a str, separators: &[char]) -> Option<(&'a str, &'a str)> {
    let idx = line.find(separators)?;
    let sep_len = line[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
    Some((line[..idx].trim(), line[idx + sep_len..].trim()))
}

/// Values holding a comma become a bracketed list literal.
pub(crate) fn list_literal(value: &str) -> String {
    if value.contains(',') {
        format!("[{}]", value)
    } else {
        value.to_string()
    }
}

/// Prefix `key` with the active grouping, if any.
pub(crate) fn qualify(grouping: Option<&str>, key: &str) -> String {
    match grouping {
        Some(group) if !group.is_empty() => format!("{}.{}", group, key),
        _ => key.to_string(),
    }
}

pub(crate) fn is_comment(line: &str, markers: &[char]) -> bool {
    line.starts_with(markers)
}
