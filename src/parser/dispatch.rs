//! Parser Dispatcher: selects a format for one file and runs it.

use super::Format;
use crate::error::FormatError;
use crate::types::PropertyMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Drives normalization of a single file.
///
/// Construction selects the format; [`FileParser::parse_file`] reads and
/// normalizes the file. Failures are recorded, never returned.
#[derive(Debug)]
pub struct FileParser {
    path: PathBuf,
    format: Option<Format>,
    data: PropertyMap,
    error: Option<FormatError>,
}

impl FileParser {
    pub fn new(path: &Path) -> Self {
        let path = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let format = Format::detect(&path);
        let error = match format {
            Some(_) => None,
            None => Some(FormatError::Unsupported { path: path.clone() }),
        };
        Self {
            path,
            format,
            data: PropertyMap::new(),
            error,
        }
    }

    /// Absolute path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    /// Read and normalize the file. Returns `true` on success.
    pub fn parse_file(&mut self) -> bool {
        let Some(format) = self.format else {
            return false;
        };

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source) => {
                self.error = Some(FormatError::Io {
                    path: self.path.clone(),
                    source,
                });
                return false;
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                self.error = Some(FormatError::Malformed {
                    path: self.path.clone(),
                    format: format.name(),
                    reason: "file is not valid UTF-8".to_string(),
                });
                return false;
            }
        };

        match format.normalize(&content, &mut self.data) {
            Ok(()) => {
                debug!(
                    path = %self.path.display(),
                    format = format.name(),
                    properties = self.data.len(),
                    "Normalized file"
                );
                self.error = None;
                true
            }
            Err(malformed) => {
                self.error = Some(FormatError::Malformed {
                    path: self.path.clone(),
                    format: format.name(),
                    reason: malformed.to_string(),
                });
                false
            }
        }
    }

    /// Normalized data, or `None` when no format applies.
    ///
    /// After a failed parse this holds whatever was produced before the
    /// failure.
    pub fn data(&self) -> Option<&PropertyMap> {
        self.format.map(|_| &self.data)
    }

    pub fn into_data(self) -> PropertyMap {
        self.data
    }

    pub fn error(&self) -> Option<&FormatError> {
        self.error.as_ref()
    }

    pub fn error_description(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }
}
