//! Directory Walker
//!
//! Discovers every file under a root, normalizes each through
//! [`FileParser`], and derives the file's [`Location`] from its position
//! under the root. Per-file failures are yielded alongside successes so the
//! caller can count them; nothing here aborts the walk.

use crate::error::{ApiError, FormatError};
use crate::parser::{FileParser, Format};
use crate::types::{Location, PropertyMap};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Walker behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Skip dot-files and dot-directories below the root.
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: true,
        }
    }
}

/// A successfully normalized file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub location: Location,
    pub format: Format,
    pub properties: PropertyMap,
}

/// Why a file contributed no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unsupported,
    Malformed,
    /// Too shallow to carry all four hierarchy levels.
    Misplaced,
    Unreadable,
}

#[derive(Debug, Clone)]
pub struct WalkFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub description: String,
}

#[derive(Debug)]
pub enum FileOutcome {
    Parsed(ParsedFile),
    Failed(WalkFailure),
}

/// Recursive file discovery under one root.
pub struct DirectoryWalker {
    root: PathBuf,
    root_name: String,
    config: WalkerConfig,
}

impl DirectoryWalker {
    pub fn new(root: &Path) -> Result<Self, ApiError> {
        let root = dunce::canonicalize(root).map_err(|e| {
            ApiError::InvalidArgument(format!("cannot resolve root {}: {}", root.display(), e))
        })?;
        if !root.is_dir() {
            return Err(ApiError::InvalidArgument(format!(
                "root {} is not a directory",
                root.display()
            )));
        }
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            root,
            root_name,
            config: WalkerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: WalkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Derive the hierarchy location of `path` relative to the root.
    ///
    /// Four or more relative components map directly, with any surplus
    /// folded into the filename. Three components take the root's own name
    /// as the environment. Anything shallower has no location.
    pub fn locate(&self, path: &Path) -> Option<Location> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        match parts.len() {
            0..=2 => None,
            3 if self.root_name.is_empty() => None,
            3 => Some(Location::new(
                self.root_name.clone(),
                parts[0].clone(),
                parts[1].clone(),
                parts[2].clone(),
            )),
            _ => Some(Location::new(
                parts[0].clone(),
                parts[1].clone(),
                parts[2].clone(),
                parts[3..].join("/"),
            )),
        }
    }

    /// Lazily walk the tree in file-name order, normalizing each file.
    pub fn files(&self) -> impl Iterator<Item = FileOutcome> + '_ {
        let skip_hidden = self.config.skip_hidden;
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)))
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_dir() => None,
                Ok(entry) if entry.path_is_symlink() && entry.path().is_dir() => {
                    debug!(path = %entry.path().display(), "Skipping symlinked directory");
                    None
                }
                Ok(entry) => Some(self.process(entry.path())),
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), error = %e, "Failed to read directory entry");
                    Some(FileOutcome::Failed(WalkFailure {
                        path,
                        kind: FailureKind::Unreadable,
                        description: e.to_string(),
                    }))
                }
            })
    }

    fn process(&self, path: &Path) -> FileOutcome {
        let mut parser = FileParser::new(path);
        let Some(format) = parser.format() else {
            return FileOutcome::Failed(failure(&parser, FailureKind::Unsupported));
        };
        let Some(location) = self.locate(parser.path()) else {
            return FileOutcome::Failed(WalkFailure {
                path: parser.path().to_path_buf(),
                kind: FailureKind::Misplaced,
                description: format!(
                    "misplaced: {} is not at environment/fabric/node/file depth",
                    parser.path().display()
                ),
            });
        };
        if !parser.parse_file() {
            let kind = match parser.error() {
                Some(FormatError::Io { .. }) => FailureKind::Unreadable,
                _ => FailureKind::Malformed,
            };
            return FileOutcome::Failed(failure(&parser, kind));
        }

        let path = parser.path().to_path_buf();
        FileOutcome::Parsed(ParsedFile {
            path,
            location,
            format,
            properties: parser.into_data(),
        })
    }
}

fn failure(parser: &FileParser, kind: FailureKind) -> WalkFailure {
    WalkFailure {
        path: parser.path().to_path_buf(),
        kind,
        description: parser
            .error_description()
            .unwrap_or_else(|| format!("failed: {}", parser.path().display())),
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn locate_uses_root_name_for_three_levels() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Redwood-City");
        fs::create_dir_all(&root).unwrap();
        let walker = DirectoryWalker::new(&root).unwrap();

        let loc = walker.locate(&walker.root().join("storm/h2/sth2.prop")).unwrap();
        assert_eq!(loc, Location::new("Redwood-City", "storm", "h2", "sth2.prop"));

        let loc = walker
            .locate(&walker.root().join("dev/storm/h2/conf.d/app.conf"))
            .unwrap();
        assert_eq!(loc, Location::new("dev", "storm", "h2", "conf.d/app.conf"));

        assert!(walker.locate(&walker.root().join("h2/app.conf")).is_none());
    }

    #[test]
    fn walk_reports_successes_and_failures() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "env/fab/node/app.conf", "[a]\nb = c\n");
        write(root, "env/fab/node/readme.txt", "hello");
        write(root, "env/fab/node/bad.yaml", "k: [oops");
        write(root, "env/top.conf", "a=1\n");
        write(root, "env/fab/node/.hidden.conf", "a=1\n");

        let walker = DirectoryWalker::new(root).unwrap();
        let outcomes: Vec<FileOutcome> = walker.files().collect();
        assert_eq!(outcomes.len(), 4);

        let parsed: Vec<&ParsedFile> = outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Parsed(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].location.path(), "env/fab/node/app.conf");
        assert_eq!(parsed[0].properties.get("a.b").map(String::as_str), Some("c"));

        let kinds: Vec<FailureKind> = outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed(f) => Some(f.kind),
                _ => None,
            })
            .collect();
        assert!(kinds.contains(&FailureKind::Unsupported));
        assert!(kinds.contains(&FailureKind::Malformed));
        assert!(kinds.contains(&FailureKind::Misplaced));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_skipped_unless_followed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("tree");
        write(&root, "env/fab/node/app.conf", "a=1\n");
        write(temp.path(), "outside/node/other.conf", "b=2\n");
        std::os::unix::fs::symlink(temp.path().join("outside"), root.join("env/linked")).unwrap();

        let walker = DirectoryWalker::new(&root).unwrap();
        let outcomes: Vec<FileOutcome> = walker.files().collect();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], FileOutcome::Parsed(_)));

        let walker = DirectoryWalker::new(&root).unwrap().with_config(WalkerConfig {
            follow_symlinks: true,
            ..WalkerConfig::default()
        });
        assert_eq!(walker.files().count(), 2);
    }

    #[test]
    fn root_must_be_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.conf");
        fs::write(&file, "a=1").unwrap();
        assert!(matches!(
            DirectoryWalker::new(&file),
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(DirectoryWalker::new(&temp.path().join("missing")).is_err());
    }
}
