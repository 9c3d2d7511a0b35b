//! CLI Tooling
//!
//! Command-line interface for populating, clearing and querying a property
//! store. Every command returns its report as text; empty stores and bad
//! arguments produce explicit messages instead of errors.

use crate::config::{ConfigLoader, LighthouseConfig};
use crate::error::ApiError;
use crate::populate;
use crate::query::format::{
    format_find_result, format_grep_result, format_summary_json, format_summary_text,
};
use crate::query::{QueryEngine, StructureLevel};
use crate::store::{open_store, PropertyStore, StoreBackend};
use crate::walker::DirectoryWalker;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

pub const EMPTY_STORE: &str = "Database is empty";

pub const STRUCTURE_USAGE: &str = "Usage: lighthouse structure <level>
Where <level> denotes the lowest level to which you would like to see the database structure.
Accepted level values
\t4 - Environment
\t3 - Fabric
\t2 - Node
\t1 - File";

pub const FIND_USAGE: &str = "Usage: lighthouse find <key> [location]
Where [location] is environment/fabric/node/filename, with * matching any value at that level.";

pub const POPULATE_USAGE: &str = "Usage: lighthouse populate <root> [--format text|json]
Where <root> is an existing directory laid out as environment/fabric/node/file.";

pub const FORMAT_USAGE: &str = "Accepted --format values: text, json";

/// Lighthouse CLI - normalize configuration trees into a queryable store
#[derive(Parser, Debug)]
#[command(name = "lighthouse")]
#[command(about = "Normalize configuration file trees into a queryable property store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store location (overrides storage.path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Store backend (overrides storage.backend)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<StoreBackend>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse every supported file under a root and store its properties
    Populate {
        /// Root directory laid out as environment/fabric/node/file
        root: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Remove every property from the store
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show property count and per-environment breakdown
    Info {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the stored hierarchy down to a level (4 environment .. 1 file)
    Structure {
        /// Lowest level to print
        level: String,
    },
    /// Print the locations and values of a key
    Find {
        key: String,
        /// environment/fabric/node/filename, `*` matches anything
        location: Option<String>,
    },
    /// List keys containing a substring
    Grep { pattern: String },
    /// Print a branch of the stored path hierarchy
    Tree {
        /// Branch to print; the whole hierarchy when omitted
        #[arg(default_value = "")]
        path: String,
        /// Levels below the branch to print
        #[arg(long, default_value_t = 4)]
        depth: usize,
    },
}

impl Cli {
    /// Load configuration and apply flag overrides.
    pub fn resolve_config(&self) -> Result<LighthouseConfig, ApiError> {
        let mut config = ConfigLoader::load_optional(self.config.as_deref())?;
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(store) = &self.store {
            config.storage.path = Some(store.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        Ok(config)
    }
}

/// CLI context owning the open store for one invocation.
pub struct CliContext {
    config: LighthouseConfig,
    store_path: PathBuf,
    store: Box<dyn PropertyStore>,
}

impl CliContext {
    /// Open the configured store.
    pub fn new(config: LighthouseConfig) -> Result<Self, ApiError> {
        let store_path = config.storage.resolve_path()?;
        let store = open_store(
            config.storage.backend,
            &store_path,
            config.storage.connect_timeout(),
        )?;
        Ok(Self {
            config,
            store_path,
            store,
        })
    }

    pub fn config(&self) -> &LighthouseConfig {
        &self.config
    }

    pub fn store_path(&self) -> &std::path::Path {
        &self.store_path
    }

    pub fn store(&self) -> &dyn PropertyStore {
        self.store.as_ref()
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        info!(
            command = command_name(command),
            store = %self.store_path.display(),
            "Command started"
        );
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&mut self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Populate { root, format } => self.handle_populate(root, format),
            Commands::Clear { yes } => self.handle_clear(*yes),
            Commands::Info { format } => {
                let format = match parse_output_format(format) {
                    Ok(format) => format,
                    Err(reason) => return Ok(format!("{}\n{}", reason, FORMAT_USAGE)),
                };
                let summary = QueryEngine::new(self.store()).summary()?;
                match format {
                    OutputFormat::Text => Ok(format_summary_text(&summary)),
                    OutputFormat::Json => Ok(format_summary_json(&summary)),
                }
            }
            Commands::Structure { level } => self.handle_structure(level),
            Commands::Find { key, location } => self.handle_find(key, location.as_deref()),
            Commands::Grep { pattern } => {
                let engine = QueryEngine::new(self.store());
                if engine.is_empty()? {
                    return Ok(EMPTY_STORE.to_string());
                }
                Ok(format_grep_result(pattern, &engine.grep(pattern)?))
            }
            Commands::Tree { path, depth } => self.handle_tree(path, *depth),
        }
    }

    fn handle_populate(&mut self, root: &std::path::Path, format: &str) -> Result<String, ApiError> {
        let format = match parse_output_format(format) {
            Ok(format) => format,
            Err(reason) => return Ok(format!("{}\n{}", reason, POPULATE_USAGE)),
        };
        let walker = match DirectoryWalker::new(root) {
            Ok(walker) => walker.with_config(self.config.scan.clone()),
            Err(ApiError::InvalidArgument(reason)) => {
                return Ok(format!("{}\n{}", reason, POPULATE_USAGE))
            }
            Err(e) => return Err(e),
        };
        let report = populate::populate(
            self.store.as_mut(),
            &walker,
            self.config.storage.batch_size,
        )?;
        Ok(match format {
            OutputFormat::Text => report.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&report.to_json())
                .map_err(|e| ApiError::InvalidArgument(e.to_string()))?,
        })
    }

    fn handle_clear(&mut self, yes: bool) -> Result<String, ApiError> {
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Remove all {} properties from {}?",
                    self.store.count()?,
                    self.store_path.display()
                ))
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if !confirmed {
                return Ok("Clear cancelled".to_string());
            }
        }
        let removed = self.store.clear()?;
        self.store.flush()?;
        Ok(format!("Cleared {} properties", removed))
    }

    fn handle_structure(&self, level: &str) -> Result<String, ApiError> {
        let engine = QueryEngine::new(self.store());
        if engine.is_empty()? {
            return Ok(EMPTY_STORE.to_string());
        }
        match level.trim().parse::<u8>().ok().and_then(StructureLevel::from_level) {
            Some(level) => engine.print_structure(level),
            None => Ok(STRUCTURE_USAGE.to_string()),
        }
    }

    fn handle_find(&self, key: &str, location: Option<&str>) -> Result<String, ApiError> {
        let engine = QueryEngine::new(self.store());
        if engine.is_empty()? {
            return Ok(EMPTY_STORE.to_string());
        }
        match engine.find_prop(key, location) {
            Ok(lines) => Ok(format_find_result(key, &lines)),
            Err(ApiError::InvalidArgument(reason)) => Ok(format!("{}\n{}", reason, FIND_USAGE)),
            Err(e) => Err(e),
        }
    }

    fn handle_tree(&self, path: &str, depth: usize) -> Result<String, ApiError> {
        let engine = QueryEngine::new(self.store());
        if engine.is_empty()? {
            return Ok(EMPTY_STORE.to_string());
        }
        let index = engine.path_index()?;
        match index.print(path, depth) {
            Ok(text) => Ok(text),
            Err(e) => Ok(format!("Cannot print {}: {}", path, e)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("Invalid format: {}", other)),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Populate { .. } => "populate",
        Commands::Clear { .. } => "clear",
        Commands::Info { .. } => "info",
        Commands::Structure { .. } => "structure",
        Commands::Find { .. } => "find",
        Commands::Grep { .. } => "grep",
        Commands::Tree { .. } => "tree",
    }
}
