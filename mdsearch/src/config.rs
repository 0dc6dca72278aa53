//! Search configuration.
//!
//! Configuration can be loaded from layered YAML locations, in order of
//! precedence:
//! 1. A custom config file passed via `--config`
//! 2. A local `.mdsearch.yaml` in the current directory
//! 3. The global `$CONFIG_DIR/mdsearch/config.yaml`
//!
//! CLI arguments take precedence over file values; the merge rules live in
//! [`SearchConfig::merge_with_cli`].

use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::search::matcher::QueryOptions;

/// Configuration for one search or replace invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The query string (literal text, or a regex when `use_regex` is set)
    #[serde(default)]
    pub query: String,

    /// Match case exactly instead of the case-insensitive default
    #[serde(default)]
    pub case_sensitive: bool,

    /// Match whole words only (literal mode; ignored when `use_regex` is set)
    #[serde(default)]
    pub whole_word: bool,

    /// Interpret the query as a regular expression
    #[serde(default)]
    pub use_regex: bool,

    /// Include globs; empty means every file in the tree is a candidate
    #[serde(default)]
    pub include: Vec<String>,

    /// Exclude globs; any match vetoes a candidate
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Root directory of the project to search
    pub root_path: PathBuf,

    /// Bytes of context captured on each side of a match preview
    #[serde(default = "default_preview_context")]
    pub preview_context: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_preview_context() -> usize {
    crate::search::processor::PREVIEW_CONTEXT
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl SearchConfig {
    /// The pattern-compilation options this configuration carries
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            use_regex: self.use_regex,
        }
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally layering a specific file on top
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("mdsearch/config.yaml")),
            Some(PathBuf::from(".mdsearch.yaml")),
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments over configuration file values
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        if !cli_config.query.is_empty() {
            self.query = cli_config.query;
        }
        if cli_config.case_sensitive {
            self.case_sensitive = true;
        }
        if cli_config.whole_word {
            self.whole_word = true;
        }
        if cli_config.use_regex {
            self.use_regex = true;
        }
        if !cli_config.include.is_empty() {
            self.include = cli_config.include;
        }
        if !cli_config.exclude.is_empty() {
            self.exclude = cli_config.exclude;
        }
        if cli_config.root_path != PathBuf::from(".") {
            self.root_path = cli_config.root_path;
        }
        if cli_config.preview_context != default_preview_context() {
            self.preview_context = cli_config.preview_context;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
