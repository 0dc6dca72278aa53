//! Error types for search and replace operations.
//!
//! Compilation failures (`EmptyQuery`, `NoRoot`, `InvalidPattern`) are fatal
//! to the invocation that raised them and surface before any file is read.
//! Per-file I/O failures (`FileAccess`) are recovered at the scan/replace
//! layer: the file contributes no matches or zero replacements, and the
//! operation continues.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for search and replace operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search and replace operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("No project root is open")]
    NoRoot,
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Match span {start}..{end} is no longer valid for {path}")]
    StaleSpan {
        path: PathBuf,
        start: usize,
        end: usize,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn stale_span(path: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self::StaleSpan {
            path: path.into(),
            start,
            end,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
