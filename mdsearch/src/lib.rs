//! Project-wide find/replace engine for Markdown workspaces.
//!
//! Given a host-supplied file tree, the engine locates every occurrence of
//! a query (literal or regex, optionally case-sensitive / whole-word)
//! across an include/exclude-filtered set of files, reports 1-based
//! line/column positions with context previews, and performs
//! position-consistent replacement over one span, one file, or the whole
//! matched set. All file I/O flows through the [`host::FileHost`] boundary.

pub mod config;
pub mod errors;
pub mod filters;
pub mod host;
pub mod position;
pub mod replace;
pub mod results;
pub mod search;
pub mod tree;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use host::{open_project, FileHost, LocalFileHost};
pub use replace::{
    replace_all_in_file, replace_all_in_project, replace_and_rescan, replace_span,
    ReplaceSummary,
};
pub use results::{FileMatchResult, LocatedMatch, MatchSpan, Preview, ProjectSearchResult};
pub use search::{search, search_with_progress, CompiledPattern, QueryOptions};
pub use tree::{flatten, FileDescriptor, FileNode, NodeKind};
