//! Query compilation, per-file scanning, and project-wide search.

pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::{search, search_with_progress};
pub use matcher::{CompiledPattern, QueryOptions};
pub use processor::scan_file;
