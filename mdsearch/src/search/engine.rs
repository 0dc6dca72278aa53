//! Project-wide search orchestration.
//!
//! The scan is sequential by design: one file is read and matched at a
//! time, with suspension only at the read boundary. This keeps file-handle
//! pressure flat, makes progress reporting trivial, and guarantees that
//! result ordering follows the tree's own traversal order.

use tracing::{debug, info};

use super::matcher::CompiledPattern;
use super::processor::scan_file;
use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::filters::{filter_candidates, GlobFilter};
use crate::host::FileHost;
use crate::results::ProjectSearchResult;
use crate::tree::{flatten, FileNode};

/// Searches every candidate file in the tree for the configured query.
///
/// Validation happens before any file is read: an empty query surfaces
/// [`SearchError::EmptyQuery`], and a malformed pattern or glob surfaces
/// [`SearchError::InvalidPattern`] with no partial results.
pub async fn search(
    host: &dyn FileHost,
    tree: &[FileNode],
    config: &SearchConfig,
) -> SearchResult<ProjectSearchResult> {
    search_with_progress(host, tree, config, |_, _| {}).await
}

/// Like [`search`], invoking `on_progress(current, total)` before each file.
pub async fn search_with_progress<F>(
    host: &dyn FileHost,
    tree: &[FileNode],
    config: &SearchConfig,
    mut on_progress: F,
) -> SearchResult<ProjectSearchResult>
where
    F: FnMut(usize, usize),
{
    let query = config.query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    info!("Starting project search for {:?}", query);

    let pattern = CompiledPattern::compile(query, config.query_options())?;
    let include = GlobFilter::compile(&config.include)?;
    let exclude = GlobFilter::compile(&config.exclude)?;

    let candidates = filter_candidates(flatten(tree), &include, &exclude);
    debug!("{} candidate files after filtering", candidates.len());

    let total = candidates.len();
    let mut result = ProjectSearchResult::new();
    for (i, file) in candidates.iter().enumerate() {
        on_progress(i + 1, total);
        let file_result = scan_file(host, file, &pattern, config.preview_context).await;
        result.add_file_result(file_result);
    }

    info!(
        "Search complete: {} matches in {} of {} files",
        result.total_matches, result.files_with_matches, result.files_scanned
    );

    Ok(result)
}
