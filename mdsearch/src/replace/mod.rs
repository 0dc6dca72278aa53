//! Position-consistent replacement over single spans, single files, and the
//! whole project.
//!
//! The core correctness invariant lives in [`replace_in_file`]: within one
//! file, every match is substituted by a single forward pass over the
//! content, never by splicing stored offsets one at a time. Offsets computed
//! against pre-replacement content are invalid the moment the first
//! substitution changes the document's length.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::errors::{SearchError, SearchResult};
use crate::host::FileHost;
use crate::results::{MatchSpan, ProjectSearchResult};
use crate::search::matcher::{CompiledPattern, QueryOptions};
use crate::search::search;
use crate::tree::FileNode;

/// Aggregate outcome of a project-wide replacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSummary {
    pub files_changed: usize,
    pub total_replaced: usize,
}

/// Replaces one previously found match, returning the updated content.
///
/// The file is re-read first; if the span no longer lies on the recorded
/// text (the file changed on disk since the search), the replacement is
/// refused with [`SearchError::StaleSpan`] instead of corrupting unrelated
/// content.
pub async fn replace_span(
    host: &dyn FileHost,
    path: &Path,
    span: &MatchSpan,
    replacement: &str,
) -> SearchResult<String> {
    let content = host.read_file(path).await?;

    let valid = span.start <= span.end
        && span.end <= content.len()
        && content.is_char_boundary(span.start)
        && content.is_char_boundary(span.end)
        && content[span.start..span.end] == span.text;
    if !valid {
        return Err(SearchError::stale_span(path, span.start, span.end));
    }

    let mut updated =
        String::with_capacity(content.len() - span.text.len() + replacement.len());
    updated.push_str(&content[..span.start]);
    updated.push_str(replacement);
    updated.push_str(&content[span.end..]);

    host.write_file(path, &updated).await?;
    Ok(updated)
}

/// Replaces every match of the pattern in one file.
///
/// Content is re-read from the host rather than reusing content from a
/// prior search, so the substitution always runs against what is currently
/// on disk. When the rewritten content equals the original (zero matches,
/// or matches that replace to themselves), no write is performed and 0 is
/// returned.
pub async fn replace_in_file(
    host: &dyn FileHost,
    path: &Path,
    pattern: &CompiledPattern,
    replacement: &str,
) -> SearchResult<usize> {
    let content = host.read_file(path).await?;
    let (updated, count) = pattern.replace_all(&content, replacement);
    if updated == content {
        return Ok(0);
    }
    host.write_file(path, &updated).await?;
    Ok(count)
}

/// Applies a replacement across every file in a result set, in order.
///
/// A failure on one file is logged and counted as zero replacements for
/// that file; the coordinator continues with the rest. Callers should
/// follow up with a fresh search, since the result set's offsets are stale
/// once anything was replaced.
pub async fn replace_across_project(
    host: &dyn FileHost,
    results: &ProjectSearchResult,
    pattern: &CompiledPattern,
    replacement: &str,
) -> ReplaceSummary {
    let mut summary = ReplaceSummary::default();
    for file_result in &results.file_results {
        match replace_in_file(host, &file_result.path, pattern, replacement).await {
            Ok(0) => {}
            Ok(count) => {
                summary.files_changed += 1;
                summary.total_replaced += count;
            }
            Err(e) => {
                warn!(
                    "Replacement failed for {}: {}",
                    file_result.path.display(),
                    e
                );
            }
        }
    }
    summary
}

/// Host-facing operation: replace every match of a query in one file
pub async fn replace_all_in_file(
    host: &dyn FileHost,
    path: &Path,
    query: &str,
    options: QueryOptions,
    replacement: &str,
) -> SearchResult<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let pattern = CompiledPattern::compile(query, options)?;
    replace_in_file(host, path, &pattern, replacement).await
}

/// Host-facing operation: replace every match of a query across a result set
pub async fn replace_all_in_project(
    host: &dyn FileHost,
    results: &ProjectSearchResult,
    query: &str,
    options: QueryOptions,
    replacement: &str,
) -> SearchResult<ReplaceSummary> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let pattern = CompiledPattern::compile(query, options)?;
    Ok(replace_across_project(host, results, &pattern, replacement).await)
}

/// Searches, replaces across the whole project, then searches again.
///
/// The trailing search is not an optimization opportunity: offsets in the
/// pre-replacement result set are stale, so the engine always hands back a
/// fresh result set instead of patching the old one.
pub async fn replace_and_rescan(
    host: &dyn FileHost,
    tree: &[FileNode],
    config: &SearchConfig,
    replacement: &str,
) -> SearchResult<(ReplaceSummary, ProjectSearchResult)> {
    let results = search(host, tree, config).await?;
    let summary = replace_all_in_project(
        host,
        &results,
        &config.query,
        config.query_options(),
        replacement,
    )
    .await?;

    info!(
        "Replaced {} matches in {} files",
        summary.total_replaced, summary.files_changed
    );

    let fresh = search(host, tree, config).await?;
    Ok((summary, fresh))
}
