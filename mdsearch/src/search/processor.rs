//! Per-file match scanning.

use tracing::{trace, warn};

use super::matcher::CompiledPattern;
use crate::host::FileHost;
use crate::position::LineIndex;
use crate::results::{FileMatchResult, LocatedMatch, Preview};
use crate::tree::FileDescriptor;

/// Context window, in bytes, on each side of a match preview
pub const PREVIEW_CONTEXT: usize = 24;

/// Scans one candidate file for matches.
///
/// Content is fetched through the host; a read failure is logged and yields
/// an empty result so a single unreadable file never aborts the project
/// scan.
pub async fn scan_file(
    host: &dyn FileHost,
    file: &FileDescriptor,
    pattern: &CompiledPattern,
    preview_context: usize,
) -> FileMatchResult {
    trace!("Scanning {}", file.path.display());

    let content = match host.read_file(&file.path).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Skipping {}: {}", file.path.display(), e);
            return FileMatchResult {
                path: file.path.clone(),
                relative_path: file.relative_path.clone(),
                matches: vec![],
            };
        }
    };

    FileMatchResult {
        path: file.path.clone(),
        relative_path: file.relative_path.clone(),
        matches: locate_matches(&content, pattern, preview_context),
    }
}

/// Runs the pattern over one document, enriching each span with line/column
/// and a bounded preview. Matches come back in ascending offset order from
/// the single forward scan.
pub fn locate_matches(
    content: &str,
    pattern: &CompiledPattern,
    preview_context: usize,
) -> Vec<LocatedMatch> {
    let index = LineIndex::new(content);
    pattern
        .find_spans(content)
        .into_iter()
        .map(|span| {
            let (line, column) = index.location(span.start);
            let preview = build_preview(content, span.start, span.end, preview_context);
            LocatedMatch {
                span,
                line,
                column,
                preview,
            }
        })
        .collect()
}

/// Slices the `{before, hit, after}` window around a match.
///
/// Window edges are snapped inward to char boundaries, so multi-byte
/// content cannot split a codepoint and the window never exceeds its
/// nominal size.
fn build_preview(content: &str, start: usize, end: usize, window: usize) -> Preview {
    let before_start = snap_forward(content, start.saturating_sub(window));
    let after_end = snap_backward(content, (end + window).min(content.len()));
    Preview {
        before: content[before_start..start].to_string(),
        hit: content[start..end].to_string(),
        after: content[end..after_end].to_string(),
    }
}

fn snap_forward(content: &str, mut at: usize) -> usize {
    while at < content.len() && !content.is_char_boundary(at) {
        at += 1;
    }
    at
}

fn snap_backward(content: &str, mut at: usize) -> usize {
    while !content.is_char_boundary(at) {
        at -= 1;
    }
    at
}
