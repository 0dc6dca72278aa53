//! Search result types: match spans, located matches, and the aggregate
//! per-project result set.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A half-open offset interval `[start, end)` identifying one pattern
/// occurrence in a document.
///
/// Offsets are byte positions into the document content. `text` carries the
/// matched slice so a later single-span replacement can detect that the file
/// has changed on disk since the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Bounded context window around a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub before: String,
    pub hit: String,
    pub after: String,
}

/// A match span enriched with its 1-based line/column position and a
/// context preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedMatch {
    pub span: MatchSpan,
    pub line: usize,
    pub column: usize,
    pub preview: Preview,
}

/// All matches found in a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatchResult {
    pub path: PathBuf,
    pub relative_path: String,
    pub matches: Vec<LocatedMatch>,
}

/// The aggregate, ordered result set for one search invocation.
///
/// Created fresh per search and superseded, never mutated, by the next
/// search or by the re-scan that follows a replacement. Files with zero
/// matches are counted in `files_scanned` but omitted from `file_results`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSearchResult {
    pub file_results: Vec<FileMatchResult>,
    pub total_matches: usize,
    pub files_with_matches: usize,
    pub files_scanned: usize,
}

impl ProjectSearchResult {
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds one file's scan outcome into the aggregate
    pub fn add_file_result(&mut self, file_result: FileMatchResult) {
        self.files_scanned += 1;
        if !file_result.matches.is_empty() {
            self.total_matches += file_result.matches.len();
            self.files_with_matches += 1;
            self.file_results.push(file_result);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(start: usize, end: usize, text: &str) -> LocatedMatch {
        LocatedMatch {
            span: MatchSpan {
                start,
                end,
                text: text.to_string(),
            },
            line: 1,
            column: start + 1,
            preview: Preview {
                before: String::new(),
                hit: text.to_string(),
                after: String::new(),
            },
        }
    }

    #[test]
    fn test_add_file_result_with_matches() {
        let mut result = ProjectSearchResult::new();
        result.add_file_result(FileMatchResult {
            path: PathBuf::from("/p/a.md"),
            relative_path: "a.md".to_string(),
            matches: vec![located(0, 5, "hello"), located(6, 11, "hello")],
        });

        assert_eq!(result.total_matches, 2);
        assert_eq!(result.files_with_matches, 1);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.file_results.len(), 1);
    }

    #[test]
    fn test_zero_match_files_are_omitted() {
        let mut result = ProjectSearchResult::new();
        result.add_file_result(FileMatchResult {
            path: PathBuf::from("/p/empty.md"),
            relative_path: "empty.md".to_string(),
            matches: vec![],
        });

        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.files_with_matches, 0);
        assert!(result.file_results.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_order_follows_insertion() {
        let mut result = ProjectSearchResult::new();
        for name in ["b.md", "a.md", "c.md"] {
            result.add_file_result(FileMatchResult {
                path: PathBuf::from(name),
                relative_path: name.to_string(),
                matches: vec![located(0, 1, "x")],
            });
        }

        let order: Vec<_> = result
            .file_results
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(order, ["b.md", "a.md", "c.md"]);
    }
}
