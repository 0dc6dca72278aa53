//! Include/exclude path filtering over glob patterns.
//!
//! Glob semantics: `**` matches any sequence including `/`, a single `*`
//! matches within one path segment, `?` matches exactly one non-separator
//! character, and every other metacharacter is matched literally. Patterns
//! are anchored: a glob must match the whole normalized relative path, not a
//! substring of it.

use regex::Regex;

use crate::errors::{SearchError, SearchResult};
use crate::tree::FileDescriptor;

/// Splits a comma/whitespace-separated glob list into its patterns
pub fn parse_glob_list(input: &str) -> Vec<String> {
    input
        .split([',', ' ', '\t', '\n', '\r'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes path separators to `/` so patterns match on every platform
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Translates one glob into an anchored path-matching regex
fn glob_to_regex(glob: &str) -> SearchResult<Regex> {
    let normalized = normalize_path(glob);
    let mut source = String::with_capacity(normalized.len() + 2);
    source.push('^');

    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    source.push_str(".*");
                } else {
                    source.push_str("[^/]*");
                }
            }
            '?' => source.push_str("[^/]"),
            '/' => source.push('/'),
            _ => source.push_str(&regex::escape(&c.to_string())),
        }
    }
    source.push('$');

    Regex::new(&source)
        .map_err(|e| SearchError::invalid_pattern(format!("glob '{}': {}", glob, e)))
}

/// Ordered list of compiled path matchers derived from glob strings.
///
/// An empty filter matches nothing by itself; the include/exclude decision
/// for empty filters lives in [`filter_candidates`].
#[derive(Debug, Default)]
pub struct GlobFilter {
    patterns: Vec<Regex>,
}

impl GlobFilter {
    /// Compiles a list of glob strings into a filter
    pub fn compile(globs: &[String]) -> SearchResult<Self> {
        let patterns = globs
            .iter()
            .map(|g| glob_to_regex(g))
            .collect::<SearchResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Compiles a single comma/whitespace-separated glob list
    pub fn parse(input: &str) -> SearchResult<Self> {
        Self::compile(&parse_glob_list(input))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches the normalized relative path
    pub fn matches(&self, relative_path: &str) -> bool {
        let normalized = normalize_path(relative_path);
        self.patterns.iter().any(|p| p.is_match(&normalized))
    }
}

/// Applies include/exclude filtering to candidate files.
///
/// A file passes when the include filter is empty or matches its relative
/// path, and the exclude filter does not match it. Candidate order is
/// preserved so repeated searches over an unchanged tree produce the same
/// result ordering.
pub fn filter_candidates(
    files: Vec<FileDescriptor>,
    include: &GlobFilter,
    exclude: &GlobFilter,
) -> Vec<FileDescriptor> {
    files
        .into_iter()
        .filter(|file| {
            let pass_include = include.is_empty() || include.matches(&file.relative_path);
            let hit_exclude = !exclude.is_empty() && exclude.matches(&file.relative_path);
            pass_include && !hit_exclude
        })
        .collect()
}
