//! Query compilation and buffer-level matching.
//!
//! A [`CompiledPattern`] is immutable and holds no match-cursor state:
//! `regex::Regex` is stateless between calls, and the scan position is an
//! explicit cursor value passed to [`CompiledPattern::find_from`], so a
//! pattern can never leak match progress from one document into the next.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};
use crate::results::MatchSpan;

/// Compiled patterns reused across searches with identical query + options
static PATTERN_CACHE: Lazy<DashMap<String, Arc<Regex>>> = Lazy::new(DashMap::new);

/// How a query string is interpreted.
///
/// `whole_word` only applies to literal-mode compilation; when `use_regex`
/// is set it is ignored, since boundary placement is then up to the user's
/// own pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub use_regex: bool,
}

/// An immutable find-all matcher bound to one `(query, options)` pair
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Arc<Regex>,
}

impl CompiledPattern {
    /// Compiles a user query under the given options.
    ///
    /// Literal mode escapes every regex metacharacter, then wraps the
    /// escaped text in word-boundary assertions when `whole_word` is set.
    /// Regex mode compiles the query verbatim; user capture groups are
    /// permitted and ignored, only the whole match is used. Both modes
    /// compile case-insensitively unless `case_sensitive` is set.
    pub fn compile(query: &str, options: QueryOptions) -> SearchResult<Self> {
        let source = if options.use_regex {
            query.to_string()
        } else {
            let escaped = regex::escape(query);
            if options.whole_word {
                format!(r"\b{}\b", escaped)
            } else {
                escaped
            }
        };

        let key = format!(
            "{}:{}",
            if options.case_sensitive { "cs" } else { "ci" },
            source
        );
        if let Some(cached) = PATTERN_CACHE.get(&key) {
            debug!("Pattern cache hit for {:?}", query);
            return Ok(Self {
                regex: Arc::clone(&cached),
            });
        }

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
        let regex = Arc::new(regex);
        PATTERN_CACHE.insert(key, Arc::clone(&regex));

        Ok(Self { regex })
    }

    /// The final regex source this pattern compiled to
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Finds the next match starting at or after `at`.
    ///
    /// This is the explicit find-next cursor step; callers own the cursor
    /// and decide how far to advance it.
    pub fn find_from(&self, content: &str, at: usize) -> Option<MatchSpan> {
        if at > content.len() {
            return None;
        }
        self.regex.find_at(content, at).map(|m| MatchSpan {
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
        })
    }

    /// Finds every non-overlapping match in ascending offset order.
    ///
    /// Zero-width guard: when a match does not move the cursor forward, the
    /// cursor is force-advanced by one character so patterns that admit
    /// empty matches terminate after a bounded number of steps.
    pub fn find_spans(&self, content: &str) -> Vec<MatchSpan> {
        let mut spans = Vec::new();
        let mut cursor = 0;
        while cursor <= content.len() {
            let Some(span) = self.find_from(content, cursor) else {
                break;
            };
            cursor = if span.end > span.start {
                span.end
            } else {
                advance_one(content, span.end)
            };
            spans.push(span);
        }
        spans
    }

    /// Replaces every match with `replacement` in a single forward pass,
    /// returning the rewritten content together with the match count.
    ///
    /// The replacement text is inserted verbatim: `$1` and friends are never
    /// expanded as backreferences.
    pub fn replace_all(&self, content: &str, replacement: &str) -> (String, usize) {
        let spans = self.find_spans(content);
        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        for span in &spans {
            output.push_str(&content[last..span.start]);
            output.push_str(replacement);
            last = span.end;
        }
        output.push_str(&content[last..]);
        (output, spans.len())
    }
}

/// Next char boundary strictly after `at` (or one past the end)
fn advance_one(content: &str, at: usize) -> usize {
    content[at..]
        .chars()
        .next()
        .map_or(at + 1, |c| at + c.len_utf8())
}
