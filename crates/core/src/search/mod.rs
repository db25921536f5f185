//! Whole-project text search.
//!
//! One search fans out one task per file over the worker pool; every task
//! shares the same immutable query plan (normalized query bytes plus the
//! Horspool skip table) and contributes to a [`CompletionGroup`] that fires
//! the caller's callback exactly once. Match records within a file are
//! ordered by document position; no ordering is guaranteed between files.

pub mod horspool;

use crate::model::TextPosition;
use crate::runtime::{CompletionGroup, WorkerPool};
use horspool::SkipTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

/// One occurrence: the full text of its line and its 0-based position,
/// column counted in characters from the line start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub line_text: String,
    pub position: TextPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSearchResult {
    pub file: PathBuf,
    pub matches: Vec<SearchMatch>,
}

/// Project-wide result: one entry per file with at least one match.
pub type ProjectSearchResult = Vec<FileSearchResult>;

struct QueryPlan {
    needle: Vec<u8>,
    table: SkipTable,
    options: SearchOptions,
}

impl QueryPlan {
    fn new(query: &str, options: SearchOptions) -> Self {
        let mut needle = query.as_bytes().to_vec();
        if !options.case_sensitive {
            needle.make_ascii_lowercase();
        }
        let table = SkipTable::new(&needle);
        Self {
            needle,
            table,
            options,
        }
    }
}

/// Search `files` for `query` in parallel, one task per file.
///
/// `on_done` is invoked exactly once — also for an empty file list — and
/// may run on a worker thread; it must not touch UI-owned state directly.
/// An empty query produces an empty result immediately. Unreadable files
/// contribute nothing.
pub fn find(
    files: Vec<PathBuf>,
    query: &str,
    pool: &WorkerPool,
    options: SearchOptions,
    on_done: impl FnOnce(ProjectSearchResult) + Send + 'static,
) {
    if query.is_empty() {
        on_done(Vec::new());
        return;
    }
    let plan = Arc::new(QueryPlan::new(query, options));
    let group = CompletionGroup::new(files.len(), on_done);
    for file in files {
        let plan = Arc::clone(&plan);
        let group = Arc::clone(&group);
        pool.run(move || {
            let matches = search_in_file(&file, &plan);
            group.complete((!matches.is_empty()).then(|| FileSearchResult { file, matches }));
        });
    }
}

/// Serial variant with identical match-record semantics; file entries
/// appear in submission order.
pub fn find_sync(files: &[PathBuf], query: &str, options: SearchOptions) -> ProjectSearchResult {
    if query.is_empty() {
        return Vec::new();
    }
    let plan = QueryPlan::new(query, options);
    let mut result = Vec::new();
    for file in files {
        let matches = search_in_file(file, &plan);
        if !matches.is_empty() {
            result.push(FileSearchResult {
                file: file.clone(),
                matches,
            });
        }
    }
    result
}

fn search_in_file(path: &Path, plan: &QueryPlan) -> Vec<SearchMatch> {
    match std::fs::read(path) {
        Ok(contents) => search_text(&contents, plan),
        Err(err) => {
            tracing::debug!("skipping unreadable file {}: {}", path.display(), err);
            Vec::new()
        }
    }
}

fn search_text(original: &[u8], plan: &QueryPlan) -> Vec<SearchMatch> {
    let lowered;
    let haystack: &[u8] = if plan.options.case_sensitive {
        original
    } else {
        // ASCII-only folding keeps byte offsets aligned with the original
        // text for line and column math.
        lowered = original.to_ascii_lowercase();
        &lowered
    };

    let mut matches = Vec::new();
    let mut scan_from = 0usize;
    let mut prev_occurrence = 0usize;
    let mut line = 0usize;

    while let Some(at) = horspool::find(haystack, &plan.needle, scan_from, &plan.table) {
        // Amortized line accounting: only the bytes since the previous
        // occurrence are examined, never the whole file again.
        line += count_newlines(&haystack[prev_occurrence..at]);
        prev_occurrence = at;
        scan_from = at + plan.needle.len();

        if plan.options.whole_word && !is_whole_word(haystack, at, plan.needle.len()) {
            continue;
        }

        let (line_start, line_end) = line_span(original, at);
        let line_text = String::from_utf8_lossy(&original[line_start..line_end]).into_owned();
        let column = String::from_utf8_lossy(&original[line_start..at]).chars().count();
        matches.push(SearchMatch {
            line_text,
            position: TextPosition::new(line, column),
        });
    }

    matches
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

fn is_whole_word(text: &[u8], at: usize, len: usize) -> bool {
    let before = at.checked_sub(1).map(|i| text[i]);
    let after = text.get(at + len).copied();
    !before.is_some_and(is_identifier_byte) && !after.is_some_and(is_identifier_byte)
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte range of the line containing `pos`, newline excluded.
fn line_span(text: &[u8], pos: usize) -> (usize, usize) {
    let start = text[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = text[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|i| pos + i)
        .unwrap_or(text.len());
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_of(text: &str, query: &str, options: SearchOptions) -> Vec<SearchMatch> {
        search_text(text.as_bytes(), &QueryPlan::new(query, options))
    }

    #[test]
    fn non_overlapping_occurrences_on_one_line() {
        let found = matches_of("foofoo", "foo", SearchOptions::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].position, TextPosition::new(0, 0));
        assert_eq!(found[1].position, TextPosition::new(0, 3));
        assert_eq!(found[0].line_text, "foofoo");
    }

    #[test]
    fn line_numbers_accumulate_across_matches() {
        let text = "one\ntwo needle\nthree\nneedle at four\n";
        let found = matches_of(text, "needle", SearchOptions::default());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].position, TextPosition::new(1, 4));
        assert_eq!(found[0].line_text, "two needle");
        assert_eq!(found[1].position, TextPosition::new(3, 0));
        assert_eq!(found[1].line_text, "needle at four");
    }

    #[test]
    fn case_insensitive_matches_but_reports_original_line() {
        let found = matches_of("say Hello there", "hello", SearchOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line_text, "say Hello there");
        assert_eq!(found[0].position, TextPosition::new(0, 4));

        let found = matches_of(
            "say Hello there",
            "hello",
            SearchOptions {
                case_sensitive: true,
                ..Default::default()
            },
        );
        assert!(found.is_empty());
    }

    #[test]
    fn whole_word_rejects_embedded_occurrences_but_keeps_scanning() {
        let options = SearchOptions {
            whole_word: true,
            ..Default::default()
        };
        let found = matches_of("concatenate a cat sat", "cat", options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, TextPosition::new(0, 14));
    }

    #[test]
    fn column_is_counted_in_characters() {
        let found = matches_of("héllo foo", "foo", SearchOptions::default());
        assert_eq!(found[0].position, TextPosition::new(0, 6));
    }

    #[test]
    fn line_counting_includes_rejected_occurrences() {
        let options = SearchOptions {
            whole_word: true,
            ..Default::default()
        };
        let found = matches_of("concat\nnothing\ncat\n", "cat", options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, TextPosition::new(2, 0));
    }
}
