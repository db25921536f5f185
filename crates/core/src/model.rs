//! Shared value types for the indexing and search engine.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// 0-based position inside a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

pub type DocumentId = u64;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// In-memory text document with a monotonic change counter.
///
/// Every mutation advances `change_id`; caches compare the counter against
/// the value they captured to detect staleness. Counters are never reused
/// within a document's lifetime and never move backwards. Documents are
/// deliberately not `Clone`: caches key on the id, which names one live
/// document.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    language: String,
    text: String,
    change_id: u64,
}

impl Document {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            language: language.into(),
            text: text.into(),
            change_id: 0,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn change_id(&self) -> u64 {
        self.change_id
    }

    /// Replace the whole document content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.change_id += 1;
    }

    /// Insert `content` at a byte offset. Offsets past the end append.
    pub fn insert(&mut self, offset: usize, content: &str) {
        let at = offset.min(self.text.len());
        self.text.insert_str(at, content);
        self.change_id += 1;
    }

    /// Byte offset of a 0-based (line, column) position, column counted in
    /// characters. Returns `None` when the line does not exist.
    pub fn offset_at(&self, line: usize, column: usize) -> Option<usize> {
        let mut start = 0usize;
        for _ in 0..line {
            start += self.text[start..].find('\n')? + 1;
        }
        let line_end = self.text[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.text.len());
        let mut offset = start;
        let mut chars = 0usize;
        for c in self.text[start..line_end].chars() {
            if chars == column {
                break;
            }
            offset += c.len_utf8();
            chars += 1;
        }
        Some(offset)
    }
}
