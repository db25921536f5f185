//! Identifier caches backing autocomplete.
//!
//! Two layers: per-document symbol sets invalidated by the document's
//! change counter (compared, never timed), and per-language unions over
//! every open document of that language, guarded by a dirty flag plus a
//! minimum-interval clock so rapid keystrokes cannot force a recompute per
//! key.

use crate::config::SuggestConfig;
use crate::error::{CodescoutError, Result};
use crate::model::{Document, DocumentId};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type SymbolSet = HashSet<String>;

static DEFAULT_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(crate::config::DEFAULT_SYMBOL_PATTERN).expect("default symbol pattern"));

struct DocEntry {
    change_id: u64,
    language: String,
    symbols: Arc<SymbolSet>,
}

struct LangEntry {
    symbols: Arc<SymbolSet>,
    dirty: bool,
}

pub struct SymbolCache {
    symbol_re: Regex,
    max_visible: usize,
    update_interval: Duration,
    docs: DashMap<DocumentId, DocEntry>,
    langs: Mutex<HashMap<String, LangEntry>>,
    /// `None` until the first union recompute, which is therefore never
    /// throttled.
    last_recompute: Mutex<Option<Instant>>,
}

impl SymbolCache {
    pub fn new(config: &SuggestConfig) -> Result<Self> {
        let symbol_re = if config.symbol_pattern == crate::config::DEFAULT_SYMBOL_PATTERN {
            DEFAULT_SYMBOL_RE.clone()
        } else {
            Regex::new(&config.symbol_pattern)
                .map_err(|e| CodescoutError::Pattern(format!("{}: {e}", config.symbol_pattern)))?
        };
        Ok(Self {
            symbol_re,
            max_visible: config.max_visible,
            update_interval: Duration::from_millis(config.update_interval_ms),
            docs: DashMap::new(),
            langs: Mutex::new(HashMap::new()),
            last_recompute: Mutex::new(None),
        })
    }

    /// Register a document. Equivalent to a first `document_symbols` call.
    pub fn open_document(&self, doc: &Document) {
        self.document_symbols(doc);
    }

    /// Drop a document's entry; its language union is recomputed lazily.
    /// The union itself is torn down with the last document of a language.
    pub fn close_document(&self, id: DocumentId) {
        let Some((_, removed)) = self.docs.remove(&id) else {
            return;
        };
        let survivors = self
            .docs
            .iter()
            .any(|entry| entry.language == removed.language);
        let mut langs = self.langs.lock().unwrap();
        if survivors {
            if let Some(entry) = langs.get_mut(&removed.language) {
                entry.dirty = true;
            }
        } else {
            langs.remove(&removed.language);
        }
    }

    /// The document's symbol set. The cached `Arc` is returned untouched
    /// while the document's change counter still matches; staleness is
    /// detected by counter comparison only.
    pub fn document_symbols(&self, doc: &Document) -> Arc<SymbolSet> {
        if let Some(entry) = self.docs.get(&doc.id()) {
            if entry.change_id == doc.change_id() {
                return Arc::clone(&entry.symbols);
            }
        }
        let symbols = Arc::new(self.tokenize(doc.text()));
        self.docs.insert(
            doc.id(),
            DocEntry {
                change_id: doc.change_id(),
                language: doc.language().to_string(),
                symbols: Arc::clone(&symbols),
            },
        );
        self.mark_language_dirty(doc.language());
        symbols
    }

    /// Ranked completion candidates for the partial identifier ending at
    /// `cursor` (a byte offset). Synchronous; may run a throttled union
    /// recompute internally.
    pub fn suggestions(&self, doc: &Document, cursor: usize) -> Vec<String> {
        let Some(partial) = self.partial_symbol(doc.text(), cursor) else {
            return Vec::new();
        };
        let doc_symbols = self.document_symbols(doc);
        let lang_symbols = self.language_symbols(doc.language());

        let mut candidates: Vec<&str> = doc_symbols
            .iter()
            .chain(lang_symbols.iter())
            .map(String::as_str)
            .filter(|s| s.starts_with(&partial) && *s != partial)
            .collect();
        candidates.sort_by(|a, b| a.len().cmp(&b.len()).then(a.cmp(b)));
        candidates.dedup();
        candidates.truncate(self.max_visible);
        candidates.into_iter().map(str::to_string).collect()
    }

    /// The partial identifier immediately preceding `cursor`: scans
    /// backward while characters belong to the symbol alphabet.
    pub fn partial_symbol(&self, text: &str, cursor: usize) -> Option<String> {
        let mut cursor = cursor.min(text.len());
        while cursor > 0 && !text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        let start = text[..cursor]
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_symbol_char(*c))
            .last()
            .map(|(i, _)| i)?;
        Some(text[start..cursor].to_string())
    }

    /// Union of symbols over every open document of `language`. Recomputed
    /// when dirty, at most once per configured interval; between
    /// recomputes the previous union is served.
    fn language_symbols(&self, language: &str) -> Arc<SymbolSet> {
        let mut langs = self.langs.lock().unwrap();
        let entry = langs.entry(language.to_string()).or_insert_with(|| LangEntry {
            symbols: Arc::new(SymbolSet::new()),
            dirty: true,
        });
        if entry.dirty {
            let mut last = self.last_recompute.lock().unwrap();
            let due = last.map_or(true, |at| at.elapsed() >= self.update_interval);
            if due {
                let mut union = SymbolSet::new();
                for doc in self.docs.iter() {
                    if doc.language == language {
                        union.extend(doc.symbols.iter().cloned());
                    }
                }
                entry.symbols = Arc::new(union);
                entry.dirty = false;
                *last = Some(Instant::now());
            }
        }
        Arc::clone(&entry.symbols)
    }

    fn mark_language_dirty(&self, language: &str) {
        let mut langs = self.langs.lock().unwrap();
        if let Some(entry) = langs.get_mut(language) {
            entry.dirty = true;
        }
    }

    fn tokenize(&self, text: &str) -> SymbolSet {
        self.symbol_re
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
