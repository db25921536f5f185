//! Project directory indexer.
//!
//! `ProjectTree` owns the scanned index of a project root. Scans run on the
//! worker pool and build a complete fresh [`TreeSnapshot`] off to the side,
//! then swap it in atomically: readers clone the current `Arc` and keep a
//! consistent version for the whole query, even across a concurrent
//! re-scan. Lookups before the first scan completes see an empty snapshot,
//! so `is_file_in_tree`/`is_dir_in_tree` return false negatives until
//! `is_ready()` reports true; that is expected, not a bug.

pub mod fuzzy;
pub mod ignore;
pub mod pattern;
mod scanner;

pub use pattern::NamePattern;
pub use scanner::ScanOptions;

use crate::runtime::WorkerPool;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// One locate-query result: a file path and its basename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    pub path: PathBuf,
    pub name: String,
}

/// Immutable result of one completed scan.
///
/// `files` and `names` are index-aligned: `names[i]` is the basename of
/// `files[i]`. `directories` always contains the root itself.
#[derive(Debug, Clone)]
pub struct TreeSnapshot {
    root: PathBuf,
    directories: Vec<PathBuf>,
    files: Vec<PathBuf>,
    names: Vec<String>,
}

impl TreeSnapshot {
    fn empty(root: PathBuf) -> Self {
        Self {
            directories: vec![root.clone()],
            files: Vec::new(),
            names: Vec::new(),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn files_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_file_in_tree(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }

    pub fn is_dir_in_tree(&self, path: &Path) -> bool {
        self.directories.iter().any(|d| d == path)
    }

    /// The first `max` entries in index order; pre-populates a locate view
    /// before the user has typed anything.
    pub fn head(&self, max: usize) -> Vec<FileMatch> {
        self.entry_iter().take(max).collect()
    }

    /// Case-insensitive substring lookup over basenames, preserving index
    /// order, stopping once `max` results are found.
    pub fn match_tree(&self, query: &str, max: usize) -> Vec<FileMatch> {
        let needle = query.to_lowercase();
        self.entry_iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .take(max)
            .collect()
    }

    /// Fuzzy-ranked lookup over basenames: every name is scored, results
    /// are ordered by descending score with ties kept in index order, and
    /// truncated to `max`. An empty query yields the first `max` entries in
    /// index order.
    pub fn fuzzy_match_tree(&self, query: &str, max: usize) -> Vec<FileMatch> {
        let mut scored: Vec<(i32, usize)> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| (fuzzy::fuzzy_score(name, query), i))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(max)
            .map(|(_, i)| FileMatch {
                path: self.files[i].clone(),
                name: self.names[i].clone(),
            })
            .collect()
    }

    fn entry_iter(&self) -> impl Iterator<Item = FileMatch> + '_ {
        self.files
            .iter()
            .zip(self.names.iter())
            .map(|(path, name)| FileMatch {
                path: path.clone(),
                name: name.clone(),
            })
    }
}

/// Asynchronously scanned, atomically swapped index of a project root.
pub struct ProjectTree {
    root: PathBuf,
    pool: Arc<WorkerPool>,
    current: RwLock<Arc<TreeSnapshot>>,
    ready: AtomicBool,
}

impl ProjectTree {
    pub fn new(root: impl Into<PathBuf>, pool: Arc<WorkerPool>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self {
            current: RwLock::new(Arc::new(TreeSnapshot::empty(root.clone()))),
            root,
            pool,
            ready: AtomicBool::new(false),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether at least one scan has completed since construction.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// A consistent view of the index (cheap `Arc` clone). Empty until the
    /// first scan completes.
    pub fn snapshot(&self) -> Arc<TreeSnapshot> {
        self.current.read().unwrap().clone()
    }

    /// Scan the root on the worker pool. The new snapshot replaces the
    /// current one only once fully populated; `on_complete` then runs on
    /// the worker thread with the new snapshot. Scans never fail; paths
    /// that cannot be read are simply absent from the result.
    pub fn scan(
        self: &Arc<Self>,
        options: ScanOptions,
        on_complete: impl FnOnce(Arc<TreeSnapshot>) + Send + 'static,
    ) {
        let tree = Arc::clone(self);
        self.pool.run(move || {
            tracing::debug!("scanning {}", tree.root.display());
            let output = scanner::scan_root(&tree.root, &options);
            let snapshot = Arc::new(TreeSnapshot {
                root: tree.root.clone(),
                directories: output.directories,
                files: output.files,
                names: output.names,
            });
            *tree.current.write().unwrap() = Arc::clone(&snapshot);
            tree.ready.store(true, Ordering::Release);
            tracing::debug!(
                "scan of {} complete: {} files, {} directories",
                tree.root.display(),
                snapshot.files_count(),
                snapshot.directories().len()
            );
            on_complete(snapshot);
        });
    }

    pub fn files_count(&self) -> usize {
        self.snapshot().files_count()
    }

    /// False negatives before the first scan completes are expected.
    pub fn is_file_in_tree(&self, path: &Path) -> bool {
        self.snapshot().is_file_in_tree(path)
    }

    /// False negatives before the first scan completes are expected.
    pub fn is_dir_in_tree(&self, path: &Path) -> bool {
        self.snapshot().is_dir_in_tree(path)
    }

    pub fn match_tree(&self, query: &str, max: usize) -> Vec<FileMatch> {
        self.snapshot().match_tree(query, max)
    }

    pub fn fuzzy_match_tree(&self, query: &str, max: usize) -> Vec<FileMatch> {
        self.snapshot().fuzzy_match_tree(query, max)
    }

    /// `match_tree` on the worker pool; the callback runs on a worker
    /// thread against the snapshot current at execution time.
    pub fn async_match_tree(
        self: &Arc<Self>,
        query: impl Into<String>,
        max: usize,
        on_result: impl FnOnce(Vec<FileMatch>) + Send + 'static,
    ) {
        let tree = Arc::clone(self);
        let query = query.into();
        self.pool
            .run(move || on_result(tree.match_tree(&query, max)));
    }

    /// `fuzzy_match_tree` on the worker pool; same delivery contract as
    /// [`ProjectTree::async_match_tree`].
    pub fn async_fuzzy_match_tree(
        self: &Arc<Self>,
        query: impl Into<String>,
        max: usize,
        on_result: impl FnOnce(Vec<FileMatch>) + Send + 'static,
    ) {
        let tree = Arc::clone(self);
        let query = query.into();
        self.pool
            .run(move || on_result(tree.fuzzy_match_tree(&query, max)));
    }
}
