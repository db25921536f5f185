use super::ignore::IgnoreMatcher;
use super::pattern::NamePattern;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub struct ScanOptions {
    /// Accepted basename patterns; an empty list accepts every file.
    pub accepted_patterns: Vec<NamePattern>,
    /// Name of the per-directory exclusion rule file.
    pub ignore_file: String,
    /// Skip dot-files and dot-directories.
    pub ignore_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            accepted_patterns: Vec::new(),
            ignore_file: crate::config::DEFAULT_IGNORE_FILE.to_string(),
            ignore_hidden: false,
        }
    }
}

impl ScanOptions {
    pub fn from_config(config: &crate::config::ScanConfig) -> crate::Result<Self> {
        Ok(Self {
            accepted_patterns: NamePattern::compile_all(&config.accepted_patterns)?,
            ignore_file: config.ignore_file.clone(),
            ignore_hidden: config.ignore_hidden,
        })
    }
}

pub(crate) struct ScanOutput {
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub names: Vec<String>,
}

/// Walk `root`, honoring the hidden policy, accepted-name patterns, and
/// per-directory exclusion rules. Unreadable entries are skipped; the walk
/// itself never fails.
pub(crate) fn scan_root(root: &Path, options: &ScanOptions) -> ScanOutput {
    let mut walker = Walker {
        options,
        output: ScanOutput {
            directories: vec![root.to_path_buf()],
            files: Vec::new(),
            names: Vec::new(),
        },
    };
    let mut visiting = HashSet::new();
    if let Ok(canonical) = fs::canonicalize(root) {
        visiting.insert(canonical);
    }
    let root_matcher = IgnoreMatcher::load(root, &options.ignore_file);
    walker.walk(root, root_matcher.as_ref(), &mut visiting);
    walker.output
}

struct Walker<'a> {
    options: &'a ScanOptions,
    output: ScanOutput,
}

impl Walker<'_> {
    fn walk(&mut self, dir: &Path, active: Option<&IgnoreMatcher>, visiting: &mut HashSet<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!("skipping unreadable directory {}: {}", dir.display(), err);
                return;
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();

        for name in names {
            if self.options.ignore_hidden && name.starts_with('.') {
                continue;
            }
            // Rule files configure the scan; they are not themselves indexed.
            if name == self.options.ignore_file {
                continue;
            }
            let path = dir.join(&name);
            let Ok(file_type) = fs::symlink_metadata(&path).map(|m| m.file_type()) else {
                continue;
            };

            let is_dir = if file_type.is_symlink() {
                fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
            } else {
                file_type.is_dir()
            };

            if let Some(matcher) = active {
                if matcher.is_excluded(&path, is_dir) {
                    continue;
                }
            }

            if is_dir {
                self.enter_directory(&path, file_type.is_symlink(), active, visiting);
            } else if file_type.is_file() || file_type.is_symlink() {
                if self.accepts(&name) {
                    self.output.files.push(path);
                    self.output.names.push(name);
                }
            }
        }
    }

    fn enter_directory(
        &mut self,
        path: &Path,
        is_link: bool,
        inherited: Option<&IgnoreMatcher>,
        visiting: &mut HashSet<PathBuf>,
    ) {
        let canonical = match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(err) => {
                tracing::debug!("skipping unresolvable directory {}: {}", path.display(), err);
                return;
            }
        };
        // Cycle guard: a link whose target is an ancestor currently being
        // visited would recurse forever.
        if is_link && visiting.contains(&canonical) {
            return;
        }
        if !visiting.insert(canonical.clone()) {
            return;
        }

        self.output.directories.push(path.to_path_buf());
        let own = IgnoreMatcher::load(path, &self.options.ignore_file);
        self.walk(path, own.as_ref().or(inherited), visiting);

        visiting.remove(&canonical);
    }

    fn accepts(&self, name: &str) -> bool {
        self.options.accepted_patterns.is_empty()
            || self.options.accepted_patterns.iter().any(|p| p.matches(name))
    }
}
