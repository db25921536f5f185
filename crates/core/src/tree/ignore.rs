use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};

/// Compiled exclusion rules for one directory.
///
/// A directory that carries its own rule file replaces the matcher
/// inherited from its ancestors, for itself and everything below it. Rules
/// are evaluated against paths relative to the defining directory.
pub struct IgnoreMatcher {
    base: PathBuf,
    rules: Gitignore,
}

impl IgnoreMatcher {
    /// Load `<dir>/<file_name>` if it exists. A rule file that fails to
    /// parse entirely yields no matcher; partially invalid files keep their
    /// valid lines.
    pub fn load(dir: &Path, file_name: &str) -> Option<Self> {
        let rule_file = dir.join(file_name);
        if !rule_file.is_file() {
            return None;
        }
        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(&rule_file) {
            tracing::debug!("ignore rules at {}: {}", rule_file.display(), err);
        }
        match builder.build() {
            Ok(rules) => Some(Self {
                base: dir.to_path_buf(),
                rules,
            }),
            Err(err) => {
                tracing::debug!("ignore rules at {}: {}", rule_file.display(), err);
                None
            }
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether an absolute path inside this matcher's subtree is excluded.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        self.rules.matched(path, is_dir).is_ignore()
    }
}
