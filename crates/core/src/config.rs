//! Project-level configuration.
//!
//! An optional `.codescout.json` at the project root overrides the
//! defaults. A missing file means defaults; a malformed one is an error so
//! a typo never silently degrades into a full unfiltered scan.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".codescout.json";

pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";
pub const DEFAULT_SYMBOL_PATTERN: &str = "[A-Za-z_][A-Za-z0-9_]*";
pub const DEFAULT_SUGGESTIONS_MAX_VISIBLE: usize = 8;
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Accepted basename patterns; empty accepts every file.
    pub accepted_patterns: Vec<String>,
    /// Name of the per-directory exclusion rule file.
    pub ignore_file: String,
    /// Skip dot-files and dot-directories during the walk.
    pub ignore_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            accepted_patterns: Vec::new(),
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            ignore_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Regex matched repeatedly over document text to extract symbols.
    pub symbol_pattern: String,
    /// Upper bound on returned suggestions.
    pub max_visible: usize,
    /// Minimum interval between language-cache recomputes, in milliseconds.
    pub update_interval_ms: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            symbol_pattern: DEFAULT_SYMBOL_PATTERN.to_string(),
            max_visible: DEFAULT_SUGGESTIONS_MAX_VISIBLE,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub scan: ScanConfig,
    pub suggest: SuggestConfig,
}

impl ProjectConfig {
    /// Load the configuration for a project root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&raw)?;
        tracing::debug!("loaded project config from {}", path.display());
        Ok(config)
    }
}
