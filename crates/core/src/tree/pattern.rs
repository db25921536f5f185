use crate::error::{CodescoutError, Result};
use globset::{Glob, GlobMatcher};
use regex::Regex;

/// A compiled accepted-name pattern.
///
/// Closed set of variants, compiled once per scan: `re:`-prefixed strings
/// are regular expressions, strings containing glob metacharacters are
/// shell globs, everything else matches a basename exactly.
pub enum NamePattern {
    Literal(String),
    Glob(GlobMatcher),
    Regex(Regex),
}

impl NamePattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        if let Some(raw) = pattern.strip_prefix("re:") {
            let regex = Regex::new(raw)
                .map_err(|e| CodescoutError::Pattern(format!("{pattern}: {e}")))?;
            return Ok(Self::Regex(regex));
        }
        if pattern.contains(['*', '?', '[', '{']) {
            let glob = Glob::new(pattern)
                .map_err(|e| CodescoutError::Pattern(format!("{pattern}: {e}")))?;
            return Ok(Self::Glob(glob.compile_matcher()));
        }
        Ok(Self::Literal(pattern.to_string()))
    }

    pub fn compile_all(patterns: &[String]) -> Result<Vec<Self>> {
        patterns.iter().map(|p| Self::compile(p)).collect()
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            Self::Glob(glob) => glob.is_match(name),
            Self::Regex(regex) => regex.is_match(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_exact_basename_only() {
        let p = NamePattern::compile("Makefile").unwrap();
        assert!(p.matches("Makefile"));
        assert!(!p.matches("Makefile.am"));
    }

    #[test]
    fn glob_matches_shell_style() {
        let p = NamePattern::compile("*.rs").unwrap();
        assert!(p.matches("main.rs"));
        assert!(!p.matches("main.rs.bak"));
    }

    #[test]
    fn regex_requires_prefix() {
        let p = NamePattern::compile(r"re:^lib.*\.so$").unwrap();
        assert!(p.matches("libfoo.so"));
        assert!(!p.matches("foo.so"));
    }

    #[test]
    fn invalid_patterns_are_errors() {
        assert!(NamePattern::compile("re:(").is_err());
        assert!(NamePattern::compile("[").is_err());
    }
}
