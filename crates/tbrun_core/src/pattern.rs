//! Wildcard patterns over testbench and test names.
//!
//! Patterns use shell-style wildcards (`*`, `?`, `[...]`) and match case-insensitively, since VHDL
//! identifiers are case-insensitive. Names contain no path separators, so `*` matches any run of
//! characters, dots included.

use std::fmt;

use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// Error raised when a wildcard pattern does not compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid name pattern '{pattern}' at position {position}: {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub position: usize,
    pub reason: &'static str,
}

const NAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled wildcard pattern over identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    source: String,
    compiled: Pattern,
}

impl NamePattern {
    /// Compile a wildcard pattern.
    ///
    /// ## Errors
    ///
    /// Returns [`PatternError`] for malformed character classes such as `[a-`.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let compiled = Pattern::new(pattern).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            position: e.pos,
            reason: e.msg,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            compiled,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `name` matches this pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.compiled.matches_with(name, NAME_MATCH)
    }

    /// Check whether `name` matches any of `patterns`; an empty list matches everything.
    pub fn any_matches(patterns: &[NamePattern], name: &str) -> bool {
        patterns.is_empty() || patterns.iter().any(|p| p.matches(name))
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_tbc_convention() {
        let pattern = NamePattern::new("*tbc*").unwrap();
        assert!(pattern.matches("foo_tbc"));
        assert!(pattern.matches("footbcbar"));
        assert!(pattern.matches("tbc"));
        assert!(!pattern.matches("foobar"));
    }

    #[test]
    fn test_suffix_variants() {
        let underscored = NamePattern::new("*_tbc").unwrap();
        assert!(underscored.matches("foo_tbc"));
        assert!(!underscored.matches("tbc"));
        assert!(!underscored.matches("footbcbar"));

        let suffix = NamePattern::new("*tbc").unwrap();
        assert!(suffix.matches("foo_tbc"));
        assert!(suffix.matches("tbc"));
        assert!(!suffix.matches("footbcbar"));
    }

    #[test]
    fn test_matching_ignores_case() {
        let pattern = NamePattern::new("*tbc*").unwrap();
        assert!(pattern.matches("UART_TBC"));
    }

    #[test]
    fn test_star_crosses_dots() {
        let pattern = NamePattern::new("lib.*.with_reset").unwrap();
        assert!(pattern.matches("lib.uart_tbc.with_reset"));
        assert!(!pattern.matches("lib.uart_tbc.without_reset"));
    }

    #[test]
    fn test_malformed_pattern_reports_position() {
        let err = NamePattern::new("[a-").unwrap_err();
        assert_eq!(err.pattern, "[a-");
        assert!(err.to_string().contains("invalid name pattern"));
    }

    #[test]
    fn test_empty_filter_list_matches_everything() {
        assert!(NamePattern::any_matches(&[], "anything"));
        let filters = vec![NamePattern::new("lib.a*").unwrap()];
        assert!(NamePattern::any_matches(&filters, "lib.abc"));
        assert!(!NamePattern::any_matches(&filters, "lib.xyz"));
    }

    #[test]
    fn test_display_keeps_source_text() {
        let pattern = NamePattern::new("*TBC*").unwrap();
        assert_eq!(pattern.as_str(), "*TBC*");
        assert_eq!(pattern.to_string(), "*TBC*");
    }
}
