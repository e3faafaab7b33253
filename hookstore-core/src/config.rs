//! Registry configuration with glob-based store filtering
//!
//! Controls which stores the built-in [`LoggingMiddleware`](crate::LoggingMiddleware)
//! reports on. Patterns support:
//! - `*` matches any sequence of characters
//! - `?` matches any single character
//! - Literal text matches exactly
//!
//! # Example
//!
//! ```
//! use hookstore_core::RegistryConfig;
//!
//! let config = RegistryConfig::new(Some("user*,cart"), Some("user_cache"));
//! assert!(config.should_trace("user_profile"));
//! assert!(config.should_trace("cart"));
//! assert!(!config.should_trace("user_cache"));
//! assert!(!config.should_trace("todos"));
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for a [`StoreRegistry`](crate::StoreRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Emit `tracing` events for store updates
    pub trace_updates: bool,
    /// If non-empty, only stores matching one of these patterns are traced
    pub include_patterns: Vec<String>,
    /// Stores matching these patterns are never traced (applied after include)
    pub exclude_patterns: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            trace_updates: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Create a config from comma-separated pattern strings
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            trace_updates: true,
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    /// A config that never traces updates
    pub fn quiet() -> Self {
        Self {
            trace_updates: false,
            ..Self::default()
        }
    }

    /// Parse a config from JSON
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Check if updates of the named store should be traced
    pub fn should_trace(&self, store_name: &str) -> bool {
        if !self.trace_updates {
            return false;
        }

        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, store_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, store_name))
    }
}

fn split_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Match a store name against a pattern where `*` spans any run of
/// characters and `?` exactly one.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    match_from(&pattern, &text)
}

fn match_from(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'*', rest)) => {
            // Consecutive stars behave like one
            let rest = &rest[rest.iter().take_while(|&&c| c == '*').count()..];
            rest.is_empty() || (0..=text.len()).any(|skip| match_from(rest, &text[skip..]))
        }
        Some((&expected, rest)) => match text.split_first() {
            Some((&actual, tail)) if expected == '?' || expected == actual => {
                match_from(rest, tail)
            }
            _ => false,
        },
    }
}
