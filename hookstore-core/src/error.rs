//! Error types for store registry operations

use thiserror::Error;

/// Result alias used throughout hookstore
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the store registry
///
/// Only lookup failures are errors. Mode mismatches,
/// duplicate subscriptions and duplicate store names are reported through
/// `tracing` and never abort the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No store is registered under the name
    #[error("Store with name {name} does not exist")]
    NotFound { name: String },

    /// A store exists under the name but holds different state/action types
    #[error("Store {name} is not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
}

impl StoreError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("todos");
        assert_eq!(err.to_string(), "Store with name todos does not exist");
    }
}
