//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations found while building or resolving a tree.
///
/// The `Display` text doubles as the critical diagnostic reported through
/// [`Context::log_critical`](crate::domain::Context::log_critical), so every
/// variant names the tree path and, where relevant, the offending key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{path}: {key}: malformed inherit directive (expected string, found {found})")]
    MalformedDirective {
        path: String,
        key: String,
        found: String,
    },

    #[error("{path}: {key}: cannot inherit from non existing: {parent}")]
    UnknownParent {
        path: String,
        key: String,
        parent: String,
    },

    #[error("{path}: {key}: cannot inherit from itself")]
    SelfInheritance { path: String, key: String },

    #[error("{path}: circular dependency detected between: {}", .keys.join(", "))]
    CircularDependency { path: String, keys: Vec<String> },

    #[error("{path}: duplicate key: {key}")]
    DuplicateKey { path: String, key: String },

    #[error("node not found in tree")]
    NodeNotFound,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
