//! Error types for the Xamlport core library
//!
//! This module defines the error handling system for the migration engine,
//! using thiserror for ergonomic error definitions and anyhow for flexible
//! error sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for migration operations
#[derive(Error, Debug)]
pub enum Error {
    /// Type resolution failed under the Required policy
    ///
    /// Carries every unresolved-type record collected during the pass
    /// (one record when fail-fast is set, all of them otherwise).
    #[error("Type resolution failed: {} unresolved type(s)", records.len())]
    TypeResolution { records: Vec<UnresolvedType> },

    /// A transformer module reported an internal fault
    #[error("Transformer '{transformer}' failed: {message}")]
    Transform {
        transformer: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Wrong-variant access on a tagged-union value slot
    #[error("Value access error: expected {expected}, found {actual}")]
    ValueAccess {
        expected: &'static str,
        actual: &'static str,
    },

    /// A node id that does not belong to the document
    #[error("Stale node id: {message}")]
    StaleNode { message: String },

    /// Invalid engine or mapping configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// One unresolved type, as reported by the aggregate Required failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedType {
    /// Namespace URI the element declared
    pub namespace: String,
    /// Local type name that could not be resolved
    pub name: String,
    /// Source location of the element, when the parser recorded one
    pub location: Option<crate::diagnostics::Location>,
}

impl fmt::Display for UnresolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}:{} ({}:{})", self.namespace, self.name, loc.line, loc.column),
            None => write!(f, "{}:{}", self.namespace, self.name),
        }
    }
}

/// Policy governing how unresolved types are reported during enrichment
///
/// The common case is `Optional`: unresolved types degrade to warnings and
/// every later transformer falls back to syntax-only heuristics. `Required`
/// turns unresolved types into errors and raises — immediately when
/// `fail_fast` is set, or as one aggregate failure listing every record
/// after the pass completes. `BestEffort` retries each miss against a
/// configurable fallback namespace list before warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeResolutionPolicy {
    /// Unresolved types produce warnings; migration continues
    Optional,
    /// Unresolved types produce errors and raise
    Required { fail_fast: bool },
    /// Retry against fallback namespaces, then warn
    BestEffort { fallback_namespaces: Vec<String> },
}

impl Default for TypeResolutionPolicy {
    fn default() -> Self {
        TypeResolutionPolicy::Optional
    }
}

impl fmt::Display for TypeResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeResolutionPolicy::Optional => write!(f, "Optional"),
            TypeResolutionPolicy::Required { fail_fast: true } => write!(f, "Required (fail-fast)"),
            TypeResolutionPolicy::Required { fail_fast: false } => write!(f, "Required"),
            TypeResolutionPolicy::BestEffort { .. } => write!(f, "BestEffort"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
