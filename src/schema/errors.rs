//! Schema engine and loader error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of the schema engine itself, as opposed to field errors it reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("validator '{name}' for path '{path}' was never bound to a function")]
    UnboundValidator { path: String, name: String },

    #[error("engine failure: {0}")]
    Internal(String),
}

/// Errors loading schema files from disk
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema file '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("schema '{0}' is already registered")]
    Duplicate(String),
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;
