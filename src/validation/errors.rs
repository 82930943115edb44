//! Validation error types
//!
//! Two tiers:
//! - `FieldError`: a single field failing validation (data, not a Rust error)
//! - `ValidateError`: the call itself failed (bad configuration, engine
//!   failure) or was rejected because field errors remained

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::schema::EngineError;

/// Classification of a field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Value missing or empty
    Required,
    /// A custom validator rejected the value
    Custom,
    /// Value has the wrong type
    Type,
    /// Value not in the allowed set
    Enum,
    /// Number below minimum
    Min,
    /// Number above maximum
    Max,
    /// String shorter than allowed
    MinLength,
    /// String longer than allowed
    MaxLength,
    /// String does not match the pattern
    Regexp,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Custom => "custom",
            ErrorKind::Type => "type",
            ErrorKind::Enum => "enum",
            ErrorKind::Min => "min",
            ErrorKind::Max => "max",
            ErrorKind::MinLength => "minlength",
            ErrorKind::MaxLength => "maxlength",
            ErrorKind::Regexp => "regexp",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field path (e.g., "user.address.city")
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Error classification
    pub kind: ErrorKind,
    /// The offending value, if there was one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn new(
        path: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
        value: Option<Value>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
            value,
        }
    }

    /// Error produced by the direct presence check for paths no schema knows.
    pub fn missing_path(path: impl Into<String>, value: Option<Value>) -> Self {
        let path = path.into();
        let message = format!("Path '{}' is required.", path);
        Self::new(path, ErrorKind::Required, message, value)
    }

    pub fn is_required(&self) -> bool {
        self.kind == ErrorKind::Required
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.path, self.kind, self.message)
    }
}

/// Malformed call arguments. Always raised, never filtered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("data must be an object, got {0}")]
    DataNotObject(&'static str),

    #[error("request must be an object, got {0}")]
    RequestNotObject(&'static str),

    #[error("'{field}' must be an array of strings")]
    NotPathList { field: &'static str },

    #[error("field paths must not be empty")]
    EmptyPath,

    #[error("schema must be an object, got {0}")]
    SchemaNotObject(&'static str),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unknown validator '{name}' referenced by path '{path}'")]
    UnknownValidator { path: String, name: String },
}

/// Errors loading `ValidatorSettings` from disk
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Field errors that were turned into a failure because `fail_on_errors` is set.
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Output of the configured formatter
    pub body: Value,
    /// The filtered errors the body was built from
    pub errors: Vec<FieldError>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} error(s)", self.errors.len())
    }
}

/// Error returned by `FieldValidator` operations.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("schema engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Rejected(Rejection),
}

impl ValidateError {
    /// Returns the rejection if this error carries field errors.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidateError::Rejected(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ValidateError::Config(_))
    }
}

/// Result type for validator operations
pub type ValidateResult<T> = Result<T, ValidateError>;
