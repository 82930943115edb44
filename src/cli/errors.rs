//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::schema::LoaderError;
use crate::validation::SettingsError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Settings file error
    ConfigError,
    /// I/O error (stdin/stdout, files)
    IoError,
    /// Request JSON has the wrong shape
    InvalidRequest,
    /// Named schema not found
    UnknownSchema,
    /// Schema directory could not be loaded
    SchemaLoadFailed,
    /// Schema engine failed
    EngineFailed,
    /// Field errors remained with fail-on-errors set
    ValidationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FIELDGUARD_CONFIG_ERROR",
            Self::IoError => "FIELDGUARD_IO_ERROR",
            Self::InvalidRequest => "FIELDGUARD_INVALID_REQUEST",
            Self::UnknownSchema => "FIELDGUARD_UNKNOWN_SCHEMA",
            Self::SchemaLoadFailed => "FIELDGUARD_SCHEMA_LOAD_FAILED",
            Self::EngineFailed => "FIELDGUARD_ENGINE_FAILED",
            Self::ValidationFailed => "FIELDGUARD_VALIDATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    pub fn unknown_schema(name: &str) -> Self {
        Self::new(CliErrorCode::UnknownSchema, format!("Schema '{}' not found", name))
    }

    pub fn engine_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::EngineFailed, msg)
    }

    pub fn validation_failed(count: usize) -> Self {
        Self::new(
            CliErrorCode::ValidationFailed,
            format!("{} field error(s) remain", count),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<LoaderError> for CliError {
    fn from(e: LoaderError) -> Self {
        Self::new(CliErrorCode::SchemaLoadFailed, e.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
