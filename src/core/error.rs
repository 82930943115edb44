//! Core Error Types
//!
//! Unified error handling for the execution pipeline.

use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidateError;

/// Core module result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed request or validator configuration
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Field validation failed; carries the formatted error body
    #[error("Validation failed: {0}")]
    InvalidFields(Value),

    /// Schema engine failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidFields(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::InvalidFields(_) => 422,
            Self::Internal(_) => 500,
        }
    }
}

impl From<ValidateError> for CoreError {
    fn from(e: ValidateError) -> Self {
        match e {
            ValidateError::Config(err) => Self::InvalidRequest(err.to_string()),
            ValidateError::Engine(err) => Self::Internal(err.to_string()),
            ValidateError::Rejected(rejection) => Self::InvalidFields(rejection.body),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}
