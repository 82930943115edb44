//! Request Context
//!
//! Per-request state carried through the pipeline: an id for log
//! correlation and the field errors bound by the validation stage.

use uuid::Uuid;

use crate::validation::FieldError;

/// Context carried through the execution pipeline
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing
    pub request_id: Uuid,

    /// Errors from the last validation stage (empty when it passed)
    pub validation_errors: Vec<FieldError>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            validation_errors: Vec::new(),
        }
    }

    /// Whether the validation stage reported errors
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
