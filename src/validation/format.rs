//! Result formatting
//!
//! A formatter turns a non-empty error list into the value handed back to
//! the caller (or carried by a rejection).

use serde_json::{json, Value};

use super::errors::FieldError;

/// Converts field errors into an output value.
pub trait ResultFormatter: Send + Sync {
    fn format(&self, errors: &[FieldError]) -> Value;
}

impl<F> ResultFormatter for F
where
    F: Fn(&[FieldError]) -> Value + Send + Sync,
{
    fn format(&self, errors: &[FieldError]) -> Value {
        self(errors)
    }
}

/// Wraps errors as `{ "errors": [...] }`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFormatter;

impl ResultFormatter for DefaultFormatter {
    fn format(&self, errors: &[FieldError]) -> Value {
        json!({ "errors": errors })
    }
}
