//! Schema engine: validates a data object against a declarative schema
//!
//! `SchemaEngine` is the seam the field validator talks to. `DocumentEngine`
//! is the default implementation.
//!
//! DocumentEngine semantics:
//! - Every declared field is checked, errors are collected (no fail-fast)
//! - Fields are visited in sorted order, nested fields depth-first
//! - Each path yields at most one error: the first check that fails
//! - Missing values fall back to the rule default; explicit null does not
//! - A missing object is walked as empty, so its required fields still fire
//! - No type coercion
//! - Undeclared fields are ignored

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};
use tracing::trace;

use super::errors::{EngineError, EngineResult};
use super::types::{FieldRule, FieldType, Schema, ValidatorRef};
use crate::validation::custom::Verdict;
use crate::validation::errors::{ErrorKind, FieldError};
use crate::validation::path::{display_value, join, json_type_name};

/// Future returned by `SchemaEngine::validate`
pub type EngineFuture<'a> = Pin<Box<dyn Future<Output = EngineResult<Vec<FieldError>>> + Send + 'a>>;

/// Structural validation backend.
///
/// Returns the field errors found in `data`, or an `EngineError` when the
/// engine itself could not run.
pub trait SchemaEngine: Send + Sync {
    fn validate<'a>(&'a self, schema: &'a Schema, data: &'a Value) -> EngineFuture<'a>;
}

/// A check that still has to run asynchronously, or a finished error.
enum Finding<'a> {
    Error(FieldError),
    Custom {
        path: String,
        value: &'a Value,
        validators: &'a [ValidatorRef],
    },
}

/// Default schema engine over JSON documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentEngine;

impl DocumentEngine {
    pub fn new() -> Self {
        Self
    }

    /// Walks declared fields of an object, recording findings in order.
    ///
    /// A missing object (`None`) is walked as empty, so nested required
    /// rules fire even when their parent is absent.
    fn walk<'a>(
        &self,
        fields: &'a BTreeMap<String, FieldRule>,
        obj: Option<&'a Map<String, Value>>,
        prefix: &str,
        out: &mut Vec<Finding<'a>>,
    ) -> EngineResult<()> {
        for (name, rule) in fields {
            let value = obj.and_then(|o| o.get(name));
            self.check_field(rule, value, join(prefix, name), out)?;
        }
        Ok(())
    }

    fn check_field<'a>(
        &self,
        rule: &'a FieldRule,
        value: Option<&'a Value>,
        path: String,
        out: &mut Vec<Finding<'a>>,
    ) -> EngineResult<()> {
        let value = match value.or(rule.default.as_ref()) {
            Some(v) if !v.is_null() => v,
            found => {
                if rule.required {
                    out.push(Finding::Error(required_error(&path, found.cloned())));
                } else if let FieldType::Object { fields } = &rule.field_type {
                    self.walk(fields, None, &path, out)?;
                }
                return Ok(());
            }
        };

        if rule.required && value.as_str() == Some("") {
            out.push(Finding::Error(required_error(&path, Some(value.clone()))));
            return Ok(());
        }

        if !rule.field_type.accepts(value) {
            let message = format!(
                "Cast to {} failed for value {} at path \"{}\"",
                rule.field_type.type_name(),
                value,
                path
            );
            trace!(path = %path, actual = json_type_name(value), "type mismatch");
            out.push(Finding::Error(FieldError::new(
                &path,
                ErrorKind::Type,
                message,
                Some(value.clone()),
            )));
            return Ok(());
        }

        match (&rule.field_type, value) {
            (FieldType::Object { fields }, Value::Object(obj)) => {
                self.walk(fields, Some(obj), &path, out)?;
            }
            (FieldType::Array { items }, Value::Array(elements)) => {
                for (i, element) in elements.iter().enumerate() {
                    self.check_field(items, Some(element), format!("{}.{}", path, i), out)?;
                }
            }
            _ => {}
        }

        if let Some(err) = check_constraints(rule, value, &path) {
            out.push(Finding::Error(err));
            return Ok(());
        }

        if !rule.validators.is_empty() {
            out.push(Finding::Custom {
                path,
                value,
                validators: &rule.validators,
            });
        }

        Ok(())
    }
}

impl SchemaEngine for DocumentEngine {
    fn validate<'a>(&'a self, schema: &'a Schema, data: &'a Value) -> EngineFuture<'a> {
        Box::pin(async move {
            let root = data
                .as_object()
                .ok_or_else(|| EngineError::Internal(format!("data must be an object, got {}", json_type_name(data))))?;

            let mut findings = Vec::new();
            self.walk(&schema.fields, Some(root), "", &mut findings)?;

            let mut errors = Vec::with_capacity(findings.len());
            for finding in findings {
                match finding {
                    Finding::Error(err) => errors.push(err),
                    Finding::Custom {
                        path,
                        value,
                        validators,
                    } => {
                        if let Some(err) = run_custom(&path, value, validators, data).await? {
                            errors.push(err);
                        }
                    }
                }
            }

            trace!(fields = schema.len(), errors = errors.len(), "document validated");
            Ok(errors)
        })
    }
}

/// Runs custom validators in order and stops at the first failure.
async fn run_custom(
    path: &str,
    value: &Value,
    validators: &[ValidatorRef],
    data: &Value,
) -> EngineResult<Option<FieldError>> {
    for slot in validators {
        let validator = match slot {
            ValidatorRef::Bound { validator, .. } => validator,
            ValidatorRef::Named(name) => {
                return Err(EngineError::UnboundValidator {
                    path: path.to_string(),
                    name: name.clone(),
                })
            }
        };

        if let Verdict::Fail(message) = validator.check(value, data).await {
            let message = message.unwrap_or_else(|| {
                format!(
                    "Validator failed for path `{}` with value `{}`",
                    path,
                    display_value(value)
                )
            });
            return Ok(Some(FieldError::new(
                path,
                ErrorKind::Custom,
                message,
                Some(value.clone()),
            )));
        }
    }
    Ok(None)
}

fn required_error(path: &str, value: Option<Value>) -> FieldError {
    FieldError::new(
        path,
        ErrorKind::Required,
        format!("Path `{}` is required.", path),
        value,
    )
}

/// Built-in constraints: enum, min, max, minlength, maxlength, match.
fn check_constraints(rule: &FieldRule, value: &Value, path: &str) -> Option<FieldError> {
    let shown = display_value(value);
    let fail = |kind: ErrorKind, message: String| Some(FieldError::new(path, kind, message, Some(value.clone())));

    if let Some(allowed) = &rule.enum_values {
        if !allowed.contains(value) {
            return fail(
                ErrorKind::Enum,
                format!("`{}` is not a valid enum value for path `{}`.", shown, path),
            );
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = rule.min.filter(|min| n < *min) {
            return fail(
                ErrorKind::Min,
                format!("Path `{}` ({}) is less than minimum allowed value ({}).", path, shown, min),
            );
        }
        if let Some(max) = rule.max.filter(|max| n > *max) {
            return fail(
                ErrorKind::Max,
                format!("Path `{}` ({}) is more than maximum allowed value ({}).", path, shown, max),
            );
        }
    }

    if let Some(s) = value.as_str() {
        let len = s.chars().count();
        if let Some(min) = rule.min_length.filter(|min| len < *min) {
            return fail(
                ErrorKind::MinLength,
                format!(
                    "Path `{}` (`{}`) is shorter than the minimum allowed length ({}).",
                    path, s, min
                ),
            );
        }
        if let Some(max) = rule.max_length.filter(|max| len > *max) {
            return fail(
                ErrorKind::MaxLength,
                format!(
                    "Path `{}` (`{}`) is longer than the maximum allowed length ({}).",
                    path, s, max
                ),
            );
        }
        if let Some(re) = &rule.pattern {
            if !re.is_match(s) {
                return fail(ErrorKind::Regexp, format!("Path `{}` is invalid ({}).", path, s));
            }
        }
    }

    None
}
