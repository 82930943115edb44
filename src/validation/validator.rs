//! Field validator
//!
//! Combines schema-driven validation with direct presence checks for
//! required paths no schema knows about, then applies the optional-path
//! exemption.
//!
//! Pipeline for one request:
//! 1. Shape check (configuration errors abort here)
//! 2. Required paths found in a schema are marked required there
//!    (default cleared) and leave the direct-check list
//! 3. Named validators resolved; primary then custom schema submitted
//! 4. Remaining required paths checked for a truthy value in data
//! 5. Errors concatenated: primary, custom, direct
//! 6. Required-kind errors on optional paths dropped
//! 7. Result returned, formatted, or rejected per configuration

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use super::config::ValidatorConfig;
use super::errors::{FieldError, Rejection, ValidateError, ValidateResult};
use super::path;
use super::request::ValidationRequest;
use crate::schema::{DocumentEngine, Schema, SchemaEngine};

/// Validates request data against required/optional paths and schemas.
///
/// Stateless between calls; share it behind an `Arc`.
#[derive(Clone)]
pub struct FieldValidator {
    engine: Arc<dyn SchemaEngine>,
    config: ValidatorConfig,
}

impl FieldValidator {
    /// Creates a validator backed by `DocumentEngine`.
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_engine(DocumentEngine::new(), config)
    }

    /// Creates a validator backed by a custom schema engine.
    pub fn with_engine(engine: impl SchemaEngine + 'static, config: ValidatorConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates a request and returns the filtered error list.
    ///
    /// # Errors
    ///
    /// - `ValidateError::Config` for malformed requests or unknown validator names
    /// - `ValidateError::Engine` when the schema engine fails
    /// - `ValidateError::Rejected` for a non-empty result when `fail_on_errors` is set
    pub async fn validate(&self, request: ValidationRequest) -> ValidateResult<Vec<FieldError>> {
        let errors = self.collect(request).await?;
        self.reject_if_configured(&errors)?;
        Ok(errors)
    }

    /// Validates a request and formats a non-empty result.
    ///
    /// Returns `None` when there are no errors.
    pub async fn validate_formatted(&self, request: ValidationRequest) -> ValidateResult<Option<Value>> {
        let errors = self.collect(request).await?;
        if errors.is_empty() {
            return Ok(None);
        }
        self.reject_if_configured(&errors)?;
        Ok(Some(self.config.formatter.format(&errors)))
    }

    fn reject_if_configured(&self, errors: &[FieldError]) -> ValidateResult<()> {
        if self.config.settings.fail_on_errors && !errors.is_empty() {
            return Err(ValidateError::Rejected(Rejection {
                body: self.config.formatter.format(errors),
                errors: errors.to_vec(),
            }));
        }
        Ok(())
    }

    /// Runs the full pipeline and returns filtered errors.
    async fn collect(&self, request: ValidationRequest) -> ValidateResult<Vec<FieldError>> {
        request.check_shape()?;

        let ValidationRequest {
            data,
            required,
            optional,
            mut schema,
            mut custom_schema,
        } = request;

        debug!(
            required = required.len(),
            optional = optional.len(),
            schema = schema.is_some(),
            custom_schema = custom_schema.is_some(),
            "validating request"
        );

        let mut remaining = dedup(required);
        if let Some(schema) = schema.as_mut() {
            claim_required(schema, &mut remaining);
        }
        if let Some(schema) = custom_schema.as_mut() {
            claim_required(schema, &mut remaining);
        }

        let mut errors = Vec::new();
        for schema in [schema.as_mut(), custom_schema.as_mut()].into_iter().flatten() {
            schema.resolve_validators(&self.config.bindings)?;
            let found = self.engine.validate(schema, &data).await?;
            trace!(errors = found.len(), "schema engine finished");
            errors.extend(found);
        }

        errors.extend(check_presence(&data, &remaining));

        let total = errors.len();
        let errors = filter_optional(errors, &optional);
        debug!(found = total, reported = errors.len(), "validation finished");

        Ok(errors)
    }
}

/// Removes duplicate paths, keeping first occurrence order.
fn dedup(paths: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

/// Marks required paths known to `schema` as required there and removes
/// them from `remaining`.
fn claim_required(schema: &mut Schema, remaining: &mut Vec<String>) {
    remaining.retain(|p| {
        let claimed = schema.require(p);
        if claimed {
            trace!(path = %p, "required path claimed by schema");
        }
        !claimed
    });
}

/// Direct presence check for required paths no schema declares.
fn check_presence(data: &Value, paths: &[String]) -> Vec<FieldError> {
    paths
        .iter()
        .filter_map(|p| {
            let value = path::lookup(data, p);
            if value.map_or(false, path::is_truthy) {
                None
            } else {
                Some(FieldError::missing_path(p.as_str(), value.cloned()))
            }
        })
        .collect()
}

/// Drops required-kind errors for optional paths.
pub fn filter_optional(errors: Vec<FieldError>, optional: &BTreeSet<String>) -> Vec<FieldError> {
    errors
        .into_iter()
        .filter(|e| !(e.is_required() && optional.contains(&e.path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EngineError, EngineFuture, FieldRule};
    use crate::validation::errors::{ConfigError, ErrorKind};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Engine that counts calls and reports nothing.
    #[derive(Default)]
    struct CountingEngine {
        calls: Arc<AtomicUsize>,
    }

    impl SchemaEngine for CountingEngine {
        fn validate<'a>(&'a self, _schema: &'a Schema, _data: &'a Value) -> EngineFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    struct FailingEngine;

    impl SchemaEngine for FailingEngine {
        fn validate<'a>(&'a self, _schema: &'a Schema, _data: &'a Value) -> EngineFuture<'a> {
            Box::pin(async { Err(EngineError::Internal("boom".into())) })
        }
    }

    fn validator() -> FieldValidator {
        FieldValidator::new(ValidatorConfig::default())
    }

    #[tokio::test]
    async fn test_missing_required_path() {
        let errors = validator()
            .validate(ValidationRequest::new(json!({})).require("name"))
            .await
            .unwrap();
        assert_eq!(errors, vec![FieldError::missing_path("name", None)]);
    }

    #[tokio::test]
    async fn test_optional_overrides_required() {
        let errors = validator()
            .validate(ValidationRequest::new(json!({})).require("name").optional("name"))
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_falsy_value_reported_with_value() {
        let errors = validator()
            .validate(ValidationRequest::new(json!({ "count": 0 })).require("count"))
            .await
            .unwrap();
        assert_eq!(errors[0].value, Some(json!(0)));
    }

    #[tokio::test]
    async fn test_duplicate_required_paths_reported_once() {
        let errors = validator()
            .validate(ValidationRequest::new(json!({})).with_required(["a", "a", "b"]))
            .await
            .unwrap();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_schema_path_not_double_checked() {
        let schema = Schema::default().with_field("name", FieldRule::string());
        let errors = validator()
            .validate(ValidationRequest::new(json!({})).require("name").with_schema(schema))
            .await
            .unwrap();

        assert_eq!(errors.len(), 1);
        // Message comes from the engine, not the direct check
        assert_eq!(errors[0].message, "Path `name` is required.");
    }

    #[tokio::test]
    async fn test_required_clears_schema_default() {
        let schema = Schema::default().with_field("role", FieldRule::string().with_default(json!("user")));

        let errors = validator()
            .validate(ValidationRequest::new(json!({})).with_schema(schema.clone()))
            .await
            .unwrap();
        assert!(errors.is_empty());

        let errors = validator()
            .validate(ValidationRequest::new(json!({})).require("role").with_schema(schema))
            .await
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Required);
    }

    #[tokio::test]
    async fn test_error_order_primary_custom_direct() {
        let primary = Schema::default().with_field("age", FieldRule::int());
        let custom = Schema::default().with_field("phone", FieldRule::string());
        let request = ValidationRequest::new(json!({ "age": "x", "phone": 1 }))
            .require("zip")
            .with_schema(primary)
            .with_custom_schema(custom);

        let errors = validator().validate(request).await.unwrap();
        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["age", "phone", "zip"]);
    }

    #[tokio::test]
    async fn test_custom_schema_claims_remaining_required() {
        let custom = Schema::default().with_field("phone", FieldRule::string());
        let request = ValidationRequest::new(json!({}))
            .require("phone")
            .with_schema(Schema::default())
            .with_custom_schema(custom);

        let errors = validator().validate(request).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Path `phone` is required.");
    }

    #[tokio::test]
    async fn test_non_required_errors_survive_optional() {
        let schema = Schema::default().with_field("age", FieldRule::int());
        let request = ValidationRequest::new(json!({ "age": "ten" }))
            .optional("age")
            .with_schema(schema);

        let errors = validator().validate(request).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Type);
    }

    #[tokio::test]
    async fn test_malformed_data_never_reaches_engine() {
        let engine = CountingEngine::default();
        let calls = Arc::clone(&engine.calls);
        let validator = FieldValidator::with_engine(engine, ValidatorConfig::default());

        let request = ValidationRequest::new(json!([1, 2])).with_schema(Schema::default());
        let err = validator.validate(request).await.unwrap_err();

        assert!(matches!(err, ValidateError::Config(ConfigError::DataNotObject("array"))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_engine_called_once_per_schema() {
        let engine = CountingEngine::default();
        let calls = Arc::clone(&engine.calls);
        let validator = FieldValidator::with_engine(engine, ValidatorConfig::default());

        let request = ValidationRequest::new(json!({}))
            .with_schema(Schema::default())
            .with_custom_schema(Schema::default());
        validator.validate(request).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let validator = FieldValidator::with_engine(FailingEngine, ValidatorConfig::default());
        let request = ValidationRequest::new(json!({})).with_schema(Schema::default());

        let err = validator.validate(request).await.unwrap_err();
        assert!(matches!(err, ValidateError::Engine(EngineError::Internal(_))));
    }

    #[tokio::test]
    async fn test_formatted_none_when_valid() {
        let result = validator()
            .validate_formatted(ValidationRequest::new(json!({ "name": "bob" })).require("name"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_formatted_uses_formatter() {
        let config = ValidatorConfig::new()
            .with_formatter(|errors: &[FieldError]| json!({ "count": errors.len() }));
        let result = FieldValidator::new(config)
            .validate_formatted(ValidationRequest::new(json!({})).require("name"))
            .await
            .unwrap();
        assert_eq!(result, Some(json!({ "count": 1 })));
    }

    #[tokio::test]
    async fn test_fail_on_errors_rejects() {
        let validator = FieldValidator::new(ValidatorConfig::new().fail_on_errors());

        let err = validator
            .validate(ValidationRequest::new(json!({})).require("name"))
            .await
            .unwrap_err();
        let rejection = err.rejection().unwrap();
        assert_eq!(rejection.errors.len(), 1);
        assert_eq!(rejection.body["errors"][0]["path"], "name");

        // Empty results still succeed
        let ok = validator
            .validate(ValidationRequest::new(json!({ "name": "bob" })).require("name"))
            .await
            .unwrap();
        assert!(ok.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let optional: BTreeSet<String> = ["a".to_string()].into_iter().collect();
        let errors = vec![
            FieldError::missing_path("a", None),
            FieldError::new("a", ErrorKind::Type, "bad", None),
            FieldError::missing_path("b", None),
        ];
        let once = filter_optional(errors, &optional);
        let twice = filter_optional(once.clone(), &optional);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
