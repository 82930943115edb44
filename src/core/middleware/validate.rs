//! Validation Middleware
//!
//! Checks write (and optionally update) documents against per-collection
//! rules. Errors are bound to `RequestContext::validation_errors`; any
//! remaining error rejects the operation with the formatted body.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::context::RequestContext;
use crate::core::error::CoreError;
use crate::core::operation::Operation;
use crate::core::pipeline::{Next, StageFuture};
use crate::schema::Schema;
use crate::validation::{FieldValidator, ValidateError, ValidationRequest};

use super::Middleware;

/// Validation rules for one collection
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    pub required: Vec<String>,
    pub optional: Vec<String>,
    pub schema: Option<Schema>,
    pub custom_schema: Option<Schema>,
    /// Also validate update payloads (writes are always validated)
    pub on_update: bool,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, path: impl Into<String>) -> Self {
        self.required.push(path.into());
        self
    }

    pub fn optional(mut self, path: impl Into<String>) -> Self {
        self.optional.push(path.into());
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_custom_schema(mut self, schema: Schema) -> Self {
        self.custom_schema = Some(schema);
        self
    }

    pub fn also_on_update(mut self) -> Self {
        self.on_update = true;
        self
    }

    fn applies_to(&self, op: &Operation) -> bool {
        match op {
            Operation::Write(_) => true,
            Operation::Update(_) => self.on_update,
        }
    }

    /// Builds a request over `data`. Schemas are cloned, so per-call
    /// changes never touch the shared rules.
    fn request(&self, data: Value) -> ValidationRequest {
        let mut request = ValidationRequest::new(data)
            .with_required(self.required.iter().cloned())
            .with_optional(self.optional.iter().cloned());
        request.schema = self.schema.clone();
        request.custom_schema = self.custom_schema.clone();
        request
    }
}

/// Validation middleware
pub struct ValidationMiddleware {
    validator: Arc<FieldValidator>,
    rules: HashMap<String, ValidationRules>,
}

impl ValidationMiddleware {
    pub fn new(validator: Arc<FieldValidator>) -> Self {
        Self {
            validator,
            rules: HashMap::new(),
        }
    }

    /// Register rules for a collection, replacing any previous ones
    pub fn with_rules(mut self, collection: impl Into<String>, rules: ValidationRules) -> Self {
        self.rules.insert(collection.into(), rules);
        self
    }
}

impl Middleware for ValidationMiddleware {
    fn process<'a>(
        &'a self,
        op: &'a Operation,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> StageFuture<'a> {
        let rules = match self.rules.get(op.collection()) {
            Some(rules) if rules.applies_to(op) => rules,
            _ => return next.run(op, ctx),
        };

        Box::pin(async move {
            ctx.validation_errors.clear();

            match self.validator.validate(rules.request(op.document().clone())).await {
                Ok(errors) if errors.is_empty() => {
                    debug!(request_id = %ctx.request_id, op = op.name(), "validation passed");
                    next.run(op, ctx).await
                }
                Ok(errors) => {
                    let body = self.validator.config().formatter.format(&errors);
                    debug!(
                        request_id = %ctx.request_id,
                        op = op.name(),
                        errors = errors.len(),
                        "validation rejected operation"
                    );
                    ctx.validation_errors = errors;
                    Err(CoreError::InvalidFields(body))
                }
                Err(ValidateError::Rejected(rejection)) => {
                    ctx.validation_errors = rejection.errors.clone();
                    Err(CoreError::InvalidFields(rejection.body))
                }
                Err(e) => {
                    warn!(request_id = %ctx.request_id, error = %e, "validation could not run");
                    Err(e.into())
                }
            }
        })
    }
}
