//! Schema Engine Tests
//!
//! DocumentEngine and SchemaLoader working together:
//! - Schemas loaded from disk validate documents deterministically
//! - Errors are collected for every declared field, in sorted order
//! - Asynchronous custom validators run after the structural walk
//! - Loaded schemas are never mutated by a validation call

use std::collections::HashSet;
use std::fs;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use fieldguard::schema::{DocumentEngine, FieldRule, Schema, SchemaEngine, SchemaLoader};
use fieldguard::validation::{
    CustomValidator, ErrorKind, FieldValidator, ValidationRequest, ValidatorBindings,
    ValidatorConfig, Verdict,
};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_test_loader() -> (TempDir, SchemaLoader) {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("users.json"),
        r#"{
            "username": { "type": "string", "required": true, "minlength": 3 },
            "age": { "type": "int", "min": 0, "max": 150 },
            "role": { "type": "string", "enum": ["admin", "user"], "default": "user" },
            "address": {
                "type": "object",
                "fields": {
                    "city": { "type": "string", "required": true },
                    "zip": { "type": "string", "match": "^[0-9]{4}$" }
                }
            },
            "tags": { "type": "array", "items": { "type": "string", "maxlength": 5 } }
        }"#,
    )
    .unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a schema").unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    (tmp, loader)
}

/// Username check that simulates a lookup against existing accounts.
struct UsernameAvailable {
    taken: HashSet<String>,
}

impl CustomValidator for UsernameAvailable {
    fn check<'a>(
        &'a self,
        value: &'a Value,
        _data: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Verdict> + Send + 'a>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(1)).await;
            match value.as_str() {
                Some(name) if self.taken.contains(name) => Verdict::fail("username is taken"),
                _ => Verdict::Pass,
            }
        })
    }
}

// =============================================================================
// Loader Tests
// =============================================================================

/// Only `.json` files become schemas, named by file stem.
#[test]
fn test_loader_catalog() {
    let (_tmp, loader) = setup_test_loader();
    assert_eq!(loader.names(), vec!["users"]);
    assert_eq!(loader.len(), 1);
    assert!(loader.get("users").unwrap().rule("address.city").unwrap().required);
}

// =============================================================================
// Collection Tests
// =============================================================================

/// Every failing field is reported, nested paths depth-first in sorted order.
#[tokio::test]
async fn test_collects_every_field_error() {
    let (_tmp, loader) = setup_test_loader();
    let schema = loader.get("users").unwrap();

    let doc = json!({
        "username": "al",
        "age": -1,
        "role": "root",
        "address": { "zip": "12a4" },
        "tags": ["ok", "toolong", 7]
    });
    let errors = DocumentEngine::new().validate(schema, &doc).await.unwrap();

    let summary: Vec<_> = errors.iter().map(|e| (e.path.as_str(), e.kind)).collect();
    assert_eq!(
        summary,
        vec![
            ("address.city", ErrorKind::Required),
            ("address.zip", ErrorKind::Regexp),
            ("age", ErrorKind::Min),
            ("role", ErrorKind::Enum),
            ("tags.1", ErrorKind::MaxLength),
            ("tags.2", ErrorKind::Type),
            ("username", ErrorKind::MinLength),
        ]
    );
}

/// Same document validates the same way every time.
#[tokio::test]
async fn test_validation_is_deterministic() {
    let (_tmp, loader) = setup_test_loader();
    let schema = loader.get("users").unwrap();
    let doc = json!({ "age": "old", "address": {} });

    let first = DocumentEngine::new().validate(schema, &doc).await.unwrap();
    for _ in 0..50 {
        let again = DocumentEngine::new().validate(schema, &doc).await.unwrap();
        assert_eq!(again, first);
    }
}

/// A valid document produces no errors; the role default fills in.
#[tokio::test]
async fn test_valid_document() {
    let (_tmp, loader) = setup_test_loader();
    let doc = json!({
        "username": "alice",
        "age": 30,
        "address": { "city": "Oslo", "zip": "0150" },
        "tags": ["a", "b"],
        "extra": "ignored"
    });

    let errors = DocumentEngine::new()
        .validate(loader.get("users").unwrap(), &doc)
        .await
        .unwrap();
    assert!(errors.is_empty());
}

// =============================================================================
// Validator Integration Tests
// =============================================================================

/// Asynchronous validators run through the field validator.
#[tokio::test]
async fn test_async_custom_validator() {
    let schema = Schema::default().with_field(
        "username",
        FieldRule::string().with_validator("available"),
    );
    let bindings = ValidatorBindings::new().with(
        "available",
        Arc::new(UsernameAvailable {
            taken: ["root".to_string()].into_iter().collect(),
        }),
    );
    let validator = FieldValidator::new(ValidatorConfig::new().with_bindings(bindings));

    let errors = validator
        .validate(ValidationRequest::new(json!({ "username": "root" })).with_schema(schema.clone()))
        .await
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "username is taken");

    let errors = validator
        .validate(ValidationRequest::new(json!({ "username": "bob" })).with_schema(schema))
        .await
        .unwrap();
    assert!(errors.is_empty());
}

/// Requiring a loaded field for one call does not change the catalog.
#[tokio::test]
async fn test_loaded_schema_not_mutated() {
    let (_tmp, loader) = setup_test_loader();
    let validator = FieldValidator::new(ValidatorConfig::default());

    let request = ValidationRequest::new(json!({ "username": "alice", "address": { "city": "Oslo" } }))
        .require("role")
        .with_schema(loader.get("users").unwrap().clone());
    let errors = validator.validate(request).await.unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "role");

    let role = loader.get("users").unwrap().rule("role").unwrap();
    assert!(!role.required);
    assert_eq!(role.default, Some(json!("user")));
}

/// Nested required paths are claimed by the schema that declares them.
#[tokio::test]
async fn test_nested_required_claimed_by_schema() {
    let (_tmp, loader) = setup_test_loader();
    let validator = FieldValidator::new(ValidatorConfig::default());

    let request = ValidationRequest::new(json!({ "username": "alice", "address": { "city": "Oslo" } }))
        .require("address.zip")
        .with_schema(loader.get("users").unwrap().clone());
    let errors = validator.validate(request).await.unwrap();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Path `address.zip` is required.");
}
