//! Request-data validation
//!
//! Given candidate field values, required paths, optional paths and
//! declarative schemas, produces a normalized list of `FieldError`s.
//!
//! # Precedence
//!
//! - A required path declared in a schema is enforced by the schema engine
//!   (its default is cleared), never by the direct presence check
//! - A required path no schema declares must have a truthy value in data
//! - An optional path never reports a required-kind error, whatever its source
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldguard::validation::{FieldValidator, ValidationRequest, ValidatorConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = FieldValidator::new(ValidatorConfig::default());
//! let request = ValidationRequest::new(json!({ "name": "bob" }))
//!     .with_required(["name", "email"])
//!     .optional("email");
//!
//! let errors = validator.validate(request).await?;
//! assert!(errors.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod config;
pub mod custom;
pub mod errors;
pub mod format;
pub mod path;
pub mod request;
pub mod validator;

pub use config::{ValidatorConfig, ValidatorSettings};
pub use custom::{validator_fn, CustomValidator, ValidatorBindings, Verdict};
pub use errors::{
    ConfigError, ErrorKind, FieldError, Rejection, SettingsError, ValidateError, ValidateResult,
};
pub use format::{DefaultFormatter, ResultFormatter};
pub use request::ValidationRequest;
pub use validator::{filter_optional, FieldValidator};
