//! CLI command implementations

use serde_json::{json, Value};
use tracing::{debug, info};

use super::args::{CheckArgs, Cli, Command};
use super::errors::{CliError, CliResult};
use super::io;
use crate::schema::SchemaLoader;
use crate::validation::{
    builtin, FieldValidator, ValidateError, ValidationRequest, ValidatorConfig, ValidatorSettings,
};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args()).await
}

/// Run a parsed command
pub async fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Check(args) => check(args).await,
        Command::Schemas { schema_dir } => schemas(&schema_dir),
    }
}

/// `check`: validate one request, print the result
pub async fn check(args: CheckArgs) -> CliResult<()> {
    let raw = match &args.request {
        Some(path) => io::read_request_file(path)?,
        None => io::read_request()?,
    };

    let request = build_request(&raw, &args)?;
    let validator = build_validator(&args)?;

    match validator.validate(request).await {
        Ok(errors) => io::write_response(json!({
            "valid": errors.is_empty(),
            "errors": errors
        })),
        Err(ValidateError::Rejected(rejection)) => {
            let err = CliError::validation_failed(rejection.errors.len());
            io::write_error(err.code_str(), err.message(), Some(rejection.body))?;
            Err(err)
        }
        Err(ValidateError::Config(e)) => Err(CliError::invalid_request(e.to_string())),
        Err(ValidateError::Engine(e)) => Err(CliError::engine_failed(e.to_string())),
    }
}

/// `schemas`: list schema names in a directory
pub fn schemas(schema_dir: &std::path::Path) -> CliResult<()> {
    let mut loader = SchemaLoader::new(schema_dir);
    loader.load_all()?;
    io::write_response(json!({ "schemas": loader.names() }))
}

/// Builds the validation request from the raw JSON and command-line extras.
///
/// A `--model` schema replaces any primary schema in the request.
pub fn build_request(raw: &Value, args: &CheckArgs) -> CliResult<ValidationRequest> {
    let mut request = ValidationRequest::from_value(raw)
        .map_err(|e| CliError::invalid_request(e.to_string()))?
        .with_required(args.required.iter().cloned())
        .with_optional(args.optional.iter().cloned());

    if let (Some(model), Some(dir)) = (&args.model, &args.schema_dir) {
        let mut loader = SchemaLoader::new(dir);
        let loaded = loader.load_all()?;
        debug!(dir = %dir.display(), loaded, "schema directory loaded");

        let schema = loader.get(model).ok_or_else(|| CliError::unknown_schema(model))?;
        request.schema = Some(schema.clone());
        info!(model = %model, "using named schema");
    }

    Ok(request)
}

/// Builds the validator: built-in bindings plus settings from file and flags.
pub fn build_validator(args: &CheckArgs) -> CliResult<FieldValidator> {
    let mut settings = match &args.config {
        Some(path) => ValidatorSettings::from_file(path)?,
        None => ValidatorSettings::default(),
    };
    if args.fail_on_errors {
        settings.fail_on_errors = true;
    }

    let config = ValidatorConfig::new()
        .with_bindings(builtin::bindings())
        .with_settings(settings);
    Ok(FieldValidator::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_request_merges_paths() {
        let args = CheckArgs {
            required: vec!["email".into()],
            optional: vec!["email".into()],
            ..CheckArgs::default()
        };
        let request = build_request(&json!({ "required": ["name"] }), &args).unwrap();
        assert_eq!(request.required, vec!["name", "email"]);
        assert!(request.optional.contains("email"));
    }

    #[test]
    fn test_build_request_named_model() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("users.json"), r#"{ "name": "string" }"#).unwrap();

        let args = CheckArgs {
            schema_dir: Some(temp_dir.path().to_path_buf()),
            model: Some("users".into()),
            ..CheckArgs::default()
        };
        let request = build_request(&json!({ "data": {} }), &args).unwrap();
        assert!(request.schema.unwrap().rule("name").is_some());

        let args = CheckArgs {
            model: Some("posts".into()),
            ..args
        };
        let err = build_request(&json!({}), &args).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnknownSchema);
    }

    #[test]
    fn test_build_request_rejects_bad_shape() {
        let err = build_request(&json!({ "data": 3 }), &CheckArgs::default()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_validator_has_builtins_and_flag() {
        let args = CheckArgs {
            fail_on_errors: true,
            ..CheckArgs::default()
        };
        let validator = build_validator(&args).unwrap();
        assert!(validator.config().settings.fail_on_errors);
        assert!(validator.config().bindings.get("email").is_some());

        let request = build_request(
            &json!({
                "data": { "contact": "nope" },
                "schema": { "contact": { "type": "string", "validate": "email" } }
            }),
            &CheckArgs::default(),
        )
        .unwrap();
        let err = validator.validate(request).await.unwrap_err();
        assert_eq!(err.rejection().unwrap().errors[0].path, "contact");
    }

    #[test]
    fn test_validator_bad_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let args = CheckArgs {
            config: Some(path),
            ..CheckArgs::default()
        };
        let err = build_validator(&args).err().unwrap();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
