//! Validation request
//!
//! Built either with the typed builder or from a dynamic JSON object:
//!
//! ```json
//! {
//!   "data":     { "name": "bob" },
//!   "required": ["name", "age"],
//!   "optional": ["age"],
//!   "schema":   { "name": "string" },
//!   "validate": { "phone": { "type": "string", "validate": "phone" } }
//! }
//! ```
//!
//! `necessary` is accepted as an alias of `required`. Missing or null keys
//! mean empty.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::errors::ConfigError;
use super::path::json_type_name;
use crate::schema::Schema;

/// One call's worth of input to `FieldValidator::validate`
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// Candidate field values; must be an object
    pub data: Value,
    /// Paths that must be present and truthy, in order
    pub required: Vec<String>,
    /// Paths exempt from required-kind errors
    pub optional: BTreeSet<String>,
    /// Primary schema
    pub schema: Option<Schema>,
    /// Secondary schema, validated after the primary one
    pub custom_schema: Option<Schema>,
}

impl ValidationRequest {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            required: Vec::new(),
            optional: BTreeSet::new(),
            schema: None,
            custom_schema: None,
        }
    }

    pub fn require(mut self, path: impl Into<String>) -> Self {
        self.required.push(path.into());
        self
    }

    pub fn with_required<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn optional(mut self, path: impl Into<String>) -> Self {
        self.optional.insert(path.into());
        self
    }

    pub fn with_optional<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(paths.into_iter().map(Into::into));
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

    /// Parses a request from its dynamic JSON form.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ConfigError::RequestNotObject(json_type_name(value)))?;

        let data = match obj.get("data") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(v) if v.is_object() => v.clone(),
            Some(v) => return Err(ConfigError::DataNotObject(json_type_name(v))),
        };

        let required_key = if obj.contains_key("required") {
            "required"
        } else {
            "necessary"
        };

        Ok(Self {
            data,
            required: path_list(obj, required_key)?,
            optional: path_list(obj, "optional")?.into_iter().collect(),
            schema: schema_entry(obj, "schema")?,
            custom_schema: schema_entry(obj, "validate")?,
        })
    }

    /// Checks the request shape. Runs before any schema interaction.
    pub fn check_shape(&self) -> Result<(), ConfigError> {
        if !self.data.is_object() {
            return Err(ConfigError::DataNotObject(json_type_name(&self.data)));
        }

        let mut all_paths = self.required.iter().chain(self.optional.iter());
        if all_paths.any(|p| p.trim().is_empty()) {
            return Err(ConfigError::EmptyPath);
        }

        Ok(())
    }
}

fn path_list(obj: &Map<String, Value>, key: &'static str) -> Result<Vec<String>, ConfigError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(ConfigError::NotPathList { field: key })
            })
            .collect(),
        Some(_) => Err(ConfigError::NotPathList { field: key }),
    }
}

fn schema_entry(obj: &Map<String, Value>, key: &str) -> Result<Option<Schema>, ConfigError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Schema::from_value(v).map(Some),
    }
}
