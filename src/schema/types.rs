//! Declarative schema model
//!
//! Schemas are JSON objects mapping field names to rules. A rule is either
//! a bare type name or an object:
//!
//! ```json
//! {
//!   "name":    "string",
//!   "age":     { "type": "int", "min": 0, "default": 18 },
//!   "email":   { "type": "string", "required": true, "validate": "email" },
//!   "address": { "type": "object", "fields": { "city": "string" } },
//!   "tags":    { "type": "array", "items": { "type": "string", "maxlength": 16 } }
//! }
//! ```
//!
//! Supported types:
//! - string, int, float (alias number), bool (alias boolean)
//! - date: RFC 3339 timestamp, `YYYY-MM-DD` or epoch milliseconds
//! - any (alias mixed): no type check
//! - object: nested fields
//! - array: homogeneous items

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::validation::custom::{CustomValidator, ValidatorBindings};
use crate::validation::errors::ConfigError;
use crate::validation::path;

/// Field data types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Integer (no fractional part)
    Int,
    /// Any number
    #[serde(alias = "number")]
    Float,
    /// Boolean
    #[serde(alias = "boolean")]
    Bool,
    /// Date or timestamp
    Date,
    /// Anything, no type check
    #[serde(alias = "mixed")]
    Any,
    /// Nested object with its own rules
    Object {
        #[serde(default)]
        fields: BTreeMap<String, FieldRule>,
    },
    /// Homogeneous array
    Array {
        #[serde(default)]
        items: Box<FieldRule>,
    },
}

impl FieldType {
    /// Parses a shorthand type name (`"string"`, `"number"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "string" => FieldType::String,
            "int" | "integer" => FieldType::Int,
            "float" | "number" => FieldType::Float,
            "bool" | "boolean" => FieldType::Bool,
            "date" => FieldType::Date,
            "any" | "mixed" => FieldType::Any,
            "object" => FieldType::Object {
                fields: BTreeMap::new(),
            },
            "array" => FieldType::Array {
                items: Box::default(),
            },
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the type name used in cast error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Int => "Int",
            FieldType::Float => "Number",
            FieldType::Bool => "Boolean",
            FieldType::Date => "Date",
            FieldType::Any => "Mixed",
            FieldType::Object { .. } => "Object",
            FieldType::Array { .. } => "Array",
        }
    }

    /// Checks the JSON shape of `value` against this type. No coercion.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Date => match value {
                Value::String(s) => is_date(s),
                Value::Number(n) => n.is_i64() || n.is_u64(),
                _ => false,
            },
            FieldType::Any => true,
            FieldType::Object { .. } => value.is_object(),
            FieldType::Array { .. } => value.is_array(),
        }
    }
}

fn is_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Reference from a rule to a custom validator.
///
/// Schemas loaded from JSON carry names; `Schema::resolve_validators`
/// swaps them for the bound functions.
#[derive(Clone)]
pub enum ValidatorRef {
    Named(String),
    Bound {
        name: String,
        validator: Arc<dyn CustomValidator>,
    },
}

impl ValidatorRef {
    pub fn name(&self) -> &str {
        match self {
            ValidatorRef::Named(name) => name,
            ValidatorRef::Bound { name, .. } => name,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, ValidatorRef::Bound { .. })
    }
}

impl fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ValidatorRef::Bound { name, .. } => f.debug_tuple("Bound").field(name).finish(),
        }
    }
}

/// Rule for a single field
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RuleRepr")]
pub struct FieldRule {
    /// Field data type
    pub field_type: FieldType,
    /// Whether field must be present and non-empty
    pub required: bool,
    /// Value used when the field is missing
    pub default: Option<Value>,
    /// Allowed values
    pub enum_values: Option<Vec<Value>>,
    /// Numeric bounds
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// String length bounds (in characters)
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Regex the string must match
    pub pattern: Option<Regex>,
    /// Custom validators, run in order
    pub validators: Vec<ValidatorRef>,
}

impl Default for FieldRule {
    fn default() -> Self {
        Self::of(FieldType::Any)
    }
}

impl FieldRule {
    /// Create an optional rule of the given type with no constraints
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
            enum_values: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            validators: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn int() -> Self {
        Self::of(FieldType::Int)
    }

    pub fn float() -> Self {
        Self::of(FieldType::Float)
    }

    pub fn bool() -> Self {
        Self::of(FieldType::Bool)
    }

    pub fn date() -> Self {
        Self::of(FieldType::Date)
    }

    pub fn any() -> Self {
        Self::of(FieldType::Any)
    }

    pub fn object(fields: BTreeMap<String, FieldRule>) -> Self {
        Self::of(FieldType::Object { fields })
    }

    pub fn array(items: FieldRule) -> Self {
        Self::of(FieldType::Array {
            items: Box::new(items),
        })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn with_max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Reference a validator by name, resolved later against bindings
    pub fn with_validator(mut self, name: impl Into<String>) -> Self {
        self.validators.push(ValidatorRef::Named(name.into()));
        self
    }

    /// Attach a validator function directly
    pub fn with_bound_validator(
        mut self,
        name: impl Into<String>,
        validator: Arc<dyn CustomValidator>,
    ) -> Self {
        self.validators.push(ValidatorRef::Bound {
            name: name.into(),
            validator,
        });
        self
    }

    /// Marks the rule required and drops its default.
    pub fn make_required(&mut self) {
        self.default = None;
        self.required = true;
    }

    fn check_structure(&self, path: &str) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(format!("'{}': min ({}) is greater than max ({})", path, min, max));
            }
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(format!(
                    "'{}': minlength ({}) is greater than maxlength ({})",
                    path, min, max
                ));
            }
        }

        match &self.field_type {
            FieldType::Object { fields } => {
                for (name, rule) in fields {
                    rule.check_structure(&path::join(path, name))?;
                }
            }
            FieldType::Array { items } => items.check_structure(path)?,
            _ => {}
        }

        Ok(())
    }

    fn resolve(&mut self, path: &str, bindings: &ValidatorBindings) -> Result<(), ConfigError> {
        for slot in self.validators.iter_mut() {
            let name = match slot {
                ValidatorRef::Named(name) => name.clone(),
                ValidatorRef::Bound { .. } => continue,
            };
            let validator = bindings.get(&name).ok_or_else(|| ConfigError::UnknownValidator {
                path: path.to_string(),
                name: name.clone(),
            })?;
            *slot = ValidatorRef::Bound { name, validator };
        }

        match &mut self.field_type {
            FieldType::Object { fields } => {
                for (name, rule) in fields.iter_mut() {
                    rule.resolve(&path::join(path, name), bindings)?;
                }
            }
            FieldType::Array { items } => items.resolve(path, bindings)?,
            _ => {}
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleRepr {
    Short(String),
    Full(Box<FullRule>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

#[derive(Deserialize)]
struct FullRule {
    #[serde(flatten)]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default, rename = "enum")]
    enum_values: Option<Vec<Value>>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default, rename = "minlength", alias = "min_length")]
    min_length: Option<usize>,
    #[serde(default, rename = "maxlength", alias = "max_length")]
    max_length: Option<usize>,
    #[serde(default, rename = "match", alias = "pattern")]
    pattern: Option<String>,
    #[serde(default, rename = "validate")]
    validators: OneOrMany,
}

impl TryFrom<RuleRepr> for FieldRule {
    type Error = String;

    fn try_from(repr: RuleRepr) -> Result<Self, Self::Error> {
        match repr {
            RuleRepr::Short(name) => FieldType::from_name(&name)
                .map(FieldRule::of)
                .ok_or_else(|| format!("unknown field type '{}'", name)),
            RuleRepr::Full(full) => {
                let pattern = full
                    .pattern
                    .map(|p| Regex::new(&p).map_err(|e| format!("invalid match pattern '{}': {}", p, e)))
                    .transpose()?;
                let names = match full.validators {
                    OneOrMany::One(name) => vec![name],
                    OneOrMany::Many(names) => names,
                };
                Ok(FieldRule {
                    field_type: full.field_type,
                    required: full.required,
                    default: full.default,
                    enum_values: full.enum_values,
                    min: full.min,
                    max: full.max,
                    min_length: full.min_length,
                    max_length: full.max_length,
                    pattern,
                    validators: names.into_iter().map(ValidatorRef::Named).collect(),
                })
            }
        }
    }
}

/// A declarative schema: top-level field name to rule.
///
/// Fields iterate in sorted order, which makes engine output deterministic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: BTreeMap<String, FieldRule>,
}

impl Schema {
    pub fn new(fields: BTreeMap<String, FieldRule>) -> Self {
        Self { fields }
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// Parses a schema from its JSON form and checks its structure.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::SchemaNotObject(path::json_type_name(value)));
        }

        let schema: Schema = serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::InvalidSchema(e.to_string()))?;
        schema.validate_structure().map_err(ConfigError::InvalidSchema)?;

        Ok(schema)
    }

    /// Validates the schema itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        for (name, rule) in &self.fields {
            rule.check_structure(name)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds the rule addressed by a field path, descending through objects.
    pub fn rule(&self, field_path: &str) -> Option<&FieldRule> {
        let segments = path::segments(field_path);
        let (first, rest) = segments.split_first()?;
        let mut rule = self.fields.get(*first)?;
        for segment in rest {
            rule = match &rule.field_type {
                FieldType::Object { fields } => fields.get(*segment)?,
                _ => return None,
            };
        }
        Some(rule)
    }

    pub fn rule_mut(&mut self, field_path: &str) -> Option<&mut FieldRule> {
        let segments = path::segments(field_path);
        let (first, rest) = segments.split_first()?;
        let mut rule = self.fields.get_mut(*first)?;
        for segment in rest {
            rule = match &mut rule.field_type {
                FieldType::Object { fields } => fields.get_mut(*segment)?,
                _ => return None,
            };
        }
        Some(rule)
    }

    /// Marks the rule at `field_path` required and clears its default.
    ///
    /// Returns false when the schema has no rule for that path.
    pub fn require(&mut self, field_path: &str) -> bool {
        match self.rule_mut(field_path) {
            Some(rule) => {
                rule.make_required();
                true
            }
            None => false,
        }
    }

    /// Replaces every named validator reference with its bound function.
    pub fn resolve_validators(&mut self, bindings: &ValidatorBindings) -> Result<(), ConfigError> {
        for (name, rule) in self.fields.iter_mut() {
            rule.resolve(name, bindings)?;
        }
        Ok(())
    }
}
