//! Validator configuration
//!
//! Supplied once, when the `FieldValidator` is constructed:
//! - named custom validator bindings
//! - the result formatter
//! - settings (serde-loadable from a JSON file)

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::custom::{CustomValidator, ValidatorBindings};
use super::errors::SettingsError;
use super::format::{DefaultFormatter, ResultFormatter};

/// Plain settings, loadable from disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSettings {
    /// Turn a non-empty error list into `ValidateError::Rejected`
    #[serde(default)]
    pub fail_on_errors: bool,
}

impl ValidatorSettings {
    /// Reads settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Full configuration of a `FieldValidator`
#[derive(Clone)]
pub struct ValidatorConfig {
    pub bindings: ValidatorBindings,
    pub formatter: Arc<dyn ResultFormatter>,
    pub settings: ValidatorSettings,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            bindings: ValidatorBindings::new(),
            formatter: Arc::new(DefaultFormatter),
            settings: ValidatorSettings::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: ValidatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_binding(mut self, name: impl Into<String>, validator: Arc<dyn CustomValidator>) -> Self {
        self.bindings.bind(name, validator);
        self
    }

    pub fn with_bindings(mut self, bindings: ValidatorBindings) -> Self {
        self.bindings.extend(bindings);
        self
    }

    pub fn with_formatter(mut self, formatter: impl ResultFormatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Reject non-empty results instead of returning them.
    pub fn fail_on_errors(mut self) -> Self {
        self.settings.fail_on_errors = true;
        self
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("bindings", &self.bindings)
            .field("settings", &self.settings)
            .finish()
    }
}
