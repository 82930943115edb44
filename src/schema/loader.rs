//! Schema loader: reads named schemas from disk into an in-memory catalog
//!
//! - One file per schema: `<dir>/<name>.json`
//! - The schema name is the file stem
//! - Registered schemas are immutable; re-registering a name is an error
//!
//! Schemas handed out by the loader are borrowed. Callers clone them per
//! request, so per-call mutation never leaks back into the catalog.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::errors::{LoaderError, LoaderResult};
use super::types::Schema;

/// Catalog of named schemas
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: BTreeMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a loader for `schema_dir`. Nothing is read until `load_all`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: BTreeMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is treated as empty.
    pub fn load_all(&mut self) -> LoaderResult<usize> {
        if !self.schema_dir.exists() {
            debug!(dir = %self.schema_dir.display(), "schema directory missing, nothing to load");
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| LoaderError::Io {
            path: self.schema_dir.clone(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoaderError::Io {
                path: self.schema_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let count = paths.len();
        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(count)
    }

    /// Loads a single schema file, named after its stem.
    fn load_schema_file(&mut self, path: &Path) -> LoaderResult<()> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LoaderError::Malformed {
                path: path.to_path_buf(),
                reason: "file name is not valid UTF-8".into(),
            })?
            .to_string();

        let content = fs::read_to_string(path).map_err(|e| LoaderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| LoaderError::Malformed {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {}", e),
        })?;

        let schema = Schema::from_value(&value).map_err(|e| LoaderError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(schema = %name, fields = schema.len(), "loaded schema");
        self.register(name, schema)
    }

    /// Registers a schema directly (for programmatic creation).
    pub fn register(&mut self, name: impl Into<String>, schema: Schema) -> LoaderResult<()> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(LoaderError::Duplicate(name));
        }
        self.schemas.insert(name, schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Names of all loaded schemas, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
