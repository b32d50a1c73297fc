//! Schema registry
//!
//! Holds the schemas records can be validated against, keyed by schema name:
//! - built-in schemas registered at construction
//! - extra schemas loaded from `*.json` definition files
//! - a schema name can be registered only once

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::builtin;
use super::config::ValidatorConfig;
use super::errors::{SchemaError, SchemaResult};
use super::naming::collection_name;
use super::types::Schema;

/// In-memory schema registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding Event, Booking, User and Product.
    pub fn builtin() -> Self {
        let schemas = builtin::all()
            .into_iter()
            .map(|schema| (schema.name.clone(), schema))
            .collect();
        Self { schemas }
    }

    /// Builds the registry a config describes.
    pub fn from_config(config: &ValidatorConfig) -> SchemaResult<Self> {
        let mut registry = if config.builtin_schemas {
            Self::builtin()
        } else {
            Self::new()
        };

        if let Some(dir) = &config.schema_dir {
            registry.load_dir(dir)?;
        }

        Ok(registry)
    }

    /// Registers a schema after checking its structure.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(&schema.name, e))?;

        self.insert_new(schema)
    }

    /// Inserts an already checked schema, refusing to replace an existing name.
    fn insert_new(&mut self, schema: Schema) -> SchemaResult<()> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateSchema(schema.name));
        }

        debug!(schema = %schema.name, fields = schema.fields.len(), "schema registered");
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Loads every `*.json` schema definition in `dir`, in file name order.
    ///
    /// A missing directory loads nothing. Either every file loads or the
    /// registry is left unchanged. Returns the number of schemas loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "schema directory absent, nothing to load");
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| SchemaError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SchemaError::io(dir, e))?.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                warn!(path = %path.display(), "skipping non-JSON file in schema directory");
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut staged = self.clone();
        for path in &paths {
            staged.load_schema_file(path)?;
        }
        *self = staged;

        info!(dir = %dir.display(), count = paths.len(), "loaded schema definitions");
        Ok(paths.len())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(path.display().to_string(), e))?;

        self.insert_new(schema)
    }

    /// Saves a schema definition as `schema_<name>.json` under `dir`.
    ///
    /// An existing file for the same name is never overwritten.
    pub fn save_schema(&self, dir: &Path, schema: &Schema) -> SchemaResult<PathBuf> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed(&schema.name, e))?;

        let content = serde_json::to_string_pretty(schema)?;
        fs::create_dir_all(dir).map_err(|e| SchemaError::io(dir, e))?;

        let path = dir.join(format!("schema_{}.json", schema.name));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => SchemaError::DuplicateSchema(schema.name.clone()),
                _ => SchemaError::io(&path, e),
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| SchemaError::io(&path, e))?;

        info!(schema = %schema.name, path = %path.display(), "schema definition saved");
        Ok(path)
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Gets a schema by name, failing with `UnknownSchema`.
    pub fn require(&self, name: &str) -> SchemaResult<&Schema> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Finds the schema whose records live in `collection`.
    pub fn find_by_collection(&self, collection: &str) -> Option<&Schema> {
        self.schemas
            .values()
            .find(|schema| collection_name(&schema.name) == collection)
    }

    /// Registered schema names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
