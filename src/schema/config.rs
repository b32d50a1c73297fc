//! Validator configuration
//!
//! Controls how undeclared fields are treated and where extra schema definitions
//! are loaded from.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};

/// Treatment of raw fields that the schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Drop undeclared fields silently
    #[default]
    Ignore,
    /// Report each undeclared field as an error
    Reject,
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Policy for undeclared fields (default: ignore)
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    /// Register Event, Booking, User and Product (default: true)
    #[serde(default = "default_builtin_schemas")]
    pub builtin_schemas: bool,

    /// Directory of additional `*.json` schema definitions (default: none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_dir: Option<PathBuf>,
}

fn default_builtin_schemas() -> bool {
    true
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::default(),
            builtin_schemas: default_builtin_schemas(),
            schema_dir: None,
        }
    }
}

impl ValidatorConfig {
    /// Config that rejects undeclared fields
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Reject,
            ..Default::default()
        }
    }

    /// Parses a JSON config document
    pub fn from_json_str(content: &str) -> SchemaResult<Self> {
        serde_json::from_str(content).map_err(|e| SchemaError::InvalidConfig(e.to_string()))
    }

    /// Reads a JSON config file
    pub fn from_file(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
        Self::from_json_str(&content)
    }
}
