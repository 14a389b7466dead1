//! Per-render context: variable values plus helper and partial overrides

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;

use crate::registry::{Helper, HelperError};
use crate::value::Value;

/// Variable name -> value, in insertion order
pub type Variables = IndexMap<String, Value>;

/// Errors that can occur when loading a context document
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("failed to read context file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse context JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("failed to parse context TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("context document must be a table of variables, found {0}")]
    NotATable(&'static str),
}

/// Everything a single render sees besides the shared registry
///
/// Helpers and partials set here shadow registry entries of the same name
/// for this render only.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub variables: Variables,
    pub helpers: HashMap<String, Helper>,
    pub partials: HashMap<String, String>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context from a variable map
    pub fn with_variables(variables: Variables) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    /// Build a context from a JSON object
    pub fn from_json(json: serde_json::Value) -> Result<Self, ContextError> {
        match Value::from(json) {
            Value::Object(variables) => Ok(Self::with_variables(variables)),
            other => Err(ContextError::NotATable(other.kind_name())),
        }
    }

    /// Build a context from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, ContextError> {
        let json: serde_json::Value = serde_json::from_str(content)?;
        Self::from_json(json)
    }

    /// Build a context from TOML text; the top-level table holds the variables
    pub fn from_toml_str(content: &str) -> Result<Self, ContextError> {
        let json: serde_json::Value = toml::from_str(content)?;
        Self::from_json(json)
    }

    /// Load a context file, choosing TOML for `.toml` files and JSON otherwise
    pub fn from_file(path: &Path) -> Result<Self, ContextError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Add or replace a variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a per-render helper override
    pub fn with_helper<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[&str]) -> Result<String, HelperError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.helpers.insert(name.clone(), Helper::new(name, func));
        self
    }

    /// Add a per-render partial override
    pub fn with_partial(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.partials.insert(name.into(), text.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}
