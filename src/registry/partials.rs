//! Named sub-templates included via `{{> name}}`
//!
//! Partials can be registered one at a time or loaded in bulk from a TOML
//! partial set:
//!
//! ```toml
//! [metadata]
//! name = "react"
//!
//! [partials]
//! header = "// Generated file, do not edit"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a partial set
#[derive(Error, Debug)]
pub enum PartialSetError {
    #[error("failed to read partial set file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse partial set TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A named collection of partials loaded from TOML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialSet {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Partial name -> raw template text, ordered by name
    pub partials: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlPartialSet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    partials: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl PartialSet {
    /// Load a partial set from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PartialSetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a partial set from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, PartialSetError> {
        let parsed: TomlPartialSet = toml::from_str(content)?;
        let (name, description) = match parsed.metadata {
            Some(m) => (m.name, m.description),
            None => (None, None),
        };
        Ok(Self {
            name,
            description,
            partials: parsed.partials,
        })
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }
}

/// Name to partial text store; later registrations replace earlier ones
#[derive(Debug, Clone, Default)]
pub struct PartialRegistry {
    partials: HashMap<String, String>,
}

impl PartialRegistry {
    /// Create an empty partial registry
    ///
    /// No partials are built in; hosts register their own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a partial, replacing any existing entry with the same name
    pub fn register(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.partials.insert(name.into(), text.into());
    }

    /// Register every partial of a set, returning how many were added
    pub fn load(&mut self, set: &PartialSet) -> usize {
        for (name, text) in &set.partials {
            self.register(name.clone(), text.clone());
        }
        set.partials.len()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.partials.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.partials.contains_key(name)
    }

    /// Registered partial names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.partials.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.partials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partials.is_empty()
    }
}
