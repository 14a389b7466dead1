//! Helper and partial registries
//!
//! A [`Registry`] is owned by the host application and passed to every
//! render. It is built once (seeded with the built-in helpers), mutated only
//! through explicit `register_*` calls, and only read while rendering. Hosts
//! that render from several threads should finish registration before
//! sharing it.

mod helpers;
mod partials;

pub use helpers::{Helper, HelperError, HelperFn, HelperRegistry};
pub use partials::{PartialRegistry, PartialSet, PartialSetError};

/// The helper and partial stores consulted by the renderer
#[derive(Debug, Clone)]
pub struct Registry {
    helpers: HelperRegistry,
    partials: PartialRegistry,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create a registry with the built-in helpers and no partials
    pub fn new() -> Self {
        Self {
            helpers: HelperRegistry::new(),
            partials: PartialRegistry::new(),
        }
    }

    /// Create a registry without built-ins
    pub fn empty() -> Self {
        Self {
            helpers: HelperRegistry::empty(),
            partials: PartialRegistry::new(),
        }
    }

    /// Register a helper; an existing helper with the same name is replaced
    pub fn register_helper<F>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(&[&str]) -> Result<String, HelperError> + Send + Sync + 'static,
    {
        self.helpers.register(name, func);
    }

    /// Register a partial; an existing partial with the same name is replaced
    pub fn register_partial(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.partials.register(name, text);
    }

    /// Register every partial in a set
    pub fn load_partials(&mut self, set: &PartialSet) -> usize {
        let count = self.partials.load(set);
        tracing::debug!(set = ?set.name, count, "Loaded partial set");
        count
    }

    pub fn helper(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name)
    }

    pub fn partial(&self, name: &str) -> Option<&str> {
        self.partials.get(name)
    }

    pub fn helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    pub fn partials(&self) -> &PartialRegistry {
        &self.partials
    }
}
