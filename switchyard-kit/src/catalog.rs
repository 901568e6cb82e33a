//! Named component implementations available to the wiring kit.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use switchyard::{Component, Contract};

/// Catalog of component implementations, keyed by name.
///
/// One implementation may back several routing-table keys; every key gets
/// a clone of the same `Arc`.
pub struct ComponentCatalog<C: Contract> {
    components: HashMap<String, Arc<dyn Component<C>>>,
}

impl<C: Contract> ComponentCatalog<C> {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
        }
    }

    /// Add an implementation (builder pattern). A later entry with the same
    /// name replaces the earlier one.
    pub fn with(mut self, name: impl Into<String>, component: Arc<dyn Component<C>>) -> Self {
        self.insert(name, component);
        self
    }

    /// Add an implementation.
    pub fn insert(&mut self, name: impl Into<String>, component: Arc<dyn Component<C>>) {
        self.components.insert(name.into(), component);
    }

    /// Look up an implementation by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Component<C>>> {
        self.components.get(name).cloned()
    }

    /// Names of all implementations, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<C: Contract> Default for ComponentCatalog<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Contract> fmt::Debug for ComponentCatalog<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCatalog")
            .field("components", &self.names())
            .finish()
    }
}
