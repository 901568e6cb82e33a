//! Append-only mapping from key to component.

use crate::contract::{Component, Contract};
use crate::error::RouteError;
use crate::key::ComponentKey;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key → component mapping.
///
/// Keys are immutable once set: there is no removal and no redefinition.
/// Iteration follows insertion order.
pub struct MethodRegistry<C: Contract> {
    order: Vec<ComponentKey>,
    components: HashMap<ComponentKey, Arc<dyn Component<C>>>,
}

impl<C: Contract> MethodRegistry<C> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            components: HashMap::new(),
        }
    }

    /// Register a component under `key`.
    pub fn add_component(
        &mut self,
        key: impl Into<ComponentKey>,
        component: Arc<dyn Component<C>>,
    ) -> Result<(), RouteError> {
        let key = key.into();
        if self.components.contains_key(&key) {
            return Err(RouteError::DuplicateKey(key));
        }
        self.order.push(key.clone());
        self.components.insert(key, component);
        Ok(())
    }

    /// Look up the component registered under `key`.
    pub fn get_component(&self, key: &ComponentKey) -> Result<Arc<dyn Component<C>>, RouteError> {
        self.components
            .get(key)
            .cloned()
            .ok_or_else(|| RouteError::UnknownKey(key.clone()))
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.components.contains_key(key)
    }

    /// Registered keys in insertion order. Each call starts a fresh pass.
    pub fn keys(&self) -> impl Iterator<Item = &ComponentKey> + '_ {
        self.order.iter()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Build a new registry holding only `keys`, looked up from `self`.
    ///
    /// The result is a snapshot: later additions to `self` do not show up
    /// in it.
    pub fn clone_subset<I, K>(&self, keys: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        let mut subset = Self::new();
        for key in keys {
            let key = key.into();
            let component = self.get_component(&key)?;
            subset.add_component(key, component)?;
        }
        Ok(subset)
    }
}

impl<C: Contract> Default for MethodRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Contract> fmt::Debug for MethodRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("keys", &self.order)
            .finish()
    }
}
