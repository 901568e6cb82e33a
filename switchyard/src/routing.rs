//! Routing tables: a default registry, per-instance overrides and the
//! start key.
//!
//! Overrides are kept in an explicit identity-keyed table rather than
//! attached to the instances themselves. The table only holds weak
//! references to the identities, so an override whose [`InstanceId`] has
//! been dropped everywhere stops counting and is pruned on the next
//! override registration.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;
use crate::key::ComponentKey;
use crate::registry::MethodRegistry;
use crate::sequence::SequenceComponent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct Identity {
    serial: u64,
}

/// Identity of an object that dispatches through a routing table.
///
/// Clones share the identity. Two ids minted by separate [`InstanceId::new`]
/// calls are always distinct, even after one of them has been dropped.
#[derive(Clone)]
pub struct InstanceId(Arc<Identity>);

impl InstanceId {
    /// Mint a fresh identity.
    pub fn new() -> Self {
        Self(Arc::new(Identity {
            serial: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        }))
    }

    fn serial(&self) -> u64 {
        self.0.serial
    }

    fn downgrade(&self) -> Weak<Identity> {
        Arc::downgrade(&self.0)
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for InstanceId {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial()
    }
}

impl Eq for InstanceId {}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.serial())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance-{}", self.serial())
    }
}

/// Tunables for a routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Maximum nesting of `call_target` invocations within one external
    /// call. Cyclic routing trips this instead of exhausting the stack.
    /// Must be at least 1.
    pub max_depth: usize,
}

impl RoutingOptions {
    /// Default for [`RoutingOptions::max_depth`].
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Reject options no dispatch could succeed under.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.max_depth == 0 {
            return Err(RouteError::InvalidOptions(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

struct Override<C: Contract> {
    owner: Weak<Identity>,
    registry: MethodRegistry<C>,
}

impl<C: Contract> Override<C> {
    fn is_live(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// A default [`MethodRegistry`], identity-scoped override registries and a
/// write-once start key.
///
/// Built once through `&mut` setup calls, then shared (typically behind an
/// `Arc`) and only read during dispatch.
pub struct InstanceRouting<C: Contract> {
    defaults: MethodRegistry<C>,
    overrides: HashMap<u64, Override<C>>,
    start: Option<ComponentKey>,
    options: RoutingOptions,
}

impl<C: Contract> InstanceRouting<C> {
    /// Create an empty routing table with default options.
    pub fn new() -> Self {
        Self {
            defaults: MethodRegistry::new(),
            overrides: HashMap::new(),
            start: None,
            options: RoutingOptions::default(),
        }
    }

    /// Replace the routing options (builder pattern).
    ///
    /// Fails with [`RouteError::InvalidOptions`] if `options` do not
    /// validate.
    pub fn with_options(mut self, options: RoutingOptions) -> Result<Self, RouteError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// The routing options in effect.
    pub fn options(&self) -> RoutingOptions {
        self.options
    }

    /// Read access to the default registry.
    pub fn default_registry(&self) -> &MethodRegistry<C> {
        &self.defaults
    }

    /// Register a component in the default registry.
    pub fn add_default_component(
        &mut self,
        key: impl Into<ComponentKey>,
        component: Arc<dyn Component<C>>,
    ) -> Result<(), RouteError> {
        let key = key.into();
        self.defaults.add_component(key.clone(), component)?;
        tracing::debug!(key = %key, "component registered");
        Ok(())
    }

    /// Register a sequence over `subkeys` under `key`.
    ///
    /// Subkeys need not be registered yet; they are checked each time the
    /// sequence runs.
    pub fn add_default_sequence<I, K>(
        &mut self,
        key: impl Into<ComponentKey>,
        subkeys: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        let sequence = SequenceComponent::<C>::new(subkeys)?;
        self.add_default_component(key, Arc::new(sequence))
    }

    /// Give `instance` its own registry containing only `keys`, cloned from
    /// the default registry as it stands now.
    pub fn override_instance<I, K>(&mut self, instance: &InstanceId, keys: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        self.overrides.retain(|_, o| o.is_live());
        if self.overrides.contains_key(&instance.serial()) {
            return Err(RouteError::OverrideExists);
        }
        let registry = self.defaults.clone_subset(keys)?;
        tracing::debug!(
            instance = %instance,
            keys = registry.len(),
            "instance override created"
        );
        self.overrides.insert(
            instance.serial(),
            Override {
                owner: instance.downgrade(),
                registry,
            },
        );
        Ok(())
    }

    /// Whether `instance` has an override registry.
    pub fn has_override(&self, instance: &InstanceId) -> bool {
        self.override_for(instance).is_some()
    }

    fn override_for(&self, instance: &InstanceId) -> Option<&MethodRegistry<C>> {
        self.overrides
            .get(&instance.serial())
            .filter(|o| o.is_live())
            .map(|o| &o.registry)
    }

    /// The registry `instance` dispatches through.
    pub fn registry_for(&self, instance: &InstanceId) -> &MethodRegistry<C> {
        self.override_for(instance).unwrap_or(&self.defaults)
    }

    /// Look up `key` for `instance`, honoring its override if it has one.
    pub fn get_component(
        &self,
        instance: &InstanceId,
        key: &ComponentKey,
    ) -> Result<Arc<dyn Component<C>>, RouteError> {
        self.registry_for(instance).get_component(key)
    }

    /// Whether `key` resolves for `instance`.
    pub fn contains(&self, instance: &InstanceId, key: &ComponentKey) -> bool {
        self.registry_for(instance).contains(key)
    }

    /// The start key, if one has been set.
    pub fn default_start(&self) -> Option<&ComponentKey> {
        self.start.as_ref()
    }

    /// Set the start key. It must name a registered default component and
    /// can only be set once.
    pub fn set_default_start(&mut self, key: impl Into<ComponentKey>) -> Result<(), RouteError> {
        let key = key.into();
        if key.is_empty() {
            return Err(RouteError::InvalidStart("start key is empty".into()));
        }
        if let Some(existing) = &self.start {
            return Err(RouteError::InvalidStart(format!(
                "start key already set to {existing}"
            )));
        }
        if !self.defaults.contains(&key) {
            return Err(RouteError::InvalidStart(format!("{key} is not registered")));
        }
        tracing::debug!(key = %key, "start key set");
        self.start = Some(key);
        Ok(())
    }

    /// Create a fresh, unresolved context for one external call made by
    /// `entry`. The operation name is the one `arguments` carries.
    pub fn build_context(&self, entry: &InstanceId, arguments: C::Call) -> CallContext<'_, C> {
        CallContext::new(self, entry.clone(), arguments)
    }
}

impl<C: Contract> Default for InstanceRouting<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Contract> fmt::Debug for InstanceRouting<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRouting")
            .field("defaults", &self.defaults)
            .field("overrides", &self.overrides.len())
            .field("start", &self.start)
            .field("options", &self.options)
            .finish()
    }
}
