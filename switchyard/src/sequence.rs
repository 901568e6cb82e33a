//! Ordered chain-of-responsibility component.
//!
//! A [`SequenceComponent`] tries its subkeys in order. Before anything
//! runs, every subkey is checked against the routing table, so a missing
//! entry fails the call without side effects. The walk stops at the first
//! subkey that resolves the call, and a sequence entered on a context that
//! is already resolved runs nothing; if every subkey defers, the sequence
//! defers too and the context goes back to whoever invoked it still
//! unresolved.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;
use crate::key::ComponentKey;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

/// A component that forwards to an ordered list of other keys.
pub struct SequenceComponent<C: Contract> {
    subkeys: Vec<ComponentKey>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: Contract> SequenceComponent<C> {
    /// Create a sequence over `subkeys`. Subkeys must be unique.
    pub fn new<I, K>(subkeys: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = K>,
        K: Into<ComponentKey>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for key in subkeys {
            let key = key.into();
            if !seen.insert(key.clone()) {
                return Err(RouteError::DuplicateKey(key));
            }
            ordered.push(key);
        }
        Ok(Self {
            subkeys: ordered,
            _contract: PhantomData,
        })
    }

    /// The subkeys in the order they are tried.
    pub fn subkeys(&self) -> &[ComponentKey] {
        &self.subkeys
    }
}

impl<C: Contract> Component<C> for SequenceComponent<C> {
    fn handle(&self, ctx: &mut CallContext<'_, C>, _call: C::Call) -> Result<(), RouteError> {
        let routing = ctx.routing();
        if let Some(missing) = self
            .subkeys
            .iter()
            .find(|key| !routing.contains(ctx.entry_point(), key))
        {
            return Err(RouteError::UnknownKey(missing.clone()));
        }

        if ctx.is_resolved() {
            return Ok(());
        }

        // Each step reads the context's current arguments, so a rewrite by
        // an earlier subkey is what later subkeys see.
        for (step, key) in self.subkeys.iter().enumerate() {
            tracing::trace!(key = %key, step, operation = ctx.operation_name(), "sequence step");
            ctx.call_target(key)?;
            if ctx.is_resolved() {
                return Ok(());
            }
        }

        Ok(())
    }
}

impl<C: Contract> fmt::Debug for SequenceComponent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceComponent")
            .field("subkeys", &self.subkeys)
            .finish()
    }
}
