//! Per-invocation dispatch state.

use crate::contract::{Contract, Operation};
use crate::error::RouteError;
use crate::key::ComponentKey;
use crate::routing::{InstanceId, InstanceRouting};
use std::fmt;

/// Resolution marker. Kept private so "nobody has resolved yet" can never
/// be mistaken for a reply value.
enum Resolution<R> {
    Deferred,
    Resolved(R),
}

/// Mutable state of one routed call.
///
/// Created fresh for every external call by
/// [`InstanceRouting::build_context`] and dropped once the call returns.
/// Handlers receive it by `&mut` and use it to resolve the call, rewrite the
/// arguments seen downstream, or redirect to another key.
pub struct CallContext<'r, C: Contract> {
    routing: &'r InstanceRouting<C>,
    entry: InstanceId,
    arguments: C::Call,
    resolution: Resolution<C::Reply>,
    depth: usize,
}

impl<'r, C: Contract> CallContext<'r, C> {
    pub(crate) fn new(routing: &'r InstanceRouting<C>, entry: InstanceId, arguments: C::Call) -> Self {
        Self {
            routing,
            entry,
            arguments,
            resolution: Resolution::Deferred,
            depth: 0,
        }
    }

    /// Continue an enclosing call's depth count.
    pub(crate) fn at_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Arguments the next handler will receive.
    pub fn modified_arguments(&self) -> &C::Call {
        &self.arguments
    }

    /// Replace the arguments the next handler will receive.
    pub fn set_modified_arguments(&mut self, arguments: C::Call) {
        self.arguments = arguments;
    }

    /// Identity of the object that started this call.
    pub fn entry_point(&self) -> &InstanceId {
        &self.entry
    }

    /// Name of the operation being dispatched, taken from the current
    /// arguments.
    pub fn operation_name(&self) -> &'static str {
        self.arguments.name()
    }

    /// The routing table this context is bound to.
    pub fn routing(&self) -> &'r InstanceRouting<C> {
        self.routing
    }

    /// Current `call_target` nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a handler has resolved this call.
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved(_))
    }

    /// The resolved reply, if any.
    pub fn return_value(&self) -> Option<&C::Reply> {
        match &self.resolution {
            Resolution::Resolved(reply) => Some(reply),
            Resolution::Deferred => None,
        }
    }

    /// Resolve the call with `reply`.
    ///
    /// A context resolves at most once: a second call fails with
    /// [`RouteError::AlreadyResolved`] and keeps the first reply.
    pub fn set_return_value(&mut self, reply: C::Reply) -> Result<(), RouteError> {
        if self.is_resolved() {
            return Err(RouteError::AlreadyResolved {
                operation: self.operation_name(),
            });
        }
        self.resolution = Resolution::Resolved(reply);
        Ok(())
    }

    pub(crate) fn take_return_value(self) -> Option<C::Reply> {
        match self.resolution {
            Resolution::Resolved(reply) => Some(reply),
            Resolution::Deferred => None,
        }
    }

    /// Invoke the component registered under `key` with the current
    /// arguments.
    ///
    /// The key is looked up through the entry point's override when it has
    /// one. Whatever the handler does to the context is visible once this
    /// returns; its errors are returned unchanged.
    pub fn call_target(&mut self, key: impl Into<ComponentKey>) -> Result<(), RouteError> {
        let key = key.into();
        let max_depth = self.routing.options().max_depth;
        if self.depth >= max_depth {
            tracing::warn!(
                key = %key,
                operation = self.operation_name(),
                depth = self.depth,
                "dispatch depth limit reached"
            );
            return Err(RouteError::DepthExceeded {
                key,
                depth: self.depth,
            });
        }

        let component = self.routing.get_component(&self.entry, &key)?;
        tracing::trace!(key = %key, operation = self.operation_name(), depth = self.depth, "call target");

        let call = self.arguments.clone();
        self.depth += 1;
        let result = component.handle(self, call);
        self.depth -= 1;
        result
    }

    /// Route a fresh call through this context's entry point, as if the
    /// entry object had been called again from inside the chain.
    ///
    /// The nested call gets its own context (own arguments and resolution)
    /// but continues this context's depth count.
    pub fn call_entry(&self, call: C::Call) -> Result<C::Reply, RouteError> {
        let start = self
            .routing
            .default_start()
            .ok_or(RouteError::MissingStart)?;
        run_chain(self.routing, &self.entry, start, call, self.depth + 1)
    }
}

/// Dispatch `call` from `start` and return the resolved reply.
pub(crate) fn run_chain<C: Contract>(
    routing: &InstanceRouting<C>,
    entry: &InstanceId,
    start: &ComponentKey,
    call: C::Call,
    depth: usize,
) -> Result<C::Reply, RouteError> {
    let mut ctx = routing.build_context(entry, call).at_depth(depth);
    ctx.call_target(start)?;
    ctx.take_return_value().ok_or(RouteError::UnresolvedChain)
}

impl<C: Contract> fmt::Debug for CallContext<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("entry", &self.entry)
            .field("operation", &self.operation_name())
            .field("arguments", &self.arguments)
            .field("resolved", &self.is_resolved())
            .field("depth", &self.depth)
            .finish()
    }
}
