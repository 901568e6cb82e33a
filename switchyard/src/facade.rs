//! The object outside callers dispatch through.

use crate::context::run_chain;
use crate::contract::{Contract, Operation};
use crate::error::RouteError;
use crate::key::ComponentKey;
use crate::routing::{InstanceId, InstanceRouting};
use std::fmt;
use std::sync::Arc;

/// Dispatch primitive bound to a routing table and an instance identity.
///
/// Every call starts at the table's start key and must come back resolved.
/// Typed façades hold an `EntryFacade` in a private field and expose one
/// method per operation, so the raw `dispatch` never becomes part of their
/// public surface:
///
/// ```rust,ignore
/// pub struct Repeater {
///     entry: EntryFacade<RepeatContract>,
/// }
///
/// impl Repeater {
///     pub fn repeat_forward(&self, value: &str, times: usize) -> Result<String, RouteError> {
///         self.entry.dispatch_map(
///             RepeatCall::RepeatForward { value: value.into(), times },
///             |reply| match reply {
///                 RepeatReply::Repeated(s) => Some(s),
///                 _ => None,
///             },
///         )
///     }
/// }
/// ```
pub struct EntryFacade<C: Contract> {
    routing: Arc<InstanceRouting<C>>,
    instance: InstanceId,
    start: ComponentKey,
}

impl<C: Contract> EntryFacade<C> {
    /// Create a façade with a fresh identity.
    pub fn new(routing: Arc<InstanceRouting<C>>) -> Result<Self, RouteError> {
        Self::with_instance(routing, InstanceId::new())
    }

    /// Create a façade dispatching as `instance`, so any override registered
    /// for that identity applies.
    pub fn with_instance(
        routing: Arc<InstanceRouting<C>>,
        instance: InstanceId,
    ) -> Result<Self, RouteError> {
        let start = routing
            .default_start()
            .cloned()
            .ok_or(RouteError::MissingStart)?;
        Ok(Self {
            routing,
            instance,
            start,
        })
    }

    /// Identity this façade dispatches as.
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    /// The routing table this façade is bound to.
    pub fn routing(&self) -> &Arc<InstanceRouting<C>> {
        &self.routing
    }

    /// Route `call` from the start key and return the resolved reply.
    ///
    /// Fails with [`RouteError::UnresolvedChain`] if the chain completes
    /// without resolving. Handler errors are returned unchanged.
    pub fn dispatch(&self, call: C::Call) -> Result<C::Reply, RouteError> {
        let operation = call.name();
        tracing::debug!(
            operation,
            instance = %self.instance,
            start = %self.start,
            "dispatch"
        );
        let result = run_chain(&*self.routing, &self.instance, &self.start, call, 0);
        match &result {
            Ok(_) => tracing::debug!(operation, "dispatch resolved"),
            Err(e) => tracing::debug!(operation, error = %e, "dispatch failed"),
        }
        result
    }

    /// Like [`EntryFacade::dispatch`], then narrow the reply to the
    /// operation's return type. `None` from `narrow` is reported as
    /// [`RouteError::UnexpectedReply`].
    pub fn dispatch_map<T>(
        &self,
        call: C::Call,
        narrow: impl FnOnce(C::Reply) -> Option<T>,
    ) -> Result<T, RouteError> {
        let operation = call.name();
        narrow(self.dispatch(call)?).ok_or(RouteError::UnexpectedReply { operation })
    }
}

impl<C: Contract> fmt::Debug for EntryFacade<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFacade")
            .field("instance", &self.instance)
            .field("start", &self.start)
            .finish()
    }
}
