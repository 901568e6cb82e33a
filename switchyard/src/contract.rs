//! The component contract: what a routed call looks like and what a
//! handler must provide.

use crate::context::CallContext;
use crate::error::RouteError;
use std::fmt;
use std::sync::Arc;

/// One in-flight operation of a contract.
///
/// Usually implemented by an enum with one variant per operation, each
/// variant carrying that operation's parameters.
pub trait Operation {
    /// Name of the operation, used for logging and error reporting.
    fn name(&self) -> &'static str;
}

/// A target interface that calls are routed against.
///
/// `Call` is the argument tuple of one operation and `Reply` is whatever a
/// handler resolves that operation with. A contract is a pure type-level
/// marker; it is never instantiated.
pub trait Contract: 'static {
    /// Operation plus arguments. Cloned once per handler invocation so each
    /// handler receives the context's current arguments by value.
    type Call: Operation + Clone + fmt::Debug + Send + Sync + 'static;

    /// Resolved value of an operation.
    type Reply: fmt::Debug + Send + Sync + 'static;
}

/// A handler participating in routed dispatch.
///
/// `handle` is called with the shared [`CallContext`] and the current
/// arguments. The outcome is communicated by mutating the context: call
/// [`CallContext::set_return_value`] to resolve, leave it untouched to defer,
/// replace [`CallContext::set_modified_arguments`] to change what downstream
/// handlers see, or call [`CallContext::call_target`] to redirect to another
/// key. The `Result` only carries failures, which abort the chain.
///
/// Matching exhaustively on `C::Call` is how an implementation provides one
/// handler per declared operation; adding an operation to the contract
/// breaks every component that has not handled it.
pub trait Component<C: Contract>: Send + Sync {
    /// Handle one call.
    fn handle(&self, ctx: &mut CallContext<'_, C>, call: C::Call) -> Result<(), RouteError>;
}

impl<C, F> Component<C> for F
where
    C: Contract,
    F: Fn(&mut CallContext<'_, C>, C::Call) -> Result<(), RouteError> + Send + Sync,
{
    fn handle(&self, ctx: &mut CallContext<'_, C>, call: C::Call) -> Result<(), RouteError> {
        self(ctx, call)
    }
}

/// Turn a closure into a shareable component.
///
/// Passing the closure through this function lets the compiler infer its
/// argument types from the [`Component`] signature.
pub fn from_fn<C, F>(f: F) -> Arc<dyn Component<C>>
where
    C: Contract,
    F: Fn(&mut CallContext<'_, C>, C::Call) -> Result<(), RouteError> + Send + Sync + 'static,
{
    Arc::new(f)
}
