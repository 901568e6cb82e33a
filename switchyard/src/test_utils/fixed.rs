//! Fixed — resolves every call with the same reply.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;

/// A component that resolves every call with a clone of `reply`.
pub struct Fixed<C: Contract> {
    reply: C::Reply,
}

impl<C: Contract> Fixed<C> {
    /// Create a component resolving with `reply`.
    pub fn new(reply: C::Reply) -> Self {
        Self { reply }
    }
}

impl<C> Component<C> for Fixed<C>
where
    C: Contract,
    C::Reply: Clone,
{
    fn handle(&self, ctx: &mut CallContext<'_, C>, _call: C::Call) -> Result<(), RouteError> {
        ctx.set_return_value(self.reply.clone())
    }
}
