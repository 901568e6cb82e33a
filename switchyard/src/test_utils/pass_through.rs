//! PassThrough — defers every call.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;

/// A component that never resolves, leaving the call to whatever is routed
/// after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<C: Contract> Component<C> for PassThrough {
    fn handle(&self, _ctx: &mut CallContext<'_, C>, _call: C::Call) -> Result<(), RouteError> {
        Ok(())
    }
}
