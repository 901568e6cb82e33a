//! Failing — fails every call with a fixed message.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;

/// A component whose handler always fails with
/// [`RouteError::Component`] carrying `message`.
#[derive(Debug, Clone)]
pub struct Failing {
    message: String,
}

impl Failing {
    /// Create a component failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<C: Contract> Component<C> for Failing {
    fn handle(&self, _ctx: &mut CallContext<'_, C>, _call: C::Call) -> Result<(), RouteError> {
        Err(RouteError::component_msg(self.message.clone()))
    }
}
