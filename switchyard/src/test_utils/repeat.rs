//! RepeatContract — a two-operation sample contract with its resolver and
//! typed façade.

use crate::context::CallContext;
use crate::contract::{Component, Contract, Operation};
use crate::error::RouteError;
use crate::facade::EntryFacade;
use crate::routing::{InstanceId, InstanceRouting};
use std::sync::Arc;

/// Marker for the sample contract.
#[derive(Debug)]
pub struct RepeatContract;

/// Operations of [`RepeatContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatCall {
    /// Repeat `value` `times` times.
    RepeatForward {
        /// Text to repeat.
        value: String,
        /// Number of repetitions.
        times: usize,
    },
    /// Count the characters of `value`.
    CountChars {
        /// Text to measure.
        value: String,
    },
}

impl Operation for RepeatCall {
    fn name(&self) -> &'static str {
        match self {
            Self::RepeatForward { .. } => "repeatForward",
            Self::CountChars { .. } => "countChars",
        }
    }
}

/// Replies of [`RepeatContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatReply {
    /// Reply to [`RepeatCall::RepeatForward`].
    Repeated(String),
    /// Reply to [`RepeatCall::CountChars`].
    Count(usize),
}

impl Contract for RepeatContract {
    type Call = RepeatCall;
    type Reply = RepeatReply;
}

/// Resolves every [`RepeatContract`] operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Repeater;

impl Component<RepeatContract> for Repeater {
    fn handle(
        &self,
        ctx: &mut CallContext<'_, RepeatContract>,
        call: RepeatCall,
    ) -> Result<(), RouteError> {
        match call {
            RepeatCall::RepeatForward { value, times } => {
                ctx.set_return_value(RepeatReply::Repeated(value.repeat(times)))
            }
            RepeatCall::CountChars { value } => {
                ctx.set_return_value(RepeatReply::Count(value.chars().count()))
            }
        }
    }
}

/// Typed façade over [`RepeatContract`]. Only the operations are public.
#[derive(Debug)]
pub struct RepeatFacade {
    entry: EntryFacade<RepeatContract>,
}

impl RepeatFacade {
    /// Create a façade with a fresh identity.
    pub fn new(routing: Arc<InstanceRouting<RepeatContract>>) -> Result<Self, RouteError> {
        Ok(Self {
            entry: EntryFacade::new(routing)?,
        })
    }

    /// Create a façade dispatching as `instance`.
    pub fn with_instance(
        routing: Arc<InstanceRouting<RepeatContract>>,
        instance: InstanceId,
    ) -> Result<Self, RouteError> {
        Ok(Self {
            entry: EntryFacade::with_instance(routing, instance)?,
        })
    }

    /// Identity this façade dispatches as.
    pub fn instance(&self) -> &InstanceId {
        self.entry.instance()
    }

    /// Repeat `value` `times` times.
    pub fn repeat_forward(&self, value: &str, times: usize) -> Result<String, RouteError> {
        self.entry.dispatch_map(
            RepeatCall::RepeatForward {
                value: value.to_owned(),
                times,
            },
            |reply| match reply {
                RepeatReply::Repeated(s) => Some(s),
                _ => None,
            },
        )
    }

    /// Count the characters of `value`.
    pub fn count_chars(&self, value: &str) -> Result<usize, RouteError> {
        self.entry.dispatch_map(
            RepeatCall::CountChars {
                value: value.to_owned(),
            },
            |reply| match reply {
                RepeatReply::Count(n) => Some(n),
                _ => None,
            },
        )
    }
}
