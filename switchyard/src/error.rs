//! Error type for registration and dispatch.

use crate::key::ComponentKey;
use thiserror::Error;

/// Routing errors. Every variant is fatal to the in-flight call: there is
/// no local recovery, no retry and no partial result.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RouteError {
    /// The key is already registered in this registry scope, or a sequence
    /// lists the same subkey twice.
    #[error("duplicate key: {0}")]
    DuplicateKey(ComponentKey),

    /// The key is not registered in the registry that was searched.
    #[error("unknown key: {0}")]
    UnknownKey(ComponentKey),

    /// The instance already has an override registry.
    #[error("instance already has an override")]
    OverrideExists,

    /// The start key was rejected.
    #[error("invalid start key: {0}")]
    InvalidStart(String),

    /// Routing options were rejected.
    #[error("invalid routing options: {0}")]
    InvalidOptions(String),

    /// A façade was constructed over a routing table with no start key.
    #[error("routing table has no start key")]
    MissingStart,

    /// The chain ran to completion and nobody resolved the call.
    #[error("No resolved result!")]
    UnresolvedChain,

    /// A handler tried to resolve a context that was already resolved.
    #[error("call context for {operation} is already resolved")]
    AlreadyResolved {
        /// Operation being dispatched.
        operation: &'static str,
    },

    /// Nested `call_target` invocations went deeper than the routing
    /// table allows.
    #[error("dispatch depth {depth} exceeded while calling {key}")]
    DepthExceeded {
        /// Key whose invocation tripped the guard.
        key: ComponentKey,
        /// Depth at which the guard tripped.
        depth: usize,
    },

    /// The resolved reply does not match the operation's return type.
    #[error("unexpected reply for {operation}")]
    UnexpectedReply {
        /// Operation being dispatched.
        operation: &'static str,
    },

    /// A component handler failed. Propagated unchanged to the façade caller.
    #[error("{0}")]
    Component(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RouteError {
    /// Wrap any error raised by a component handler.
    pub fn component(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Component(Box::new(err))
    }

    /// Wrap a plain failure message raised by a component handler.
    pub fn component_msg(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::Component(msg.into())
    }

    /// Borrow the handler error when this is a [`RouteError::Component`].
    pub fn as_component(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Component(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
