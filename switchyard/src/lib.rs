//! # switchyard — component pass-through execution engine
//!
//! Routes a method call through a configurable chain of named handlers
//! ("components"). Each handler either resolves the call or defers to the
//! next one, and routing tables can be narrowed per object identity.
//!
//! ## The Pieces
//!
//! | Piece | Type | What it does |
//! |-------|------|-------------|
//! | ① Contract | [`Contract`], [`Component`] | What a call looks like, what a handler provides |
//! | ② Registry | [`MethodRegistry`] | Append-only key → component map |
//! | ③ Routing | [`InstanceRouting`], [`InstanceId`] | Default registry, per-instance overrides, start key |
//! | ④ Context | [`CallContext`] | Per-call arguments and resolution state |
//! | ⑤ Sequence | [`SequenceComponent`] | Try subkeys in order until one resolves |
//! | ⑥ Façade | [`EntryFacade`] | Start a routed call, demand a resolution |
//!
//! ## Lifecycle
//!
//! Routing tables are built through `&mut` setup calls, then wrapped in an
//! `Arc` and only read while dispatching. Dispatch is synchronous: a handler
//! runs to completion before control returns to whoever invoked it, and an
//! error unwinds straight back to the façade caller.
//!
//! ```rust,ignore
//! let mut routing = InstanceRouting::<RepeatContract>::new();
//! routing.add_default_component("continue", Arc::new(PassThrough))?;
//! routing.add_default_component("result", Arc::new(Repeater))?;
//! routing.add_default_sequence("driver", ["continue", "result"])?;
//! routing.set_default_start("driver")?;
//!
//! let facade = RepeatFacade::new(Arc::new(routing))?;
//! assert_eq!(facade.repeat_forward("foo", 3)?, "foofoofoo");
//! ```

#![deny(missing_docs)]

pub mod context;
pub mod contract;
pub mod error;
pub mod facade;
pub mod key;
pub mod registry;
pub mod routing;
pub mod sequence;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use context::CallContext;
pub use contract::{Component, Contract, Operation, from_fn};
pub use error::RouteError;
pub use facade::EntryFacade;
pub use key::ComponentKey;
pub use registry::MethodRegistry;
pub use routing::{InstanceId, InstanceRouting, RoutingOptions};
pub use sequence::SequenceComponent;
