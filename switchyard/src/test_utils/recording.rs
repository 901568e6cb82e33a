//! Recording — wraps a component and logs every invocation.

use crate::context::CallContext;
use crate::contract::{Component, Contract};
use crate::error::RouteError;
use std::sync::{Arc, Mutex};

/// A recorded invocation for inspection in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Label of the component that ran.
    pub label: String,
    /// Operation that was dispatched.
    pub operation: &'static str,
    /// `Debug` rendering of the arguments the handler received.
    pub arguments: String,
}

/// Shared, ordered log of invocations across several [`Recording`]s.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Labels of the recorded calls, in invocation order.
    pub fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.label.clone())
            .collect()
    }

    fn push(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// A component wrapper that appends to a [`CallLog`] before delegating.
pub struct Recording<T> {
    label: String,
    log: CallLog,
    inner: T,
}

impl<T> Recording<T> {
    /// Wrap `inner`, logging under `label`.
    pub fn new(label: impl Into<String>, log: &CallLog, inner: T) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
            inner,
        }
    }
}

impl<C, T> Component<C> for Recording<T>
where
    C: Contract,
    T: Component<C>,
{
    fn handle(&self, ctx: &mut CallContext<'_, C>, call: C::Call) -> Result<(), RouteError> {
        self.log.push(RecordedCall {
            label: self.label.clone(),
            operation: ctx.operation_name(),
            arguments: format!("{call:?}"),
        });
        self.inner.handle(ctx, call)
    }
}
