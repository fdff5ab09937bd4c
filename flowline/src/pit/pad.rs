//! The pad a miner puts its values on.

use crate::cancellation::Scope;
use crate::errors::FlowResult;
use crate::reports::ErrorSenders;
use crate::values::Writer;
use async_trait::async_trait;

/// Output side of a source: values go out through [`Pad::put`], errors
/// through [`Pad::errs`].
#[async_trait]
pub trait Pad<V, const E: usize>: Send + Sync {
    /// The scope the pit runs within.
    fn scope(&self) -> &Scope;

    /// Sends a value downstream. Any error means the miner should stop.
    async fn put(&self, value: V) -> FlowResult<()>;

    /// The error senders of the pit.
    fn errs(&self) -> &ErrorSenders<E>;
}

pub(super) struct PitPad<V, const E: usize> {
    scope: Scope,
    values: Writer<V>,
    errs: ErrorSenders<E>,
}

impl<V, const E: usize> PitPad<V, E> {
    pub(super) fn new(scope: Scope, values: Writer<V>, errs: ErrorSenders<E>) -> Self {
        Self {
            scope,
            values,
            errs,
        }
    }

    pub(super) fn close(self) {
        self.values.close();
        self.errs.close();
    }
}

#[async_trait]
impl<V: Send, const E: usize> Pad<V, E> for PitPad<V, E> {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    async fn put(&self, value: V) -> FlowResult<()> {
        self.values.send(&self.scope, value).await
    }

    fn errs(&self) -> &ErrorSenders<E> {
        &self.errs
    }
}
