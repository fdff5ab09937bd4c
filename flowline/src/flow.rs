//! Capability traits shared by every pipeline piece.

use crate::cancellation::Scope;
use crate::reports::ErrorReader;
use crate::values::Reader;
use std::sync::Arc;

/// A flow of values of type `V`.
///
/// Invoking a flow starts its processing without blocking and returns a
/// reader of the produced values with the readers of its error queues. The
/// implementation owns closing of every queue it returns and stops gracefully
/// when `scope` ends. Must be invoked within a tokio runtime.
pub trait Flow<V>: Send + Sync {
    /// Starts the flow within `scope`.
    fn flow(&self, scope: &Scope) -> (Reader<V>, Vec<ErrorReader>);
}

/// A source of values. Every [`Flow`] is an emitter.
pub trait Emitter<V>: Flow<V> {
    /// Starts emitting within `scope`.
    fn emit(&self, scope: &Scope) -> (Reader<V>, Vec<ErrorReader>) {
        self.flow(scope)
    }
}

impl<V, T: Flow<V> + ?Sized> Emitter<V> for T {}

/// A sink of values.
pub trait Collector<V>: Send + Sync {
    /// Starts collecting `input` within `scope` and returns the readers of
    /// the collector's error queues. The implementation owns closing them.
    fn collect(&self, scope: &Scope, input: Reader<V>) -> Vec<ErrorReader>;
}

impl<V, F: Flow<V> + ?Sized> Flow<V> for Arc<F> {
    fn flow(&self, scope: &Scope) -> (Reader<V>, Vec<ErrorReader>) {
        (**self).flow(scope)
    }
}

impl<V, C: Collector<V> + ?Sized> Collector<V> for Arc<C> {
    fn collect(&self, scope: &Scope, input: Reader<V>) -> Vec<ErrorReader> {
        (**self).collect(scope, input)
    }
}
