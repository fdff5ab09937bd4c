//! An emitter and a collector joined into a runnable unit.

use crate::cancellation::Scope;
use crate::flow::{Collector, Emitter, Flow};
use crate::reports::{self, ErrorReader};
use std::sync::Arc;

/// Feeds every value of an emitter into a collector.
pub struct Link<V> {
    emitter: Arc<dyn Flow<V>>,
    collector: Arc<dyn Collector<V>>,
}

impl<V: Send + 'static> Link<V> {
    /// Joins `emitter` with `collector`.
    #[must_use]
    pub fn new(emitter: impl Emitter<V> + 'static, collector: impl Collector<V> + 'static) -> Self {
        Self {
            emitter: Arc::new(emitter),
            collector: Arc::new(collector),
        }
    }

    /// The emitting side.
    #[must_use]
    pub fn emitter(&self) -> &dyn Flow<V> {
        &*self.emitter
    }

    /// The collecting side.
    #[must_use]
    pub fn collector(&self) -> &dyn Collector<V> {
        &*self.collector
    }

    /// Starts both sides and returns their merged errors.
    ///
    /// The emitter's errors and the collector's errors arrive on one reader
    /// that closes once both sides finished.
    pub fn link(&self, scope: &Scope) -> ErrorReader {
        let (values, emitted) = self.emitter.emit(scope);
        let collected = self.collector.collect(scope, values);
        reports::merge(scope, [emitted, collected])
    }

    /// Links both sides and waits for the first error.
    ///
    /// Returns `Ok(())` once both sides finished without an error or the
    /// scope ended.
    pub async fn run(&self, scope: &Scope) -> anyhow::Result<()> {
        match self.link(scope).receive(scope).await {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }
}

impl<V> std::fmt::Debug for Link<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link").finish_non_exhaustive()
    }
}
