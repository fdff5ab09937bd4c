//! Lifting plain mapping functions into formers.

use super::{Former, Joint};
use crate::cancellation::Scope;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// A mapping of `V` values to `W` values within a scope.
///
/// Implemented for every `Fn(Scope, V) -> impl Future<Output =
/// anyhow::Result<W>>`.
pub trait MapFn<V, W>: Send + Sync {
    /// The future returned by [`MapFn::call`].
    type Future: Future<Output = anyhow::Result<W>> + Send;

    /// Maps one value.
    fn call(&self, scope: Scope, value: V) -> Self::Future;
}

impl<V, W, F, Fut> MapFn<V, W> for F
where
    F: Fn(Scope, V) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<W>> + Send,
{
    type Future = Fut;

    fn call(&self, scope: Scope, value: V) -> Fut {
        self(scope, value)
    }
}

/// A former that maps every input value.
///
/// A mapping error is reported and processing continues with the next value.
/// The mapper stops on exhaustion, on cancellation, and when a `put` or
/// `report` fails.
pub struct Mapper<V, W, M> {
    map: M,
    _types: PhantomData<fn(V) -> W>,
}

impl<V, W, M: MapFn<V, W>> Mapper<V, W, M> {
    /// Wraps `map`.
    pub fn new(map: M) -> Self {
        Self {
            map,
            _types: PhantomData,
        }
    }
}

impl<V, W, M> std::fmt::Debug for Mapper<V, W, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper").finish_non_exhaustive()
    }
}

#[async_trait]
impl<V, W, M> Former<V, W> for Mapper<V, W, M>
where
    V: Send + 'static,
    W: Send + 'static,
    M: MapFn<V, W>,
{
    async fn form(&self, joint: &dyn Joint<V, W>) {
        while let Ok(value) = joint.get().await {
            let delivered = match self.map.call(joint.scope().clone(), value).await {
                Ok(mapped) => joint.put(mapped).await,
                Err(err) => joint.report(err).await,
            };
            if delivered.is_err() {
                return;
            }
        }
    }
}
