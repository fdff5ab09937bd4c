//! Collectors built from consumers.

use crate::cancellation::Scope;
use crate::flow::Collector;
use crate::reports::{make, ErrorReader, ErrorSenders};
use crate::values::{receiver, Reader, Receiver};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Consumes values of type `V`, reporting through `E` error queues.
#[async_trait]
pub trait Consumer<V, const E: usize>: Send + Sync {
    /// Receives values from `input` until it signals exhaustion or
    /// cancellation.
    async fn consume(&self, scope: &Scope, input: &dyn Receiver<V>, errs: &ErrorSenders<E>);
}

#[async_trait]
impl<V, const E: usize, C: Consumer<V, E> + ?Sized> Consumer<V, E> for Arc<C> {
    async fn consume(&self, scope: &Scope, input: &dyn Receiver<V>, errs: &ErrorSenders<E>) {
        (**self).consume(scope, input, errs).await;
    }
}

/// A [`Collector`] running one consumer per collected reader.
pub struct Consume<V, C, const E: usize> {
    consumer: Arc<C>,
    _values: PhantomData<fn(V)>,
}

/// Creates a collector around `consumer`.
#[must_use]
pub fn new<V, const E: usize, C: Consumer<V, E>>(consumer: C) -> Consume<V, C, E> {
    Consume {
        consumer: Arc::new(consumer),
        _values: PhantomData,
    }
}

impl<V, C, const E: usize> std::fmt::Debug for Consume<V, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consume").field("errors", &E).finish_non_exhaustive()
    }
}

impl<V, C, const E: usize> Collector<V> for Consume<V, C, E>
where
    V: Send + 'static,
    C: Consumer<V, E> + 'static,
{
    fn collect(&self, scope: &Scope, input: Reader<V>) -> Vec<ErrorReader> {
        let (errs, readers) = make::<E>(scope);
        let consumer = Arc::clone(&self.consumer);
        let scope = scope.clone();

        tokio::spawn(async move {
            let input = receiver(&scope, input);
            consumer.consume(&scope, &input, &errs).await;
            errs.close();
            debug!("collector closed");
        });

        readers
    }
}
