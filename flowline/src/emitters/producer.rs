//! Emitters driven by a producer.

use crate::cancellation::Scope;
use crate::flow::Flow;
use crate::reports::{make, ErrorReader, ErrorSenders};
use crate::values::{queue, sender, Reader, Sender};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Produces values of type `V`, reporting through `E` error queues.
#[async_trait]
pub trait Producer<V, const E: usize>: Send + Sync {
    /// Sends values through `output` until done or until a send fails.
    async fn produce(&self, scope: &Scope, output: &dyn Sender<V>, errs: &ErrorSenders<E>);
}

/// An emitter running one producer per invocation.
pub struct Produce<V, P, const E: usize> {
    producer: Arc<P>,
    _values: PhantomData<fn() -> V>,
}

/// Creates an emitter around `producer`.
#[must_use]
pub fn new<V, const E: usize, P: Producer<V, E>>(producer: P) -> Produce<V, P, E> {
    Produce {
        producer: Arc::new(producer),
        _values: PhantomData,
    }
}

impl<V, P, const E: usize> std::fmt::Debug for Produce<V, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Produce").field("errors", &E).finish_non_exhaustive()
    }
}

impl<V, P, const E: usize> Flow<V> for Produce<V, P, E>
where
    V: Send + 'static,
    P: Producer<V, E> + 'static,
{
    fn flow(&self, scope: &Scope) -> (Reader<V>, Vec<ErrorReader>) {
        let (writer, values) = queue();
        let (errs, readers) = make::<E>(scope);
        let producer = Arc::clone(&self.producer);
        let scope = scope.clone();

        tokio::spawn(async move {
            let output = sender(&scope, writer);
            producer.produce(&scope, &output, &errs).await;
            output.close();
            errs.close();
            debug!("producer closed");
        });

        (values, readers)
    }
}
