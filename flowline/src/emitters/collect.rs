//! Emitters that consume another emitter.

use crate::cancellation::Scope;
use crate::collectors::Consumer;
use crate::flow::{Emitter, Flow};
use crate::reports::{make, ErrorReader};
use crate::values::{queue, receiver, Reader};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// An emitter of no values that feeds another emitter into a consumer.
pub struct Collect<V, U, C, const E: usize> {
    emitter: U,
    consumer: Arc<C>,
    _values: PhantomData<fn(V)>,
}

/// Creates an emitter consuming the values of `emitter` with `consumer`.
///
/// The emitted queue never carries a value and closes once the consumer
/// returns. The error readers are those of `emitter` followed by the
/// consumer's own.
#[must_use]
pub fn collect<V, const E: usize, U, C>(emitter: U, consumer: C) -> Collect<V, U, C, E>
where
    U: Emitter<V>,
    C: Consumer<V, E>,
{
    Collect {
        emitter,
        consumer: Arc::new(consumer),
        _values: PhantomData,
    }
}

impl<V, U, C, const E: usize> std::fmt::Debug for Collect<V, U, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collect").field("errors", &E).finish_non_exhaustive()
    }
}

impl<V, U, C, const E: usize> Flow<()> for Collect<V, U, C, E>
where
    V: Send + 'static,
    U: Emitter<V>,
    C: Consumer<V, E> + 'static,
{
    fn flow(&self, scope: &Scope) -> (Reader<()>, Vec<ErrorReader>) {
        let (input, mut readers) = self.emitter.emit(scope);
        let (done, units) = queue();
        let (errs, own) = make::<E>(scope);
        readers.extend(own);

        let consumer = Arc::clone(&self.consumer);
        let scope = scope.clone();
        tokio::spawn(async move {
            let input = receiver(&scope, input);
            consumer.consume(&scope, &input, &errs).await;
            done.close();
            errs.close();
            debug!("consumer closed");
        });

        (units, readers)
    }
}
