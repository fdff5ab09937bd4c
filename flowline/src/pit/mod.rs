//! Sources without input.
//!
//! A [`Pit`] is the simplest [`Flow`]: a single [`Miner`] puts values on a
//! [`Pad`] until it runs dry. The pit owns the pad's queues and closes them
//! once the miner returns.

mod pad;

pub use pad::Pad;

use crate::cancellation::Scope;
use crate::flow::Flow;
use crate::reports::{make, ErrorReader};
use crate::values::{queue, Reader};
use async_trait::async_trait;
use pad::PitPad;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Produces values of type `V` onto a pad with `E` error queues.
#[async_trait]
pub trait Miner<V, const E: usize>: Send + Sync {
    /// Puts values on `pad` until done or until a put fails.
    async fn mine(&self, pad: &dyn Pad<V, E>);
}

/// A flow driven by a single miner.
pub struct Pit<V, M, const E: usize> {
    miner: Arc<M>,
    _values: PhantomData<fn() -> V>,
}

/// Creates a pit around `miner`.
#[must_use]
pub fn new<V, const E: usize, M: Miner<V, E>>(miner: M) -> Pit<V, M, E> {
    Pit {
        miner: Arc::new(miner),
        _values: PhantomData,
    }
}

impl<V, M, const E: usize> std::fmt::Debug for Pit<V, M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pit").field("errors", &E).finish_non_exhaustive()
    }
}

impl<V, M, const E: usize> Flow<V> for Pit<V, M, E>
where
    V: Send + 'static,
    M: Miner<V, E> + 'static,
{
    fn flow(&self, scope: &Scope) -> (Reader<V>, Vec<ErrorReader>) {
        let (values, reader) = queue();
        let (errs, readers) = make::<E>(scope);
        let pad = PitPad::new(scope.clone(), values, errs);
        let miner = Arc::clone(&self.miner);

        tokio::spawn(async move {
            miner.mine(&pad).await;
            pad.close();
            debug!("pit closed");
        });

        (reader, readers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlowError;
    use crate::run::run;
    use crate::testing::read_all;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::assert_ok;

    struct Counter<const E: usize> {
        total: usize,
        last: AtomicUsize,
        fail_with: Option<&'static str>,
    }

    impl<const E: usize> Counter<E> {
        fn new(total: usize) -> Self {
            Self {
                total,
                last: AtomicUsize::new(0),
                fail_with: None,
            }
        }
    }

    #[async_trait]
    impl<const E: usize> Miner<usize, E> for Counter<E> {
        async fn mine(&self, pad: &dyn Pad<usize, E>) {
            while self.last.load(Ordering::SeqCst) < self.total {
                if pad.put(self.last.load(Ordering::SeqCst)).await.is_err() {
                    return;
                }
                self.last.fetch_add(1, Ordering::SeqCst);
            }

            if let Some(message) = self.fail_with {
                let _ = pad.errs().report(anyhow::anyhow!(message)).await;
            }
        }
    }

    #[tokio::test]
    async fn test_pit_without_errors() {
        let scope = Scope::new();
        let pit = new::<usize, 0, _>(Counter::new(5));

        assert_ok!(run(&scope, Some(&pit)).await);
        assert_eq!(pit.miner.last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_pit_with_one_error_when_successful() {
        let scope = Scope::new();
        let pit = new::<usize, 1, _>(Counter::new(5));

        let (values, errors) = pit.flow(&scope);
        assert_eq!(errors.len(), 1);
        assert_eq!(read_all(&scope, &values).await, vec![0, 1, 2, 3, 4]);
        assert_eq!(errors[0].receive(&scope).await.err(), Some(FlowError::Over));
    }

    #[tokio::test]
    async fn test_pit_with_one_error_when_failing() {
        let scope = Scope::new();
        let pit = new::<usize, 1, _>(Counter {
            fail_with: Some("serious problem"),
            ..Counter::new(5)
        });

        let err = run(&scope, Some(&pit)).await.unwrap_err();
        assert_eq!(err.to_string(), "serious problem");
        assert_eq!(pit.miner.last.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_pit_stops_when_cancelled() {
        let scope = Scope::new();
        let pit = new::<usize, 1, _>(Counter::new(usize::MAX));

        let (values, errors) = pit.flow(&scope);
        assert_eq!(values.receive(&scope).await, Ok(0));
        scope.cancel();

        values.discard().await;
        assert_eq!(errors[0].receive(&Scope::new()).await.err(), Some(FlowError::Over));
    }
}
