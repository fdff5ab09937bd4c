//! Emitters converting the values of another emitter.

use crate::cancellation::Scope;
use crate::flow::{Emitter, Flow};
use crate::reports::{make, ErrorReader, ErrorSenders};
use crate::values::{queue, receiver, sender, Reader, Receiver, Sender};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Converts values of type `A` into values of type `B`, reporting through
/// `E` error queues.
#[async_trait]
pub trait Converter<A, B, const E: usize>: Send + Sync {
    /// Receives from `input` and sends to `output` until either signals
    /// exhaustion or cancellation.
    async fn convert(
        &self,
        scope: &Scope,
        input: &dyn Receiver<A>,
        output: &dyn Sender<B>,
        errs: &ErrorSenders<E>,
    );
}

/// An emitter of converted values.
pub struct Transform<A, B, U, C, const E: usize> {
    emitter: U,
    converter: Arc<C>,
    _values: PhantomData<fn(A) -> B>,
}

/// Creates an emitter converting the values of `emitter` with `converter`.
///
/// The error readers of the result are those of `emitter` followed by the
/// converter's own.
#[must_use]
pub fn transform<A, B, const E: usize, U, C>(emitter: U, converter: C) -> Transform<A, B, U, C, E>
where
    U: Emitter<A>,
    C: Converter<A, B, E>,
{
    Transform {
        emitter,
        converter: Arc::new(converter),
        _values: PhantomData,
    }
}

impl<A, B, U, C, const E: usize> std::fmt::Debug for Transform<A, B, U, C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("errors", &E)
            .finish_non_exhaustive()
    }
}

impl<A, B, U, C, const E: usize> Flow<B> for Transform<A, B, U, C, E>
where
    A: Send + 'static,
    B: Send + 'static,
    U: Emitter<A>,
    C: Converter<A, B, E> + 'static,
{
    fn flow(&self, scope: &Scope) -> (Reader<B>, Vec<ErrorReader>) {
        let (input, mut readers) = self.emitter.emit(scope);
        let (writer, values) = queue();
        let (errs, own) = make::<E>(scope);
        readers.extend(own);

        let converter = Arc::clone(&self.converter);
        let scope = scope.clone();
        tokio::spawn(async move {
            let input = receiver(&scope, input);
            let output = sender(&scope, writer);
            converter.convert(&scope, &input, &output, &errs).await;
            output.close();
            errs.close();
            debug!("converter closed");
        });

        (values, readers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{error_messages, read_all, VecFlow};
    use pretty_assertions::assert_eq;

    /// Doubles every value and reports multiples of three.
    struct Double;

    #[async_trait]
    impl<const E: usize> Converter<i32, i64, E> for Double {
        async fn convert(
            &self,
            _scope: &Scope,
            input: &dyn Receiver<i32>,
            output: &dyn Sender<i64>,
            errs: &ErrorSenders<E>,
        ) {
            while let Ok(value) = input.receive().await {
                let delivered = if value % 3 == 0 {
                    errs.report(anyhow::anyhow!("multiple of three: {value}")).await
                } else {
                    output.send(i64::from(value) * 2).await
                };
                if delivered.is_err() {
                    return;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_transform_without_errors() {
        let scope = Scope::new();
        let emitter = transform::<i32, i64, 0, _, _>(VecFlow::new(vec![1, 2, 3, 4]), Double);

        let (values, errors) = emitter.emit(&scope);
        assert!(errors.is_empty());
        assert_eq!(read_all(&scope, &values).await, vec![2, 4, 8]);
    }

    #[tokio::test]
    async fn test_transform_appends_own_errors() {
        let scope = Scope::new();
        let upstream = VecFlow::new(vec![1, 3, 5, 6]).with_errors(["upstream"]);
        let emitter = transform::<i32, i64, 1, _, _>(upstream, Double);

        let (values, errors) = emitter.emit(&scope);
        assert_eq!(errors.len(), 2);

        let (values, upstream, own) = tokio::join!(
            read_all(&scope, &values),
            error_messages(&scope, &errors[0]),
            error_messages(&scope, &errors[1]),
        );
        assert_eq!(values, vec![2, 10]);
        assert_eq!(upstream, vec!["upstream"]);
        assert_eq!(own, vec!["multiple of three: 3", "multiple of three: 6"]);
    }

    #[tokio::test]
    async fn test_transform_stops_when_output_dropped() {
        let scope = Scope::new();
        let emitter = transform::<i32, i64, 1, _, _>(VecFlow::new((1..1000).collect()), Double);

        let (values, errors) = emitter.emit(&scope);
        drop(values);

        let closed = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            error_messages(&scope, &errors[0]),
        );
        assert!(closed.await.is_ok());
    }
}
