//! Fan-in merge of many queues into one.
//!
//! One listener task per input forwards values to the merged queue. A single
//! closer task waits on the join barrier of all listeners and then closes the
//! merged queue, so the close happens exactly once and always eventually:
//! every listener stops on exhaustion of its input, on the end of the scope,
//! or when the merged reader is gone.
//!
//! A listener whose send fails on the end of the scope withdraws the value, so
//! nothing reaches the merged queue after the scope is done. Nothing is
//! dropped or duplicated while the scope is live.

use crate::cancellation::Scope;
use crate::errors::FlowError;
use crate::values::{queue, Reader, Writer};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

/// Merges `readers` into a new reader within `scope`.
///
/// Must be called within a tokio runtime. The returned queue closes once
/// every listener has stopped.
pub fn merge<T, I>(scope: &Scope, readers: I) -> Reader<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = Reader<T>>,
{
    let (writer, merged) = queue();

    let mut listeners = JoinSet::new();
    for (index, reader) in readers.into_iter().enumerate() {
        listeners.spawn(listen(index, scope.clone(), reader, writer.share()));
    }

    let inputs = listeners.len();
    tokio::spawn(async move {
        while let Some(joined) = listeners.join_next().await {
            if let Err(err) = joined {
                warn!(%err, "merge listener did not finish cleanly");
            }
        }
        writer.close();
        debug!(inputs, "merged queue closed");
    });

    merged
}

async fn listen<T: Send>(index: usize, scope: Scope, input: Reader<T>, output: Writer<T>) {
    let stop = loop {
        let value = match input.receive(&scope).await {
            Ok(value) => value,
            Err(err) => break err,
        };
        if let Err(err) = output.send(&scope, value).await {
            break err;
        }
    };

    if stop != FlowError::Over {
        trace!(index, %stop, "merge listener stopped early");
    }
    output.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{emit_all, read_all};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[tokio::test]
    async fn test_merge_is_multiset_union() {
        let scope = Scope::new();
        let merged = merge(
            &scope,
            vec![emit_all(&scope, vec![1, 2, 3]), emit_all(&scope, vec![4, 5, 6])],
        );

        let mut got = read_all(&scope, &merged).await;
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_merge_keeps_duplicates() {
        let scope = Scope::new();
        let merged = merge(
            &scope,
            vec![
                emit_all(&scope, vec![1, 1]),
                emit_all(&scope, vec![1]),
                emit_all(&scope, Vec::new()),
            ],
        );

        assert_eq!(read_all(&scope, &merged).await, vec![1, 1, 1]);
    }

    #[tokio::test]
    async fn test_merge_preserves_per_source_order() {
        let scope = Scope::new();
        let merged = merge(
            &scope,
            vec![emit_all(&scope, vec![1, 2, 3]), emit_all(&scope, vec![10, 20, 30])],
        );

        let got = read_all(&scope, &merged).await;
        let low: Vec<_> = got.iter().copied().filter(|v| *v < 10).collect();
        let high: Vec<_> = got.iter().copied().filter(|v| *v >= 10).collect();
        assert_eq!(low, vec![1, 2, 3]);
        assert_eq!(high, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_merge_without_inputs_is_over() {
        let scope = Scope::new();
        let merged = merge::<u8, _>(&scope, Vec::new());
        assert_eq!(merged.receive(&scope).await, Err(FlowError::Over));
    }

    #[tokio::test]
    async fn test_merge_cancelled_before_values() {
        let sources = Scope::new();
        let scope = Scope::new();
        scope.cancel();

        let merged = merge(
            &scope,
            vec![emit_all(&sources, vec![1, 2]), emit_all(&sources, vec![3])],
        );

        let observer = Scope::new();
        assert_eq!(read_all(&observer, &merged).await, Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_merge_with_elapsed_deadline() {
        let sources = Scope::new();
        let scope = Scope::new().with_timeout(Duration::ZERO);

        let merged = merge(&scope, vec![emit_all(&sources, vec![1, 2, 3])]);

        let observer = Scope::new();
        assert_eq!(read_all(&observer, &merged).await, Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_merge_cancelled_midway_never_deadlocks() {
        let sources = Scope::new();
        let scope = Scope::new();
        let merged = merge(
            &scope,
            vec![
                emit_all(&sources, (0..1000).collect()),
                emit_all(&sources, (1000..2000).collect()),
            ],
        );

        for _ in 0..10 {
            merged.receive(&scope).await.unwrap();
        }
        scope.cancel();

        assert_eq!(merged.receive(&scope).await, Err(FlowError::Cancelled));
        tokio::time::timeout(Duration::from_secs(5), merged.discard())
            .await
            .expect("merged queue should close after cancellation");
    }

    #[tokio::test]
    async fn test_no_value_observed_after_cancellation() {
        let sources = Scope::new();
        let scope = Scope::new();
        let merged = merge(&scope, vec![emit_all(&sources, vec![1, 2, 3])]);

        tokio::time::sleep(Duration::from_millis(20)).await;
        scope.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let observer = Scope::new();
        assert_eq!(read_all(&observer, &merged).await, Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_dropping_merged_reader_stops_listeners() {
        let scope = Scope::new();
        let (writer, reader) = queue::<u8>();
        let merged = merge(&scope, vec![reader]);
        drop(merged);

        let outcome = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match writer.send(&scope, 1).await {
                    Ok(()) => continue,
                    Err(err) => break err,
                }
            }
        })
        .await
        .expect("listener should stop");

        assert_eq!(outcome, FlowError::Disconnected);
    }
}
