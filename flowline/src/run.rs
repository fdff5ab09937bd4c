//! Driving a flow to completion.

use crate::cancellation::Scope;
use crate::flow::Flow;
use crate::reports;
use crate::values::discard;
use tracing::debug;

/// Runs `flow` within `scope` and waits for the first reported error.
///
/// Output values are drained and dropped. Returns `Ok(())` right away for a
/// missing flow, once every error queue is exhausted, or once the scope ends.
/// At most one error reaches the caller however many stages report; the
/// caller decides whether to cancel the scope after a failure.
pub async fn run<V, F>(scope: &Scope, flow: Option<&F>) -> anyhow::Result<()>
where
    V: Send + 'static,
    F: Flow<V> + ?Sized,
{
    let Some(flow) = flow else {
        return Ok(());
    };

    let (values, errors) = flow.flow(scope);
    if errors.is_empty() {
        discard(values).await;
        return Ok(());
    }

    tokio::spawn(discard(values));
    match reports::any(scope, [errors]).await {
        Some(err) => {
            debug!(error = %err, "flow reported an error");
            Err(err)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{Mapper, Stage};
    use crate::testing::VecFlow;
    use pretty_assertions::assert_eq;
    use thiserror::Error;
    use tokio_test::assert_ok;

    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("bad value {0}")]
    struct BadValue(i32);

    fn fail_on(bad: i32) -> Mapper<i32, i32, impl crate::stages::MapFn<i32, i32>> {
        Mapper::new(move |_scope: Scope, v: i32| async move {
            if v == bad {
                Err(anyhow::Error::new(BadValue(v)))
            } else {
                Ok(v)
            }
        })
    }

    #[tokio::test]
    async fn test_run_without_flow() {
        let scope = Scope::new();
        assert_ok!(run::<i32, VecFlow<i32>>(&scope, None).await);
    }

    #[tokio::test]
    async fn test_run_without_error_queues() {
        let scope = Scope::new();
        let flow = VecFlow::new(vec![1, 2, 3]);
        assert_ok!(run(&scope, Some(&flow)).await);
    }

    #[tokio::test]
    async fn test_run_clean_stage() {
        let scope = Scope::new();
        let stage = Stage::<i32, i32>::new(VecFlow::new(vec![1, 2, 3]), fail_on(7));
        assert_ok!(run(&scope, Some(&stage)).await);
    }

    #[tokio::test]
    async fn test_run_returns_the_reported_error() {
        let scope = Scope::new();
        let stage = Stage::<i32, i32>::new(VecFlow::new(vec![1, 2, 3]), fail_on(2));

        let err = run(&scope, Some(&stage)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<BadValue>(), Some(&BadValue(2)));
        assert_eq!(err.to_string(), "bad value 2");
    }

    #[tokio::test]
    async fn test_run_through_nested_stages() {
        let scope = Scope::new();
        let first = Stage::<i32, i32>::new(VecFlow::new(vec![1, 2, 3, 4]), fail_on(99));
        let second = Stage::<i32, i32>::new(first, fail_on(99));
        let third = Stage::<i32, i32>::new(second, fail_on(4)).with_spread(2);

        let err = run(&scope, Some(&third)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<BadValue>(), Some(&BadValue(4)));
    }

    #[tokio::test]
    async fn test_run_through_dyn_flow() {
        let scope = Scope::new();
        let flow = VecFlow::new(vec![1]).with_errors(["upstream"]);
        let flow: &dyn Flow<i32> = &flow;

        let err = run(&scope, Some(flow)).await.unwrap_err();
        assert_eq!(err.to_string(), "upstream");
    }

    #[tokio::test]
    async fn test_run_with_cancelled_scope() {
        let scope = Scope::new();
        scope.cancel();
        let flow = VecFlow::new(vec![1, 2]).with_errors(["never seen"]);

        assert_ok!(run(&scope, Some(&flow)).await);
    }
}
