//! Fan-in of error queues.

use super::ErrorReader;
use crate::cancellation::Scope;

/// Flattens `groups` of error readers and merges them into one reader.
pub fn merge<I, G>(scope: &Scope, groups: I) -> ErrorReader
where
    I: IntoIterator<Item = G>,
    G: IntoIterator<Item = ErrorReader>,
{
    crate::merge::merge(scope, groups.into_iter().flatten())
}

/// Merges `groups` and waits for the first error.
///
/// Returns `None` once every reader is exhausted without an error, or when
/// the scope ends first.
pub async fn any<I, G>(scope: &Scope, groups: I) -> Option<anyhow::Error>
where
    I: IntoIterator<Item = G>,
    G: IntoIterator<Item = ErrorReader>,
{
    merge(scope, groups).receive(scope).await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::make;
    use crate::testing::emit_all;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_any_returns_first_error() {
        let scope = Scope::new();
        let quiet = make::<1>(&scope);
        let noisy = emit_all(&scope, vec![anyhow::anyhow!("boom")]);
        quiet.0.close();

        let err = any(&scope, vec![quiet.1, vec![noisy]]).await;
        assert_eq!(err.map(|e| e.to_string()), Some("boom".to_string()));
    }

    #[tokio::test]
    async fn test_any_without_errors() {
        let scope = Scope::new();
        let (first, first_readers) = make::<1>(&scope);
        let (second, second_readers) = make::<0>(&scope);
        first.close();
        second.close();

        assert!(any(&scope, vec![first_readers, second_readers]).await.is_none());
    }

    #[tokio::test]
    async fn test_any_without_groups() {
        let scope = Scope::new();
        assert!(any(&scope, Vec::<Vec<ErrorReader>>::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_merge_flattens_groups() {
        let scope = Scope::new();
        let merged = merge(
            &scope,
            vec![
                vec![emit_all(&scope, vec![anyhow::anyhow!("a")])],
                vec![
                    emit_all(&scope, vec![anyhow::anyhow!("b")]),
                    emit_all(&scope, vec![anyhow::anyhow!("c")]),
                ],
            ],
        );

        let mut got = Vec::new();
        while let Ok(err) = merged.receive(&scope).await {
            got.push(err.to_string());
        }
        got.sort();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_any_with_cancelled_scope() {
        let scope = Scope::new();
        let (_senders, readers) = make::<1>(&scope);
        scope.cancel();

        assert!(any(&scope, vec![readers]).await.is_none());
    }
}
