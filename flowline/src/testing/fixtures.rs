//! Queue fixtures.

use crate::cancellation::Scope;
use crate::flow::Flow;
use crate::reports::ErrorReader;
use crate::values::{queue, Reader};

/// Spawns a producer that sends `values` in order and then closes the queue.
///
/// The producer stops early when the scope ends or the reader is dropped.
pub fn emit_all<T: Send + 'static>(scope: &Scope, values: Vec<T>) -> Reader<T> {
    let (writer, reader) = queue();
    let scope = scope.clone();
    tokio::spawn(async move {
        for value in values {
            if writer.send(&scope, value).await.is_err() {
                break;
            }
        }
        writer.close();
    });
    reader
}

/// Receives until the reader is exhausted or the scope ends.
pub async fn read_all<T: Send>(scope: &Scope, reader: &Reader<T>) -> Vec<T> {
    let mut values = Vec::new();
    while let Ok(value) = reader.receive(scope).await {
        values.push(value);
    }
    values
}

/// Receives every error and renders it with `Display`.
pub async fn error_messages(scope: &Scope, reader: &ErrorReader) -> Vec<String> {
    read_all(scope, reader)
        .await
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// A flow replaying fixed values, optionally with one error queue carrying
/// fixed messages.
#[derive(Debug, Clone, Default)]
pub struct VecFlow<T> {
    values: Vec<T>,
    errors: Option<Vec<String>>,
}

impl<T> VecFlow<T> {
    /// A flow of `values` without error queues.
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            errors: None,
        }
    }

    /// Adds one error queue that carries `messages`.
    #[must_use]
    pub fn with_errors<S: Into<String>>(mut self, messages: impl IntoIterator<Item = S>) -> Self {
        self.errors = Some(messages.into_iter().map(Into::into).collect());
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Flow<T> for VecFlow<T> {
    fn flow(&self, scope: &Scope) -> (Reader<T>, Vec<ErrorReader>) {
        let values = emit_all(scope, self.values.clone());
        let errors = self
            .errors
            .iter()
            .map(|messages| {
                let errors: Vec<anyhow::Error> =
                    messages.iter().map(|m| anyhow::anyhow!("{m}")).collect();
                emit_all(scope, errors)
            })
            .collect();
        (values, errors)
    }
}
