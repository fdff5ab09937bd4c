//! The logistics handle a former works through.

use crate::cancellation::Scope;
use crate::errors::FlowResult;
use crate::reports::ErrorSenders;
use crate::values::{receive, Reader, Writer};
use async_trait::async_trait;

/// Transport for a former: input values of type `V`, output values of type
/// `W`, and error reports.
///
/// All operations run within [`Joint::scope`]. One joint is shared by every
/// worker of a stage; each call is an independent transfer on the shared
/// queues.
#[async_trait]
pub trait Joint<V, W>: Send + Sync {
    /// The scope the joint operates within. Use it to observe cancellation
    /// inside long computations.
    fn scope(&self) -> &Scope;

    /// Receives the next input value.
    ///
    /// Returns [`crate::FlowError::Over`] once the input is exhausted (a
    /// source stage has no input and is exhausted from the start), or the
    /// scope's error on cancellation or deadline.
    async fn get(&self) -> FlowResult<V>;

    /// Sends an output value downstream.
    ///
    /// Any error means the worker should stop: the scope ended or the
    /// downstream reader is gone.
    async fn put(&self, value: W) -> FlowResult<()>;

    /// Reports a user-domain error.
    ///
    /// Succeeds without writing anything if the stage has no error queue.
    /// Any error means the worker should stop.
    async fn report(&self, err: anyhow::Error) -> FlowResult<()>;
}

pub(crate) struct StageJoint<V, W, const E: usize> {
    scope: Scope,
    input: Option<Reader<V>>,
    output: Writer<W>,
    errors: ErrorSenders<E>,
}

impl<V, W, const E: usize> StageJoint<V, W, E> {
    pub(crate) fn new(
        scope: Scope,
        input: Option<Reader<V>>,
        output: Writer<W>,
        errors: ErrorSenders<E>,
    ) -> Self {
        Self {
            scope,
            input,
            output,
            errors,
        }
    }

    /// Closes the output first, then the error queues, and releases the
    /// input.
    pub(crate) fn close(self) {
        self.output.close();
        self.errors.close();
    }
}

#[async_trait]
impl<V: Send, W: Send, const E: usize> Joint<V, W> for StageJoint<V, W, E> {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    async fn get(&self) -> FlowResult<V> {
        receive(&self.scope, self.input.as_ref()).await
    }

    async fn put(&self, value: W) -> FlowResult<()> {
        self.output.send(&self.scope, value).await
    }

    async fn report(&self, err: anyhow::Error) -> FlowResult<()> {
        self.errors.report(err).await
    }
}
