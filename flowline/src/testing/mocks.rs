//! Mock joints for testing formers.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::cancellation::Scope;
use crate::errors::{FlowError, FlowResult};
use crate::stages::Joint;

/// A joint that serves scripted input and records what the former does.
///
/// Transfers never block and ignore the scope; only [`Joint::scope`] exposes
/// it. Puts and reports are recorded only when they succeed.
#[derive(Debug)]
pub struct ScriptedJoint<V, W> {
    scope: Scope,
    inputs: Mutex<VecDeque<V>>,
    puts: Mutex<Vec<W>>,
    reports: Mutex<Vec<String>>,
    put_failure: Option<FlowError>,
    report_failure: Option<FlowError>,
}

impl<V, W> ScriptedJoint<V, W> {
    /// Creates a joint serving `inputs` in order, then [`FlowError::Over`].
    #[must_use]
    pub fn new(inputs: Vec<V>) -> Self {
        Self {
            scope: Scope::new(),
            inputs: Mutex::new(inputs.into()),
            puts: Mutex::new(Vec::new()),
            reports: Mutex::new(Vec::new()),
            put_failure: None,
            report_failure: None,
        }
    }

    /// Makes every `put` fail with `err`.
    #[must_use]
    pub fn failing_puts(mut self, err: FlowError) -> Self {
        self.put_failure = Some(err);
        self
    }

    /// Makes every `report` fail with `err`.
    #[must_use]
    pub fn failing_reports(mut self, err: FlowError) -> Self {
        self.report_failure = Some(err);
        self
    }

    /// Number of inputs not taken yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.inputs.lock().len()
    }

    /// Rendered messages of the accepted reports.
    #[must_use]
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().clone()
    }
}

impl<V, W: Clone> ScriptedJoint<V, W> {
    /// The accepted output values.
    #[must_use]
    pub fn puts(&self) -> Vec<W> {
        self.puts.lock().clone()
    }
}

#[async_trait]
impl<V: Send, W: Send> Joint<V, W> for ScriptedJoint<V, W> {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    async fn get(&self) -> FlowResult<V> {
        self.inputs.lock().pop_front().ok_or(FlowError::Over)
    }

    async fn put(&self, value: W) -> FlowResult<()> {
        if let Some(err) = self.put_failure {
            return Err(err);
        }
        self.puts.lock().push(value);
        Ok(())
    }

    async fn report(&self, err: anyhow::Error) -> FlowResult<()> {
        if let Some(failure) = self.report_failure {
            return Err(failure);
        }
        self.reports.lock().push(err.to_string());
        Ok(())
    }
}
