//! The stage driver: spawns workers around a former and owns every queue it
//! creates.

use super::joint::StageJoint;
use super::{Former, StageOptions};
use crate::cancellation::Scope;
use crate::flow::Flow;
use crate::reports::{make, ErrorReader};
use crate::values::{queue, Reader};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, debug_span, warn, Instrument};

/// A pipeline stage: an optional upstream flow, a former and its workers.
///
/// A stage without an origin is a source. `E` is the number of error queues
/// the stage reports through (0 or 1). A stage is a [`Flow`] of its output
/// values; every invocation starts a fresh set of workers.
pub struct Stage<V, W, const E: usize = 1> {
    origin: Option<Arc<dyn Flow<V>>>,
    former: Arc<dyn Former<V, W>>,
    options: StageOptions,
}

impl<V, W, const E: usize> Stage<V, W, E>
where
    V: Send + 'static,
    W: Send + 'static,
{
    /// Creates a source stage. Its former sees an input that is exhausted
    /// from the start.
    #[must_use]
    pub fn source(former: impl Former<V, W> + 'static) -> Self {
        Self {
            origin: None,
            former: Arc::new(former),
            options: StageOptions::default(),
        }
    }

    /// Creates a stage reading the values of `origin`.
    #[must_use]
    pub fn new(origin: impl Flow<V> + 'static, former: impl Former<V, W> + 'static) -> Self {
        Self {
            origin: Some(Arc::new(origin)),
            former: Arc::new(former),
            options: StageOptions::default(),
        }
    }

    /// Sets the number of concurrent workers. Zero reads as one.
    #[must_use]
    pub fn with_spread(mut self, spread: usize) -> Self {
        self.options.spread = spread;
        self
    }

    /// Names the stage in its tracing spans.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Replaces every option at once.
    #[must_use]
    pub fn with_options(mut self, options: StageOptions) -> Self {
        self.options = options;
        self
    }
}

impl<V, W, const E: usize> Stage<V, W, E> {
    /// Number of workers spawned per invocation.
    #[must_use]
    pub fn spread(&self) -> usize {
        self.options.effective_spread()
    }

    /// The stage name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// Returns true if the stage has no upstream flow.
    #[must_use]
    pub fn is_source(&self) -> bool {
        self.origin.is_none()
    }
}

impl<V, W, const E: usize> std::fmt::Debug for Stage<V, W, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.options.name)
            .field("spread", &self.spread())
            .field("errors", &E)
            .field("source", &self.is_source())
            .finish()
    }
}

impl<V, W, const E: usize> Flow<W> for Stage<V, W, E>
where
    V: Send + 'static,
    W: Send + 'static,
{
    /// Starts the origin, spawns the workers and a closer task.
    ///
    /// The returned error readers are the origin's followed by the stage's
    /// own. The output and the stage's error queues close once every worker
    /// returned or panicked.
    fn flow(&self, scope: &Scope) -> (Reader<W>, Vec<ErrorReader>) {
        let (output, values) = queue();
        let (errors, own) = make::<E>(scope);

        let (input, mut readers) = match &self.origin {
            Some(origin) => {
                let (input, readers) = origin.flow(scope);
                (Some(input), readers)
            }
            None => (None, Vec::new()),
        };
        readers.extend(own);

        let stage: Arc<str> = Arc::from(self.name().unwrap_or("stage"));
        let spread = self.spread();
        debug!(stage = %stage, spread, "starting stage");

        let joint = Arc::new(StageJoint::new(scope.clone(), input, output, errors));
        let mut workers = JoinSet::new();
        for worker in 0..spread {
            let former = Arc::clone(&self.former);
            let joint = Arc::clone(&joint);
            let span = debug_span!("worker", stage = %stage, worker);
            workers.spawn(
                async move {
                    former.form(&*joint).await;
                }
                .instrument(span),
            );
        }

        tokio::spawn(async move {
            while let Some(res) = workers.join_next().await {
                if let Err(err) = res {
                    warn!(stage = %stage, error = %err, "stage worker did not finish");
                }
            }
            match Arc::try_unwrap(joint) {
                Ok(joint) => joint.close(),
                Err(_) => warn!(stage = %stage, "stage joint still shared after workers finished"),
            }
            debug!(stage = %stage, "stage closed");
        });

        (values, readers)
    }
}
