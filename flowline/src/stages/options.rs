//! Stage configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to a [`super::Stage`] with
/// [`super::Stage::with_options`].
///
/// Missing fields take their defaults when deserialized, so an empty object
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageOptions {
    /// Name shown in the stage's tracing spans.
    pub name: Option<String>,
    /// Number of concurrent workers. Zero reads as one.
    pub spread: usize,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            name: None,
            spread: 1,
        }
    }
}

impl StageOptions {
    /// Creates the default options: unnamed, one worker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stage name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the number of workers.
    #[must_use]
    pub fn with_spread(mut self, spread: usize) -> Self {
        self.spread = spread;
        self
    }

    /// The number of workers actually spawned.
    #[must_use]
    pub fn effective_spread(&self) -> usize {
        self.spread.max(1)
    }
}
