//! Error types for the flowline runtime.
//!
//! Transfers on queues fail with [`FlowError`]. User-domain failures travel
//! through error channels as [`anyhow::Error`] values and are never mixed with
//! transfer signals.

use thiserror::Error;

/// Outcome of an interrupted or impossible transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FlowError {
    /// The queue is closed and nothing is pending. This is the normal
    /// termination signal of a flow, not a failure.
    #[error("flow is over")]
    Over,

    /// The scope was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// The scope's deadline has passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Every reader of the queue is gone, so no handoff can complete.
    #[error("queue reader is gone")]
    Disconnected,

    /// A one-arity error send hit a slot that was never paired with a queue.
    #[error("nil element")]
    NilElement,
}

impl FlowError {
    /// Returns true for signals that mean "stop now": cancellation, deadline
    /// and a vanished reader.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        matches!(
            self,
            FlowError::Cancelled | FlowError::DeadlineExceeded | FlowError::Disconnected
        )
    }

    /// Returns true if this is the exhaustion signal.
    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self, FlowError::Over)
    }
}

/// Result alias for transfer operations.
pub type FlowResult<T> = Result<T, FlowError>;
