//! Error channel sets.
//!
//! A stage or helper reports user-domain errors through a fixed number of
//! error queues. The number is part of the type: [`NoErrors`] has no queue at
//! all, [`OneError`] has exactly one. Writers and readers are always created
//! together by [`make`], and closing the writers is the only termination
//! signal for the readers.

mod merge;

pub use merge::{any, merge};

use crate::cancellation::Scope;
use crate::errors::{FlowError, FlowResult};
use crate::values::{queue, Reader, Writer};

/// Read end of an error queue.
pub type ErrorReader = Reader<anyhow::Error>;

/// Write end of an error queue.
pub type ErrorWriter = Writer<anyhow::Error>;

/// `N` error writers bound to a scope.
///
/// A slot is `None` only in a set that did not come from [`make`] (see
/// [`ErrorSenders::default`]); sending through such a slot fails with
/// [`FlowError::NilElement`].
pub struct ErrorSenders<const N: usize> {
    scope: Scope,
    slots: [Option<ErrorWriter>; N],
}

/// No error reporting at all.
pub type NoErrors = ErrorSenders<0>;

/// A single error queue, the regular case.
pub type OneError = ErrorSenders<1>;

/// Creates `N` paired error queues bound to `scope`.
///
/// Returns the writers wrapped as [`ErrorSenders`] and the readers in slot
/// order. With `N == 0` nothing is allocated and the reader list is empty.
#[must_use]
pub fn make<const N: usize>(scope: &Scope) -> (ErrorSenders<N>, Vec<ErrorReader>) {
    let mut readers = Vec::with_capacity(N);
    let slots = std::array::from_fn(|_| {
        let (writer, reader) = queue();
        readers.push(reader);
        Some(writer)
    });

    (
        ErrorSenders {
            scope: scope.clone(),
            slots,
        },
        readers,
    )
}

impl<const N: usize> ErrorSenders<N> {
    /// Number of error queues in the set.
    pub const ARITY: usize = N;

    /// Returns the scope every send runs within.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns true if the set has no error queue, i.e. reporting is a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Reports `err` through the last slot.
    ///
    /// With no slots there is nowhere to report to and this succeeds without
    /// writing anything.
    pub async fn report(&self, err: anyhow::Error) -> FlowResult<()> {
        match self.slots.last() {
            None => Ok(()),
            Some(None) => Err(FlowError::NilElement),
            Some(Some(writer)) => writer.send(&self.scope, err).await,
        }
    }

    /// Sends `err` through the slot at `index`.
    pub async fn send_at(&self, index: usize, err: anyhow::Error) -> FlowResult<()> {
        match self.slots.get(index) {
            Some(Some(writer)) => writer.send(&self.scope, err).await,
            _ => Err(FlowError::NilElement),
        }
    }

    /// Closes every writer exactly once. A no-op for an empty set.
    pub fn close(self) {
        for writer in self.slots.into_iter().flatten() {
            writer.close();
        }
    }

    pub(crate) fn share(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            slots: std::array::from_fn(|i| self.slots[i].as_ref().map(Writer::share)),
        }
    }
}

impl ErrorSenders<1> {
    /// Sends `err` through the only slot.
    pub async fn send(&self, err: anyhow::Error) -> FlowResult<()> {
        match &self.slots[0] {
            Some(writer) => writer.send(&self.scope, err).await,
            None => Err(FlowError::NilElement),
        }
    }
}

impl<const N: usize> Default for ErrorSenders<N> {
    /// An unpaired set: every slot is empty.
    fn default() -> Self {
        Self {
            scope: Scope::new(),
            slots: std::array::from_fn(|_| None),
        }
    }
}

impl<const N: usize> std::fmt::Debug for ErrorSenders<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSenders")
            .field("arity", &N)
            .field("paired", &self.slots.iter().filter(|s| s.is_some()).count())
            .finish()
    }
}
