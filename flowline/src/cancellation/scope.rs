//! Cancellation scope with optional deadline.

use crate::errors::FlowError;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::warn;

/// A callback type for cancellation notifications.
pub type CancelCallback = Box<dyn FnOnce() + Send>;

struct Inner {
    /// Whether cancellation has been requested.
    cancelled: AtomicBool,
    /// Why the scope ended (first one wins).
    cause: RwLock<Option<FlowError>>,
    /// Callbacks to invoke on cancellation.
    callbacks: Mutex<Vec<CancelCallback>>,
    /// Derived scopes still worth cancelling.
    children: Mutex<Vec<Weak<Inner>>>,
    /// Flipped to `true` exactly once, on cancellation.
    signal: watch::Sender<bool>,
    /// Point in time after which the scope counts as done.
    deadline: Option<Instant>,
}

/// A capability saying "this work may be abandoned now or at a deadline".
///
/// Cloning is cheap and every clone observes the same done event. A scope
/// ends exactly once, either because [`Scope::cancel`] was called (on it or
/// on an ancestor) or because its deadline passed. Manual cancellation and
/// deadline expiry are observed the same way, through [`Scope::done`] and
/// [`Scope::err`].
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Inner>,
}

impl Scope {
    /// Creates a new root scope without a deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::with_optional_deadline(None)
    }

    fn with_optional_deadline(deadline: Option<Instant>) -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                cause: RwLock::new(None),
                callbacks: Mutex::new(Vec::new()),
                children: Mutex::new(Vec::new()),
                signal,
                deadline,
            }),
        }
    }

    /// Creates a child scope that ends when this one ends. Cancelling the
    /// child leaves the parent untouched.
    #[must_use]
    pub fn child(&self) -> Self {
        self.derive(self.inner.deadline)
    }

    /// Creates a child scope that also ends at `deadline`. The effective
    /// deadline is the earlier of `deadline` and this scope's own.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let effective = match self.inner.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        self.derive(Some(effective))
    }

    /// Creates a child scope that ends after `timeout` at the latest.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let child = Self::with_optional_deadline(deadline);

        let mut children = self.inner.children.lock();
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(children);
            child.cancel();
            return child;
        }
        // Dropped and already finished children are released here.
        children.retain(|weak| {
            weak.upgrade()
                .is_some_and(|inner| !inner.cancelled.load(Ordering::SeqCst))
        });
        children.push(Arc::downgrade(&child.inner));
        drop(children);

        child
    }

    /// Requests cancellation.
    ///
    /// This is idempotent: only the first cause is kept. If the deadline has
    /// already passed, the recorded cause is [`FlowError::DeadlineExceeded`].
    /// Callbacks run immediately; panics in callbacks are logged and
    /// suppressed.
    pub fn cancel(&self) {
        {
            let mut cause = self.inner.cause.write();
            if cause.is_some() {
                return;
            }
            *cause = Some(if self.deadline_passed() {
                FlowError::DeadlineExceeded
            } else {
                FlowError::Cancelled
            });
        }

        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.signal.send_replace(true);

        let callbacks = std::mem::take(&mut *self.inner.callbacks.lock());
        for callback in callbacks {
            Self::invoke(callback);
        }

        let children = std::mem::take(&mut *self.inner.children.lock());
        for inner in children.iter().filter_map(Weak::upgrade) {
            Scope { inner }.cancel();
        }
    }

    /// Registers a callback to be invoked on cancellation.
    ///
    /// If already cancelled, the callback is invoked immediately. Deadline
    /// expiry alone does not invoke callbacks.
    pub fn on_cancel<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut callbacks = self.inner.callbacks.lock();
        if self.inner.cancelled.load(Ordering::SeqCst) {
            drop(callbacks);
            Self::invoke(Box::new(callback));
        } else {
            callbacks.push(Box::new(callback));
        }
    }

    fn invoke(callback: CancelCallback) {
        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)) {
            warn!("Cancellation callback panicked: {:?}", e);
        }
    }

    /// Returns why the scope ended, or `None` while it is live.
    #[must_use]
    pub fn err(&self) -> Option<FlowError> {
        if let Some(cause) = *self.inner.cause.read() {
            return Some(cause);
        }
        if self.deadline_passed() {
            return Some(FlowError::DeadlineExceeded);
        }
        None
    }

    /// Returns whether the done event has fired.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the effective deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    #[cfg(test)]
    fn child_count(&self) -> usize {
        self.inner.children.lock().len()
    }

    fn deadline_passed(&self) -> bool {
        self.inner
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Resolves once the scope is done.
    pub async fn done(&self) {
        let mut signal = self.inner.signal.subscribe();
        let cancelled = async move {
            let _ = signal.wait_for(|fired| *fired).await;
        };

        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = cancelled => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => cancelled.await,
        }
    }

    /// Waits for the done event and returns its classification.
    pub async fn failure(&self) -> FlowError {
        self.done().await;
        self.err().unwrap_or(FlowError::Cancelled)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("err", &self.err())
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}
