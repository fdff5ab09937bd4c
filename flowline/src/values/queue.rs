//! Rendezvous queues and the cancellable transfer primitives.
//!
//! A queue is a tokio `mpsc` channel with a single slot whose items carry a
//! oneshot acknowledgement. A send returns only after a reader took the value,
//! which makes the handoff unbuffered from the caller's point of view.
//!
//! The value itself travels in a shared slot. Whichever side empties the slot
//! first decides the transfer: a reader that finds it empty skips the item, and
//! a sender that gets its value back reports that nothing was delivered.

use crate::cancellation::Scope;
use crate::errors::{FlowError, FlowResult};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::trace;

type Slot<T> = Arc<parking_lot::Mutex<Option<T>>>;

struct Handoff<T> {
    slot: Slot<T>,
    ack: oneshot::Sender<()>,
}

/// The sender's hold on a value it handed to the channel. Dropping it
/// withdraws the value unless a reader already took it.
struct Pending<T> {
    slot: Slot<T>,
}

impl<T> Pending<T> {
    fn new(value: T) -> Self {
        Self {
            slot: Arc::new(parking_lot::Mutex::new(Some(value))),
        }
    }

    fn handoff(&self, ack: oneshot::Sender<()>) -> Handoff<T> {
        Handoff {
            slot: Arc::clone(&self.slot),
            ack,
        }
    }

    /// Takes the value back. `None` means a reader got it first.
    fn retract(&self) -> Option<T> {
        self.slot.lock().take()
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        drop(self.retract());
    }
}

/// Write end of a queue.
///
/// Users never clone a writer. Closing consumes it, so a queue cannot be
/// closed twice through the same end.
pub struct Writer<T> {
    tx: mpsc::Sender<Handoff<T>>,
}

/// Read end of a queue. Any number of tasks may receive through a shared
/// reference concurrently; each value goes to exactly one of them.
pub struct Reader<T> {
    rx: Arc<Mutex<mpsc::Receiver<Handoff<T>>>>,
}

/// Creates a new rendezvous queue.
#[must_use]
pub fn queue<T>() -> (Writer<T>, Reader<T>) {
    let (tx, rx) = mpsc::channel(1);
    (
        Writer { tx },
        Reader {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl<T: Send> Writer<T> {
    /// Hands `value` over to a reader within `scope`.
    ///
    /// Returns `Ok(())` once a reader accepted the value, the scope's error if
    /// the scope ends first, or [`FlowError::Disconnected`] if every reader is
    /// gone. A send that returns an error never delivers its value, and a
    /// dropped send future withdraws it as well.
    pub async fn send(&self, scope: &Scope, value: T) -> FlowResult<()> {
        if let Some(err) = scope.err() {
            return Err(err);
        }

        let permit = tokio::select! {
            biased;
            err = scope.failure() => return Err(err),
            permit = self.tx.reserve() => permit.map_err(|_| FlowError::Disconnected)?,
        };

        let pending = Pending::new(value);
        let (ack, acked) = oneshot::channel();
        permit.send(pending.handoff(ack));

        tokio::select! {
            biased;
            res = acked => match res {
                Ok(()) => Ok(()),
                Err(_) if pending.retract().is_some() => Err(FlowError::Disconnected),
                Err(_) => Ok(()),
            },
            err = scope.failure() => {
                if pending.retract().is_none() {
                    return Ok(());
                }
                trace!(%err, "send withdrawn while waiting for a reader");
                Err(err)
            }
        }
    }
}

impl<T> Writer<T> {
    /// Closes this end of the queue. Readers see [`FlowError::Over`] once
    /// every internal share of the writer is released and nothing is
    /// pending.
    pub fn close(self) {
        drop(self.tx);
    }

    /// Returns true when every reader is gone.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.tx.is_closed()
    }

    /// Another handle to the same write end, for runtime-owned fan-out
    /// (spread workers, merge listeners).
    pub(crate) fn share(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send> Reader<T> {
    /// Takes the next value within `scope`.
    ///
    /// Returns the value, [`FlowError::Over`] if the queue is closed with
    /// nothing pending, or the scope's error on cancellation or deadline. A
    /// done scope wins over a ready value.
    pub async fn receive(&self, scope: &Scope) -> FlowResult<T> {
        if let Some(err) = scope.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            err = scope.failure() => Err(err),
            value = self.take() => value.ok_or(FlowError::Over),
        }
    }

    /// Next value still on offer. Items whose sender withdrew are skipped.
    async fn take(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        loop {
            let handoff = rx.recv().await?;
            let value = handoff.slot.lock().take();
            if let Some(value) = value {
                // The sender may be past its wait already; it finds the slot empty.
                let _ = handoff.ack.send(());
                return Some(value);
            }
        }
    }

    /// Reads and drops every value until the queue is exhausted. This does
    /// not observe any scope.
    pub async fn discard(self) {
        while self.take().await.is_some() {}
    }

    /// Turns the reader into a stream that ends on exhaustion or when
    /// `scope` is done.
    pub fn into_stream(self, scope: Scope) -> impl Stream<Item = T> + Send
    where
        T: 'static,
    {
        stream::unfold((self, scope), |(reader, scope)| async move {
            match reader.receive(&scope).await {
                Ok(value) => Some((value, (reader, scope))),
                Err(_) => None,
            }
        })
    }
}

impl<T> std::fmt::Debug for Writer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("disconnected", &self.tx.is_closed())
            .finish()
    }
}

impl<T> std::fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader").finish_non_exhaustive()
    }
}

/// Sends through an optional writer. A missing queue accepts the value
/// immediately without transferring it anywhere.
pub async fn send<T: Send>(scope: &Scope, writer: Option<&Writer<T>>, value: T) -> FlowResult<()> {
    match writer {
        Some(writer) => writer.send(scope, value).await,
        None => Ok(()),
    }
}

/// Receives through an optional reader. A missing queue is already
/// exhausted.
pub async fn receive<T: Send>(scope: &Scope, reader: Option<&Reader<T>>) -> FlowResult<T> {
    match reader {
        Some(reader) => reader.receive(scope).await,
        None => Err(FlowError::Over),
    }
}

/// Drains `reader` until it is exhausted, dropping every value.
pub async fn discard<T: Send>(reader: Reader<T>) {
    reader.discard().await;
}
