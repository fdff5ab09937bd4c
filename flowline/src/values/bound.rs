//! Scope-bound senders and receivers.
//!
//! The composition helpers hand these to user code instead of raw queue
//! ends, so user code never has to thread the scope through every transfer.

use super::queue::{Reader, Writer};
use crate::cancellation::Scope;
use crate::errors::FlowResult;
use async_trait::async_trait;

/// Something that sends values of type `V`.
#[async_trait]
pub trait Sender<V>: Send + Sync {
    /// Tries to send `value`. Returns `Ok(())` once it was delivered.
    async fn send(&self, value: V) -> FlowResult<()>;
}

/// Something that receives values of type `V`.
#[async_trait]
pub trait Receiver<V>: Send + Sync {
    /// Tries to receive a value. Must return [`crate::FlowError::Over`] once
    /// receiving is no longer possible.
    async fn receive(&self) -> FlowResult<V>;
}

/// A writer bound to a scope.
#[derive(Debug)]
pub struct BoundSender<V> {
    scope: Scope,
    writer: Writer<V>,
}

/// Binds `writer` to `scope`.
#[must_use]
pub fn sender<V>(scope: &Scope, writer: Writer<V>) -> BoundSender<V> {
    BoundSender {
        scope: scope.clone(),
        writer,
    }
}

impl<V> BoundSender<V> {
    /// Returns the scope every send runs within.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Closes the underlying writer.
    pub fn close(self) {
        self.writer.close();
    }
}

#[async_trait]
impl<V: Send> Sender<V> for BoundSender<V> {
    async fn send(&self, value: V) -> FlowResult<()> {
        self.writer.send(&self.scope, value).await
    }
}

/// A reader bound to a scope.
#[derive(Debug)]
pub struct BoundReceiver<V> {
    scope: Scope,
    reader: Reader<V>,
}

/// Binds `reader` to `scope`.
#[must_use]
pub fn receiver<V>(scope: &Scope, reader: Reader<V>) -> BoundReceiver<V> {
    BoundReceiver {
        scope: scope.clone(),
        reader,
    }
}

impl<V> BoundReceiver<V> {
    /// Returns the scope every receive runs within.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

#[async_trait]
impl<V: Send> Receiver<V> for BoundReceiver<V> {
    async fn receive(&self) -> FlowResult<V> {
        self.reader.receive(&self.scope).await
    }
}
