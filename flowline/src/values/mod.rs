//! Value transport.
//!
//! This module provides:
//! - Rendezvous queues with capability-restricted ends
//! - The cancellable `send`/`receive` primitives
//! - Scope-bound `Sender`/`Receiver` wrappers

mod bound;
mod queue;

pub use bound::{receiver, sender, BoundReceiver, BoundSender, Receiver, Sender};
pub use queue::{discard, queue, receive, send, Reader, Writer};
