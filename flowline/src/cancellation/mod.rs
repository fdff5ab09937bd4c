//! Structured cancellation.
//!
//! Every blocking operation in flowline takes a [`Scope`] as its first
//! argument. A scope ends once, by manual cancellation or deadline expiry,
//! and the end propagates to every child scope.

mod scope;

pub use scope::{CancelCallback, Scope};
