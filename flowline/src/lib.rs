//! # Flowline
//!
//! Cancellable concurrent data pipelines.
//!
//! Flowline composes pipelines from independent stages connected by
//! rendezvous queues, with support for:
//!
//! - **Structured cancellation**: every blocking transfer races a [`Scope`]
//!   that ends by cancellation or deadline
//! - **Stage-based execution**: a [`stages::Stage`] runs a user
//!   [`stages::Former`] on one or more workers and owns every queue it creates
//! - **Fan-in**: [`merge()`] joins any number of queues into one and closes it
//!   exactly once
//! - **Error channels**: user errors travel on typed error queues of arity 0
//!   or 1 and [`run()`] returns the first one observed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowline::prelude::*;
//!
//! let scope = Scope::new();
//! let numbers = Stage::<(), u64>::source(Numbers::new(100));
//! let squares = Stage::new(numbers, Mapper::new(|_scope, n: u64| async move { Ok(n * n) }))
//!     .with_spread(8);
//!
//! if let Err(err) = run(&scope, Some(&squares)).await {
//!     scope.cancel();
//!     eprintln!("got error: {err}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod collectors;
pub mod emitters;
pub mod errors;
pub mod flow;
pub mod link;
pub mod merge;
pub mod pit;
pub mod reports;
pub mod run;
pub mod stages;
pub mod testing;
pub mod values;

pub use cancellation::Scope;
pub use errors::{FlowError, FlowResult};
pub use flow::{Collector, Emitter, Flow};
pub use link::Link;
pub use merge::merge;
pub use run::run;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::Scope;
    pub use crate::collectors::Consumer;
    pub use crate::emitters::{Converter, Producer};
    pub use crate::errors::{FlowError, FlowResult};
    pub use crate::flow::{Collector, Emitter, Flow};
    pub use crate::link::Link;
    pub use crate::merge::merge;
    pub use crate::pit::{Miner, Pad};
    pub use crate::reports::{ErrorReader, ErrorSenders, NoErrors, OneError};
    pub use crate::run::run;
    pub use crate::stages::{Former, Joint, Mapper, Stage, StageOptions};
    pub use crate::values::{queue, Reader, Receiver, Sender, Writer};
}
