//! Emitters built from producers and converters.
//!
//! This module provides:
//! - [`new`]: an emitter driven by a [`Producer`]
//! - [`transform`]: an emitter converting the values of another one
//! - [`collect`]: an emitter of no values that consumes another one

mod collect;
mod producer;
mod transform;

pub use collect::{collect, Collect};
pub use producer::{new, Produce, Producer};
pub use transform::{transform, Converter, Transform};
