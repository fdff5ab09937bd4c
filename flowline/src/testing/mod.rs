//! Testing utilities for flowline pipelines.
//!
//! This module provides:
//! - Fixtures that feed and drain queues
//! - A canned [`crate::Flow`] over a vector
//! - A scripted [`crate::stages::Joint`] for exercising formers in isolation

mod fixtures;
mod mocks;

pub use fixtures::{emit_all, error_messages, read_all, VecFlow};
pub use mocks::ScriptedJoint;
