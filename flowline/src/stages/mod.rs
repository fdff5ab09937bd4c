//! Stages and the joints their formers work through.
//!
//! A [`Stage`] wraps user logic (a [`Former`]) and owns everything around
//! it: the downstream queue, the stage's error queues, the worker tasks and
//! the closing of all of it. Formers only ever see a [`Joint`].

mod former;
mod joint;
mod mapper;
mod options;
mod stage;

pub use former::Former;
pub use joint::Joint;
pub use mapper::{MapFn, Mapper};
pub use options::StageOptions;
pub use stage::Stage;
