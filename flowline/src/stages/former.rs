//! Stage logic supplied by pipeline authors.

use super::Joint;
use async_trait::async_trait;
use std::sync::Arc;

/// Producer of values of type `W`, or transformer of `V` values into `W`
/// values, working through a [`Joint`].
///
/// `form` must return in bounded time once [`Joint::get`] signals exhaustion
/// or any joint operation signals cancellation. The joint is only borrowed
/// for the duration of the call.
#[async_trait]
pub trait Former<V, W>: Send + Sync {
    /// Reads values from the joint, forms new ones and puts them back.
    async fn form(&self, joint: &dyn Joint<V, W>);
}

#[async_trait]
impl<V, W, F: Former<V, W> + ?Sized> Former<V, W> for Arc<F> {
    async fn form(&self, joint: &dyn Joint<V, W>) {
        (**self).form(joint).await;
    }
}
