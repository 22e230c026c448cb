//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(M) -> Fut`, producing a fresh future
//! per message. The message is cloned out of the shared fan-out copy.
//!
//! ## Example
//! ```rust
//! use spillway::{HandlerFn, HandlerRef};
//!
//! let h: HandlerRef<bool> = HandlerFn::arc("flag", |v: bool| async move {
//!     let _ = v;
//! });
//! assert_eq!(h.name(), "flag");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::bus::handler::Handler;

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    capacity: Option<usize>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            capacity: None,
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Overrides the queue capacity for this handler.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

#[async_trait]
impl<M, F, Fut> Handler<M> for HandlerFn<F>
where
    M: Clone + Send + Sync + 'static,
    F: Fn(M) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_message(&self, msg: &M) {
        (self.f)(msg.clone()).await;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn queue_capacity(&self) -> Option<usize> {
        self.capacity
    }
}
