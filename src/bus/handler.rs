//! # Core handler trait
//!
//! `Handler` is the extension point for consuming messages from the
//! [`MessageBus`](crate::MessageBus). Each subscribed handler is driven by a
//! dedicated worker loop fed by its own bounded queue.
//!
//! ## Contract
//! - Implementations may be slow; a full queue makes `publish` wait, so a slow
//!   handler throttles publishers of its topic (and only that topic).
//! - Errors are the handler's own business: report them through a channel the
//!   handler owns. A panic ends the handler's worker.
//! - Each handler may **declare** its queue capacity via
//!   [`Handler::queue_capacity`]; otherwise the bus default applies.
//!
//! ## Example
//! ```rust
//! use spillway::Handler;
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Handler<String> for Audit {
//!     async fn on_message(&self, msg: &String) {
//!         // write audit record...
//!         let _ = msg;
//!     }
//!     fn name(&self) -> &str { "audit" }
//!     fn queue_capacity(&self) -> Option<usize> { Some(512) }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

/// Contract for message bus handlers.
///
/// Called from a handler-dedicated worker task, one message at a time, in
/// publish order.
#[async_trait]
pub trait Handler<M>: Send + Sync + 'static
where
    M: Send + Sync + 'static,
{
    /// Handle a single message.
    async fn on_message(&self, msg: &M);

    /// Human-readable name (for logs and errors).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this handler's queue (`None` = bus default).
    fn queue_capacity(&self) -> Option<usize> {
        None
    }
}

/// Shared handle to a handler; its allocation is the handler's identity.
pub type HandlerRef<M> = Arc<dyn Handler<M>>;

/// Identity of a handler: address of its shared allocation.
pub(crate) fn handler_id<M: Send + Sync + 'static>(handler: &HandlerRef<M>) -> usize {
    Arc::as_ptr(handler).cast::<()>() as usize
}
