//! # LogHandler — simple message logger
//!
//! A minimal handler that logs every message it receives through `tracing`.
//! Use it for tests, demos, or to watch a topic while debugging.
//!
//! ## Example output
//! ```text
//! INFO spillway::bus::log: message handler="log" message=Order { id: 7 }
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::info;

use crate::bus::Handler;

/// Handler that logs messages at `INFO`.
#[derive(Default)]
pub struct LogHandler;

impl LogHandler {
    /// Construct a new [`LogHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<M> Handler<M> for LogHandler
where
    M: Debug + Send + Sync + 'static,
{
    async fn on_message(&self, msg: &M) {
        info!(handler = "log", message = ?msg, "message");
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{HandlerRef, MessageBus};

    #[tokio::test]
    async fn test_log_handler_accepts_any_debug_message() {
        let bus = MessageBus::default();
        let h: HandlerRef<(u8, String)> = Arc::new(LogHandler::new());
        assert_eq!(h.name(), "log");

        bus.subscribe("logged", h).await.unwrap();
        bus.publish("logged", (1u8, "one".to_string())).await.unwrap();
    }
}
