//! # Topic-based fan-out to per-handler workers.
//!
//! Provides [`MessageBus`] — delivers each published message to every handler
//! subscribed to the topic, each handler progressing at its own pace.
//!
//! ## Architecture
//! ```text
//! publish(topic, msg)
//!     │  (registry read lock held during fan-out)
//!     ├──► [queue 1] ──► worker 1 ──► handler1.on_message(&msg)
//!     │    (bounded)
//!     ├──► [queue 2] ──► worker 2 ──► handler2.on_message(&msg)
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► handlerN.on_message(&msg)
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Typed topics**: a topic carries one message type, fixed by its first
//!   subscriber; mismatches are rejected at subscribe/publish time.
//! - **Blocking backpressure**: `publish` waits while any target queue is full.
//!   A slow handler throttles every publisher of its topic, never other topics.
//!   [`try_publish`](MessageBus::try_publish) is the non-blocking variant.
//! - **No cross-handler ordering**: handler A may process message N while B
//!   processes N+5.
//! - **Per-handler FIFO**: each handler sees messages in publish order.
//! - **No supervision**: a panicking handler ends its own worker; later
//!   publishes report it as [`BusError::Closed`].
//!
//! **Warning**: a handler that publishes back into its own topic can deadlock
//! once its queue is full.
//!
//! ## Example
//! ```rust
//! use spillway::{BusConfig, HandlerFn, HandlerRef, MessageBus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), spillway::BusError> {
//! let bus = MessageBus::new(BusConfig::default());
//! let h: HandlerRef<String> = HandlerFn::arc("printer", |s: String| async move {
//!     println!("got {s}");
//! });
//!
//! bus.subscribe("greetings", h.clone()).await?;
//! bus.publish("greetings", "hello".to_string()).await?;
//! bus.unsubscribe("greetings", &h).await?;
//! # Ok(())
//! # }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, trace, warn};

use crate::bus::handler::{HandlerRef, handler_id};
use crate::config::BusConfig;
use crate::error::BusError;

/// Message as it travels through a handler queue.
type Erased = Arc<dyn Any + Send + Sync>;

/// Per-handler queue metadata.
struct HandlerSlot {
    id: usize,
    name: String,
    sender: mpsc::Sender<Erased>,
}

/// Handlers registered under one topic.
struct Topic {
    message_type: TypeId,
    type_name: &'static str,
    handlers: Vec<HandlerSlot>,
}

impl Topic {
    fn check_type<M: 'static>(&self, topic: &str) -> Result<(), BusError> {
        if self.message_type == TypeId::of::<M>() {
            Ok(())
        } else {
            Err(BusError::MessageTypeMismatch {
                topic: topic.to_string(),
                expected: self.type_name,
                found: std::any::type_name::<M>(),
            })
        }
    }

    fn check_handler<M: 'static>(&self, topic: &str) -> Result<(), BusError> {
        self.check_type::<M>(topic)
            .map_err(|_| BusError::InvalidHandler {
                topic: topic.to_string(),
                reason: format!(
                    "topic carries {}, handler expects {}",
                    self.type_name,
                    std::any::type_name::<M>()
                ),
            })
    }
}

/// Publish/subscribe registry with one worker per handler.
///
/// All methods are safe to call concurrently; wrap the bus in an `Arc` to
/// share it between tasks.
pub struct MessageBus {
    cfg: BusConfig,
    topics: RwLock<HashMap<String, Topic>>,
}

impl MessageBus {
    /// Creates an empty bus.
    pub fn new(cfg: BusConfig) -> Self {
        Self {
            cfg,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes `handler` to `topic` and spawns its worker.
    ///
    /// ### Per-handler setup
    /// - Bounded mpsc queue ([`Handler::queue_capacity`](crate::Handler::queue_capacity)
    ///   or the bus default, min 1)
    /// - Dedicated worker task (runs until the queue is closed and drained)
    ///
    /// ### Errors
    /// [`BusError::InvalidHandler`] if `topic` already carries another message type.
    pub async fn subscribe<M>(&self, topic: &str, handler: HandlerRef<M>) -> Result<(), BusError>
    where
        M: Send + Sync + 'static,
    {
        let mut topics = self.topics.write().await;

        if let Some(existing) = topics.get(topic) {
            existing.check_handler::<M>(topic)?;
        }

        let cap = handler
            .queue_capacity()
            .unwrap_or_else(|| self.cfg.handler_queue_capacity_clamped())
            .max(1);
        let (tx, rx) = mpsc::channel::<Erased>(cap);
        let slot = HandlerSlot {
            id: handler_id(&handler),
            name: handler.name().to_string(),
            sender: tx,
        };
        tokio::spawn(run_worker(topic.to_string(), handler, rx));

        debug!(topic, handler = %slot.name, capacity = cap, "handler subscribed");
        topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic {
                message_type: TypeId::of::<M>(),
                type_name: std::any::type_name::<M>(),
                handlers: Vec::new(),
            })
            .handlers
            .push(slot);
        Ok(())
    }

    /// Delivers `msg` to every handler of `topic`, waiting for queue space.
    ///
    /// The message is shared (one allocation) between all handlers.
    ///
    /// ### Errors
    /// - [`BusError::NoHandlerFound`] if nobody is subscribed to `topic`
    /// - [`BusError::MessageTypeMismatch`] if `topic` carries another type
    /// - [`BusError::Closed`] if a handler's worker has stopped; the other
    ///   handlers still receive the message
    pub async fn publish<M>(&self, topic: &str, msg: M) -> Result<(), BusError>
    where
        M: Send + Sync + 'static,
    {
        let topics = self.topics.read().await;
        let entry = topics
            .get(topic)
            .ok_or_else(|| BusError::NoHandlerFound {
                topic: topic.to_string(),
            })?;
        entry.check_type::<M>(topic)?;

        let msg: Erased = Arc::new(msg);
        let mut dead: Option<&str> = None;
        for slot in &entry.handlers {
            if slot.sender.send(Arc::clone(&msg)).await.is_err() {
                warn!(topic, handler = %slot.name, "handler worker is gone, message dropped");
                dead.get_or_insert(slot.name.as_str());
            }
        }
        trace!(topic, handlers = entry.handlers.len(), "message published");

        match dead {
            Some(handler) => Err(BusError::Closed {
                topic: topic.to_string(),
                handler: handler.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Delivers `msg` to every handler of `topic` without waiting for queue space.
    ///
    /// Handlers whose queue is full (or whose worker stopped) miss the message;
    /// the others still get it.
    ///
    /// ### Errors
    /// Same as [`publish`](MessageBus::publish), plus [`BusError::QueueFull`]
    /// carrying the number of handlers that missed the message.
    pub async fn try_publish<M>(&self, topic: &str, msg: M) -> Result<(), BusError>
    where
        M: Send + Sync + 'static,
    {
        let topics = self.topics.read().await;
        let entry = topics
            .get(topic)
            .ok_or_else(|| BusError::NoHandlerFound {
                topic: topic.to_string(),
            })?;
        entry.check_type::<M>(topic)?;

        let msg: Erased = Arc::new(msg);
        let mut dropped = 0usize;
        for slot in &entry.handlers {
            match slot.sender.try_send(Arc::clone(&msg)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(topic, handler = %slot.name, reason = "full", "message dropped");
                    dropped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(topic, handler = %slot.name, reason = "closed", "message dropped");
                    dropped += 1;
                }
            }
        }

        if dropped == 0 {
            Ok(())
        } else {
            Err(BusError::QueueFull {
                topic: topic.to_string(),
                dropped,
            })
        }
    }

    /// Removes every subscription of `handler` from `topic`.
    ///
    /// Removed queues are closed; their workers finish the queued messages and
    /// exit. A topic left without handlers is removed. A handler that is not
    /// subscribed to an existing topic is a no-op.
    ///
    /// ### Errors
    /// - [`BusError::TopicNotFound`] if `topic` is not registered
    /// - [`BusError::InvalidHandler`] if `topic` carries another message type
    pub async fn unsubscribe<M>(&self, topic: &str, handler: &HandlerRef<M>) -> Result<(), BusError>
    where
        M: Send + Sync + 'static,
    {
        let mut topics = self.topics.write().await;
        let entry = topics
            .get_mut(topic)
            .ok_or_else(|| BusError::TopicNotFound {
                topic: topic.to_string(),
            })?;
        entry.check_handler::<M>(topic)?;

        let id = handler_id(handler);
        let before = entry.handlers.len();
        entry.handlers.retain(|slot| slot.id != id);
        let removed = before - entry.handlers.len();

        if entry.handlers.is_empty() {
            topics.remove(topic);
            debug!(topic, removed, "handler unsubscribed, topic removed");
        } else if removed > 0 {
            debug!(topic, removed, "handler unsubscribed");
        }
        Ok(())
    }

    /// Closes every handler queue of `topic` and removes the topic.
    ///
    /// ### Errors
    /// [`BusError::TopicNotFound`] if `topic` is not registered.
    pub async fn close(&self, topic: &str) -> Result<(), BusError> {
        let removed = self.topics.write().await.remove(topic);
        match removed {
            Some(entry) => {
                debug!(topic, handlers = entry.handlers.len(), "topic closed");
                Ok(())
            }
            None => Err(BusError::TopicNotFound {
                topic: topic.to_string(),
            }),
        }
    }

    /// Returns `true` if `topic` has at least one handler.
    pub async fn has_topic(&self, topic: &str) -> bool {
        self.topics.read().await.contains_key(topic)
    }

    /// Number of handlers subscribed to `topic`.
    pub async fn handler_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .await
            .get(topic)
            .map_or(0, |t| t.handlers.len())
    }

    /// Returns sorted list of registered topics.
    pub async fn topics(&self) -> Vec<String> {
        let topics = self.topics.read().await;
        let mut names: Vec<String> = topics.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

/// Worker loop: one per subscribed handler.
async fn run_worker<M>(topic: String, handler: HandlerRef<M>, mut rx: mpsc::Receiver<Erased>)
where
    M: Send + Sync + 'static,
{
    debug!(topic = %topic, handler = handler.name(), "handler worker started");

    while let Some(msg) = rx.recv().await {
        let any: &(dyn Any + Send + Sync) = &*msg;
        match any.downcast_ref::<M>() {
            Some(m) => handler.on_message(m).await,
            None => warn!(topic = %topic, handler = handler.name(), "unexpected message type"),
        }
    }

    debug!(topic = %topic, handler = handler.name(), "handler worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;
    use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

    use super::*;
    use crate::bus::{Handler, HandlerFn};

    fn recording<M: Clone + Send + Sync + 'static>(
        name: &'static str,
    ) -> (HandlerRef<M>, UnboundedReceiver<M>) {
        let (tx, rx) = unbounded_channel();
        let h: HandlerRef<M> = HandlerFn::arc(name, move |m: M| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(m);
            }
        });
        (h, rx)
    }

    async fn recv<M>(rx: &mut UnboundedReceiver<M>) -> M {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed")
    }

    /// Blocks in `on_message` until the test hands out permits.
    struct GatedHandler {
        gate: Arc<Semaphore>,
        seen: UnboundedSender<u32>,
    }

    #[async_trait]
    impl Handler<u32> for GatedHandler {
        async fn on_message(&self, msg: &u32) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
            let _ = self.seen.send(*msg);
        }

        fn name(&self) -> &str {
            "gated"
        }

        fn queue_capacity(&self) -> Option<usize> {
            Some(1)
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_handler() {
        let bus = MessageBus::default();
        let (h1, mut rx1) = recording::<bool>("first");
        let (h2, mut rx2) = recording::<bool>("second");

        bus.subscribe("topic", h1).await.unwrap();
        bus.subscribe("topic", h2).await.unwrap();
        bus.publish("topic", true).await.unwrap();

        assert!(recv(&mut rx1).await);
        assert!(recv(&mut rx2).await);
    }

    #[tokio::test]
    async fn test_publish_without_params() {
        let bus = MessageBus::default();
        let (h, mut rx) = recording::<()>("unit");

        bus.subscribe("topic", h).await.unwrap();
        bus.publish("topic", ()).await.unwrap();
        recv(&mut rx).await;
    }

    #[tokio::test]
    async fn test_publish_without_handler() {
        let bus = MessageBus::default();
        let (h, _rx) = recording::<bool>("h");
        bus.subscribe("topic", h).await.unwrap();

        let err = bus.publish("topic-no-handler", true).await.unwrap_err();
        assert_eq!(
            err,
            BusError::NoHandlerFound {
                topic: "topic-no-handler".into()
            }
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_then_publish_reaches_remaining_handler() {
        let bus = MessageBus::default();
        let (h1, mut rx1) = recording::<bool>("first");
        let (h2, mut rx2) = recording::<bool>("second");

        bus.subscribe("t", h1.clone()).await.unwrap();
        bus.subscribe("t", h2.clone()).await.unwrap();
        bus.publish("t", true).await.unwrap();
        assert!(recv(&mut rx1).await);
        assert!(recv(&mut rx2).await);

        bus.unsubscribe("t", &h1).await.unwrap();
        assert_eq!(bus.handler_count("t").await, 1);

        bus.publish("t", false).await.unwrap();
        assert!(!recv(&mut rx2).await);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unsubscribe_last_handler_removes_topic() {
        let bus = MessageBus::default();
        let (h1, _rx1) = recording::<u8>("one");
        let (h2, _rx2) = recording::<u8>("two");

        bus.subscribe("test-2subs", h1.clone()).await.unwrap();
        bus.subscribe("test-2subs", h2.clone()).await.unwrap();
        bus.unsubscribe("test-2subs", &h1).await.unwrap();
        assert!(bus.has_topic("test-2subs").await);

        bus.subscribe("test-1sub", h1.clone()).await.unwrap();
        bus.unsubscribe("test-1sub", &h1).await.unwrap();
        assert!(!bus.has_topic("test-1sub").await);

        let err = bus.unsubscribe("non-existed", &h2).await.unwrap_err();
        assert_eq!(err.as_label(), "bus_topic_not_found");
    }

    #[tokio::test]
    async fn test_duplicate_subscription_removed_together() {
        let bus = MessageBus::default();
        let (h, mut rx) = recording::<u8>("dup");

        bus.subscribe("t", h.clone()).await.unwrap();
        bus.subscribe("t", h.clone()).await.unwrap();
        bus.publish("t", 7u8).await.unwrap();
        assert_eq!(recv(&mut rx).await, 7);
        assert_eq!(recv(&mut rx).await, 7);

        bus.unsubscribe("t", &h).await.unwrap();
        assert!(!bus.has_topic("t").await);
    }

    #[tokio::test]
    async fn test_close_topic() {
        let bus = MessageBus::default();
        let (h, _rx) = recording::<bool>("h");
        bus.subscribe("test", h).await.unwrap();

        let err = bus.close("test-no-topic").await.unwrap_err();
        assert!(matches!(err, BusError::TopicNotFound { .. }));
        assert_eq!(bus.topics().await, vec!["test".to_string()]);

        bus.close("test").await.unwrap();
        assert!(bus.topics().await.is_empty());
        assert!(matches!(
            bus.publish("test", true).await,
            Err(BusError::NoHandlerFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_typed_topic_rejects_mismatches() {
        let bus = MessageBus::default();
        let (h_bool, _rx1) = recording::<bool>("bool");
        let (h_str, _rx2) = recording::<String>("string");

        bus.subscribe("typed", h_bool).await.unwrap();

        let err = bus.subscribe("typed", h_str.clone()).await.unwrap_err();
        assert!(matches!(err, BusError::InvalidHandler { .. }));

        let err = bus.unsubscribe("typed", &h_str).await.unwrap_err();
        assert!(matches!(err, BusError::InvalidHandler { .. }));

        let err = bus.publish("typed", 1u64).await.unwrap_err();
        assert!(matches!(
            err,
            BusError::MessageTypeMismatch {
                expected: "bool",
                found: "u64",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_fifo_per_handler() {
        let bus = MessageBus::new(BusConfig::with_handler_queue_capacity(4));
        let (h, mut rx) = recording::<u32>("ordered");
        bus.subscribe("seq", h).await.unwrap();

        for i in 0..100u32 {
            bus.publish("seq", i).await.unwrap();
        }
        for i in 0..100u32 {
            assert_eq!(recv(&mut rx).await, i);
        }
    }

    #[tokio::test]
    async fn test_publish_blocks_behind_full_queue() {
        let bus = MessageBus::default();
        let gate = Arc::new(Semaphore::new(0));
        let (seen_tx, mut seen) = unbounded_channel();
        let h: HandlerRef<u32> = Arc::new(GatedHandler {
            gate: Arc::clone(&gate),
            seen: seen_tx,
        });
        bus.subscribe("slow", h).await.unwrap();

        bus.publish("slow", 1u32).await.unwrap();
        // fits only once the worker has taken 1 out of the queue
        bus.publish("slow", 2u32).await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(50), bus.publish("slow", 3u32)).await;
        assert!(blocked.is_err(), "publish should wait for queue space");

        gate.add_permits(10);
        bus.publish("slow", 3u32).await.unwrap();
        assert_eq!(recv(&mut seen).await, 1);
        assert_eq!(recv(&mut seen).await, 2);
        assert_eq!(recv(&mut seen).await, 3);
    }

    /// Handler with a roomy queue that holds every message until released.
    fn held(
        name: &'static str,
        gate: &Arc<Semaphore>,
    ) -> (HandlerRef<u32>, UnboundedReceiver<u32>) {
        let (tx, rx) = unbounded_channel();
        let gate = Arc::clone(gate);
        let h = HandlerFn::new(name, move |m: u32| {
            let gate = Arc::clone(&gate);
            let tx = tx.clone();
            async move {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
                let _ = tx.send(m);
            }
        })
        .with_queue_capacity(8);
        let h: HandlerRef<u32> = Arc::new(h);
        (h, rx)
    }

    async fn collect_until_closed(rx: &mut UnboundedReceiver<u32>) -> Vec<u32> {
        let mut seen = Vec::new();
        while let Some(m) = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("worker did not exit")
        {
            seen.push(m);
        }
        seen
    }

    #[tokio::test]
    async fn test_close_topic_drains_queued_messages() {
        let bus = MessageBus::default();
        let gate = Arc::new(Semaphore::new(0));
        let (h, mut rx) = held("held", &gate);
        bus.subscribe("slow", h).await.unwrap();

        for i in 0..5u32 {
            bus.publish("slow", i).await.unwrap();
        }
        bus.close("slow").await.unwrap();
        assert!(!bus.has_topic("slow").await);

        gate.add_permits(5);
        assert_eq!(collect_until_closed(&mut rx).await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_unsubscribe_drains_queued_messages() {
        let bus = MessageBus::default();
        let gate = Arc::new(Semaphore::new(0));
        let (h, mut rx) = held("held", &gate);
        bus.subscribe("slow", h.clone()).await.unwrap();

        for i in 0..5u32 {
            bus.publish("slow", i).await.unwrap();
        }
        bus.unsubscribe("slow", &h).await.unwrap();
        drop(h);

        gate.add_permits(5);
        assert_eq!(collect_until_closed(&mut rx).await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_try_publish_reports_full_queue() {
        let bus = MessageBus::default();
        let gate = Arc::new(Semaphore::new(0));
        let (seen_tx, mut seen) = unbounded_channel();
        let slow: HandlerRef<u32> = Arc::new(GatedHandler {
            gate: Arc::clone(&gate),
            seen: seen_tx,
        });
        let (fast, mut fast_rx) = recording::<u32>("fast");
        bus.subscribe("mixed", slow).await.unwrap();
        bus.subscribe("mixed", fast).await.unwrap();

        bus.publish("mixed", 1u32).await.unwrap();
        bus.publish("mixed", 2u32).await.unwrap();

        let err = bus.try_publish("mixed", 3u32).await.unwrap_err();
        assert_eq!(
            err,
            BusError::QueueFull {
                topic: "mixed".into(),
                dropped: 1
            }
        );

        assert_eq!(recv(&mut fast_rx).await, 1);
        assert_eq!(recv(&mut fast_rx).await, 2);
        assert_eq!(recv(&mut fast_rx).await, 3);

        gate.add_permits(10);
        assert_eq!(recv(&mut seen).await, 1);
        assert_eq!(recv(&mut seen).await, 2);
    }

    #[tokio::test]
    async fn test_handler_reports_its_own_errors() {
        let bus = MessageBus::default();
        let (err_tx, mut err_rx) = unbounded_channel::<String>();
        let h: HandlerRef<u8> = HandlerFn::arc("fallible", move |_: u8| {
            let err_tx = err_tx.clone();
            async move {
                let _ = err_tx.send("throw error".to_string());
            }
        });

        bus.subscribe("topic", h).await.unwrap();
        bus.publish("topic", 0u8).await.unwrap();
        assert_eq!(recv(&mut err_rx).await, "throw error");
    }

    #[tokio::test]
    async fn test_panicking_handler_is_reported_closed() {
        let bus = MessageBus::default();
        let h: HandlerRef<bool> = HandlerFn::arc("boom", |explode: bool| async move {
            if explode {
                panic!("handler exploded");
            }
        });
        bus.subscribe("fragile", h).await.unwrap();
        bus.publish("fragile", true).await.unwrap();

        let mut last = Ok(());
        for _ in 0..200 {
            last = bus.publish("fragile", false).await;
            if last.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            last,
            Err(BusError::Closed {
                topic: "fragile".into(),
                handler: "boom".into()
            })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers() {
        let bus = Arc::new(MessageBus::default());
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let h: HandlerRef<usize> = HandlerFn::arc("count", move |_: usize| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        bus.subscribe("count", h).await.unwrap();

        let mut tasks = Vec::new();
        for p in 0..4usize {
            let bus = Arc::clone(&bus);
            tasks.push(tokio::spawn(async move {
                for i in 0..50usize {
                    bus.publish("count", p * 100 + i).await.unwrap();
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        for _ in 0..400 {
            if counter.load(Ordering::SeqCst) == 200 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }
}
