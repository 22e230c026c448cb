//! # Lightweight event bus with drop-on-full delivery.
//!
//! [`EventBus`] keeps, per topic, a list of subscriber channels and delivers
//! each published [`Event`] with `try_send` on the publisher's own call stack.
//! There are no worker tasks.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Subscribers (per topic):
//!   task 1 ──┐                      ┌──► mpsc channel ──► receiver owned by subscriber
//!   task 2 ──┼──► EventBus::publish ┼──► mpsc channel ──► ...
//!   task N ──┘    (try_send each)   └──► mpsc channel ──► ...
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: never waits; a full (or closed) channel misses
//!   the event and the call reports [`BusError::QueueFull`] after delivering to
//!   everyone else.
//! - **Ids**: [`SubscriptionId::derive`] over `(topic, ordinal)`; the ordinal is
//!   one bus-wide counter that never goes back, so ids do not repeat within a
//!   topic even after unsubscribes, and no per-topic state outlives a topic.
//! - **Silent unsubscribe**: removing an unknown id is a no-op.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::BusError;
use crate::events::{Event, SubscriptionId};

struct Subscriber<T> {
    id: SubscriptionId,
    sender: mpsc::Sender<Event<T>>,
}

struct Registry<T> {
    topics: HashMap<String, Vec<Subscriber<T>>>,
    // shared by all topics; a removed topic leaves nothing behind
    next_ordinal: u64,
}

/// Topic → subscriber channels, delivered without blocking.
///
/// ## Example
/// ```rust
/// use spillway::EventBus;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let bus = EventBus::new();
/// let (tx, mut rx) = tokio::sync::mpsc::channel(8);
/// let id = bus.subscribe("prices", tx);
///
/// bus.publish("prices", 101.5f64).unwrap();
/// assert_eq!(rx.recv().await.unwrap().payload, 101.5);
///
/// bus.unsubscribe("prices", id);
/// assert!(bus.publish("prices", 99.0).is_err());
/// # }
/// ```
pub struct EventBus<T> {
    registry: RwLock<Registry<T>>,
}

impl<T> EventBus<T>
where
    T: Clone + Send + 'static,
{
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry {
                topics: HashMap::new(),
                next_ordinal: 0,
            }),
        }
    }

    /// Registers `sender` under `topic` and returns its subscription id.
    pub fn subscribe(&self, topic: &str, sender: mpsc::Sender<Event<T>>) -> SubscriptionId {
        let mut reg = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        reg.next_ordinal += 1;
        let id = SubscriptionId::derive(topic, reg.next_ordinal);

        reg.topics
            .entry(topic.to_string())
            .or_insert_with(|| Vec::with_capacity(4))
            .push(Subscriber { id, sender });

        debug!(topic, subscription = %id, "event subscriber added");
        id
    }

    /// Sends `payload` to every subscriber of `topic` without blocking.
    ///
    /// ### Errors
    /// - [`BusError::NoHandlerFound`] if `topic` has no subscribers
    /// - [`BusError::QueueFull`] if some subscribers missed the event; all the
    ///   others received it
    pub fn publish(&self, topic: &str, payload: T) -> Result<(), BusError> {
        let reg = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let subscribers = match reg.topics.get(topic) {
            Some(subs) if !subs.is_empty() => subs,
            _ => {
                return Err(BusError::NoHandlerFound {
                    topic: topic.to_string(),
                });
            }
        };

        let event = Event::new(topic, payload);
        let mut dropped = 0usize;
        for sub in subscribers {
            match sub.sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(topic, subscription = %sub.id, reason = "full", "event dropped");
                    dropped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(topic, subscription = %sub.id, reason = "closed", "event dropped");
                    dropped += 1;
                }
            }
        }
        trace!(topic, subscribers = subscribers.len(), dropped, "event published");

        if dropped == 0 {
            Ok(())
        } else {
            Err(BusError::QueueFull {
                topic: topic.to_string(),
                dropped,
            })
        }
    }

    /// Removes the subscription `id` from `topic`, if present.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) {
        let mut reg = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(subs) = reg.topics.get_mut(topic) else {
            return;
        };
        if let Some(pos) = subs.iter().position(|s| s.id == id) {
            subs.remove(pos);
            debug!(topic, subscription = %id, "event subscriber removed");
        }
        if subs.is_empty() {
            reg.topics.remove(topic);
        }
    }

    /// Number of subscribers registered under `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .topics
            .get(topic)
            .map_or(0, Vec::len)
    }
}

impl<T> Default for EventBus<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
