//! # Events delivered by the [`EventBus`](crate::EventBus).
//!
//! An [`Event`] pairs the topic it was published to with an opaque payload.
//! It is built once per publish and cloned into every subscriber channel.
//!
//! [`SubscriptionId`] identifies one subscription. It is derived from the topic
//! and the registration ordinal with blake3, so the same registration history
//! yields the same ids.
//!
//! ## Example
//! ```rust
//! use spillway::{Event, SubscriptionId};
//!
//! let ev = Event::new("orders", 42u32);
//! assert_eq!(ev.topic, "orders");
//! assert_eq!(ev.payload, 42);
//!
//! assert_eq!(SubscriptionId::derive("orders", 1), SubscriptionId::derive("orders", 1));
//! assert_ne!(SubscriptionId::derive("orders", 1), SubscriptionId::derive("orders", 2));
//! ```

use std::fmt;

/// A published payload together with its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<T> {
    /// Topic the event was published to.
    pub topic: String,
    /// Opaque payload.
    pub payload: T,
}

impl<T> Event<T> {
    /// Creates an event.
    pub fn new(topic: impl Into<String>, payload: T) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Identifier of one event bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    /// Derives the id for registration number `ordinal` of a bus, made on `topic`.
    pub fn derive(topic: &str, ordinal: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(topic.as_bytes());
        hasher.update(&[0]);
        hasher.update(ordinal.to_string().as_bytes());
        let digest = hasher.finalize();

        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        Self(u64::from_le_bytes(head))
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
