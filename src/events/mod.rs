//! Lightweight events: payload type, subscription ids and the drop-on-full bus.
//!
//! ## Contents
//! - [`Event`] topic + payload delivered to subscribers
//! - [`SubscriptionId`] blake3-derived id returned by [`EventBus::subscribe`]
//! - [`EventBus`] topic registry delivering with `try_send`
//!
//! Unlike the [`MessageBus`](crate::MessageBus), the event bus owns no tasks:
//! subscribers hand in their own channel and drain it however they like.

mod bus;
mod event;

pub use bus::EventBus;
pub use event::{Event, SubscriptionId};
