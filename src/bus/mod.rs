//! # Message bus: typed topics, per-handler queues and workers.
//!
//! This module provides the [`Handler`] trait, the closure adapter
//! [`HandlerFn`] and the [`MessageBus`] registry.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                         Handlers (per topic):
//!   task 1 ──┐                            ┌──► [queue] ──► worker ──► h1.on_message()
//!   task 2 ──┼──► MessageBus::publish ────┼──► [queue] ──► worker ──► h2.on_message()
//!   task N ──┘    (topic registry, RwLock) └──► [queue] ──► worker ──► hN.on_message()
//! ```
//!
//! ## Implementing handlers
//! ```no_run
//! use spillway::Handler;
//! use async_trait::async_trait;
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Handler<u64> for Metrics {
//!     async fn on_message(&self, latency_ms: &u64) {
//!         // record latency
//!         let _ = latency_ms;
//!     }
//! }
//! ```

mod handler;
mod handler_fn;
#[cfg(feature = "logging")]
mod log;
mod message_bus;

pub use handler::{Handler, HandlerRef};
pub use handler_fn::HandlerFn;
#[cfg(feature = "logging")]
pub use log::LogHandler;
pub use message_bus::MessageBus;
