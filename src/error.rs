//! Error types used by the async writer and the buses.
//!
//! This module defines two main error enums:
//!
//! - [`WriterError`] — errors raised by [`AsyncWriter`](crate::AsyncWriter).
//! - [`BusError`] — errors raised by [`MessageBus`](crate::MessageBus) and
//!   [`EventBus`](crate::EventBus).
//!
//! Both types provide `as_label` for logs/metrics. None of these errors are
//! fatal to the process: they are values for the caller to log, retry or drop.

use std::io;

use thiserror::Error;

/// # Errors produced by the async writer.
///
/// Sink errors are decoupled from the write that caused them: a write may be
/// accepted and the resulting sink error only surfaces on a later call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WriterError {
    /// The writer has been closed (or is closing); nothing was enqueued.
    #[error("write on closed writer")]
    Closed,

    /// The bounded queue had no capacity; nothing was enqueued. Retryable.
    #[error("async writer queue full")]
    QueueFull,

    /// The sink rejected a previously accepted write, or failed to close.
    #[error("sink error: {0}")]
    Sink(#[from] io::Error),

    /// The consumer task died unexpectedly (sink panic).
    #[error("internal error: {0}")]
    Internal(String),
}

impl WriterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use spillway::WriterError;
    ///
    /// assert_eq!(WriterError::QueueFull.as_label(), "writer_queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WriterError::Closed => "writer_closed",
            WriterError::QueueFull => "writer_queue_full",
            WriterError::Sink(_) => "writer_sink",
            WriterError::Internal(_) => "writer_internal",
        }
    }

    /// Indicates whether retrying the same write later may succeed.
    ///
    /// Only [`WriterError::QueueFull`] is retryable; a rejected write leaves the
    /// order of already accepted data untouched.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WriterError::QueueFull)
    }
}

impl From<WriterError> for io::Error {
    fn from(err: WriterError) -> Self {
        match err {
            WriterError::Sink(e) => e,
            WriterError::QueueFull => io::Error::new(io::ErrorKind::WouldBlock, err),
            WriterError::Closed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            WriterError::Internal(_) => io::Error::other(err),
        }
    }
}

/// # Errors produced by the message bus and the event bus.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A handler's worker has already stopped; the message could not be queued for it.
    #[error("handler {handler} on topic {topic:?} is closed")]
    Closed {
        /// Topic the message was published to.
        topic: String,
        /// Name of the handler whose queue is closed.
        handler: String,
    },

    /// Non-blocking delivery found full (or closed) queues; the message was
    /// dropped for those consumers only.
    #[error("bus queue is full for topic {topic:?} ({dropped} dropped)")]
    QueueFull {
        /// Topic the message was published to.
        topic: String,
        /// Number of consumers that did not receive the message.
        dropped: usize,
    },

    /// Publish on a topic without any handler or subscriber.
    #[error("no bus handler found for topic {topic:?}")]
    NoHandlerFound {
        /// Requested topic.
        topic: String,
    },

    /// Unsubscribe/close on a topic that is not registered.
    #[error("bus topic {topic:?} not found")]
    TopicNotFound {
        /// Requested topic.
        topic: String,
    },

    /// The handler cannot be attached to (or detached from) this topic.
    #[error("invalid handler for topic {topic:?}: {reason}")]
    InvalidHandler {
        /// Requested topic.
        topic: String,
        /// Why the handler was rejected.
        reason: String,
    },

    /// A message of the wrong type was published to a typed topic.
    #[error("topic {topic:?} carries {expected}, got {found}")]
    MessageTypeMismatch {
        /// Requested topic.
        topic: String,
        /// Message type the topic was created with.
        expected: &'static str,
        /// Message type that was published.
        found: &'static str,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use spillway::BusError;
    ///
    /// let err = BusError::TopicNotFound { topic: "jobs".into() };
    /// assert_eq!(err.as_label(), "bus_topic_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Closed { .. } => "bus_closed",
            BusError::QueueFull { .. } => "bus_queue_full",
            BusError::NoHandlerFound { .. } => "bus_no_handler",
            BusError::TopicNotFound { .. } => "bus_topic_not_found",
            BusError::InvalidHandler { .. } => "bus_invalid_handler",
            BusError::MessageTypeMismatch { .. } => "bus_type_mismatch",
        }
    }

    /// Returns the topic the error refers to.
    pub fn topic(&self) -> &str {
        match self {
            BusError::Closed { topic, .. }
            | BusError::QueueFull { topic, .. }
            | BusError::NoHandlerFound { topic }
            | BusError::TopicNotFound { topic }
            | BusError::InvalidHandler { topic, .. }
            | BusError::MessageTypeMismatch { topic, .. } => topic,
        }
    }
}
