//! # Tuning knobs for writers and buses.
//!
//! Provides [`WriterConfig`] and [`BusConfig`] plus the default constants they
//! start from. Every value can be overridden per instance.
//!
//! ## Sentinel values
//! - `WriterConfig::queue_capacity = 0` → clamped to 1
//! - `WriterConfig::error_capacity = 0` → same as the queue capacity
//! - `BusConfig::handler_queue_capacity = 0` → [`DEFAULT_HANDLER_QUEUE_CAPACITY`]

use crate::pool::BufferPool;

/// Default capacity of an async writer's queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default initial capacity of a pooled buffer, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Default capacity of a message bus handler queue.
pub const DEFAULT_HANDLER_QUEUE_CAPACITY: usize = 64;

/// Default number of idle buffers a pool keeps around.
pub const DEFAULT_POOL_MAX_IDLE: usize = 1024;

/// Configuration of one [`AsyncWriter`](crate::AsyncWriter).
///
/// ## Field semantics
/// - `queue_capacity`: buffers accepted but not yet written (min 1)
/// - `error_capacity`: sink errors retained until a `write` reports them
///   (`0` = same as `queue_capacity`); the oldest is evicted when full
/// - `pool`: buffer pool to borrow from (`None` = [`BufferPool::global`])
#[derive(Clone, Debug)]
pub struct WriterConfig {
    /// Capacity of the bounded write queue.
    pub queue_capacity: usize,

    /// Number of pending sink errors kept for later reporting.
    pub error_capacity: usize,

    /// Pool the writer borrows its buffers from.
    pub pool: Option<BufferPool>,
}

impl WriterConfig {
    /// Returns a config with the given queue capacity and defaults elsewhere.
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            queue_capacity,
            ..Self::default()
        }
    }

    /// Replaces the buffer pool.
    pub fn with_pool(mut self, pool: BufferPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Returns the error slot capacity, resolving the `0` sentinel.
    #[inline]
    pub fn error_capacity_clamped(&self) -> usize {
        if self.error_capacity == 0 {
            self.queue_capacity_clamped()
        } else {
            self.error_capacity
        }
    }

    /// Returns the configured pool or the process-wide one.
    pub fn pool_or_global(&self) -> BufferPool {
        self.pool.clone().unwrap_or_else(BufferPool::global)
    }
}

impl Default for WriterConfig {
    /// Default configuration:
    ///
    /// - `queue_capacity = 1024`
    /// - `error_capacity = 0` (same as the queue)
    /// - `pool = None` (process-wide pool)
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            error_capacity: 0,
            pool: None,
        }
    }
}

/// Configuration of a [`MessageBus`](crate::MessageBus).
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Queue capacity for handlers that do not declare their own.
    ///
    /// Values below 1 fall back to [`DEFAULT_HANDLER_QUEUE_CAPACITY`].
    pub handler_queue_capacity: usize,
}

impl BusConfig {
    /// Returns a config with the given handler queue capacity.
    pub fn with_handler_queue_capacity(handler_queue_capacity: usize) -> Self {
        Self {
            handler_queue_capacity,
        }
    }

    /// Returns the handler queue capacity, resolving the `0` sentinel.
    #[inline]
    pub fn handler_queue_capacity_clamped(&self) -> usize {
        if self.handler_queue_capacity == 0 {
            DEFAULT_HANDLER_QUEUE_CAPACITY
        } else {
            self.handler_queue_capacity
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            handler_queue_capacity: DEFAULT_HANDLER_QUEUE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_sentinels() {
        let cfg = WriterConfig {
            queue_capacity: 0,
            error_capacity: 0,
            pool: None,
        };
        assert_eq!(cfg.queue_capacity_clamped(), 1);
        assert_eq!(cfg.error_capacity_clamped(), 1);

        let cfg = WriterConfig {
            queue_capacity: 16,
            error_capacity: 4,
            pool: None,
        };
        assert_eq!(cfg.error_capacity_clamped(), 4);
        assert_eq!(WriterConfig::default().error_capacity_clamped(), 1024);
    }

    #[test]
    fn test_bus_sentinel() {
        assert_eq!(
            BusConfig::with_handler_queue_capacity(0).handler_queue_capacity_clamped(),
            DEFAULT_HANDLER_QUEUE_CAPACITY
        );
        assert_eq!(
            BusConfig::with_handler_queue_capacity(3).handler_queue_capacity_clamped(),
            3
        );
    }
}
