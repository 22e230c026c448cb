//! # Reusable byte buffers for async writers.
//!
//! [`BufferPool`] hands out [`PooledBuffer`]s and takes them back when they are
//! dropped, so a writer does not allocate per `write`.
//!
//! ## Rules
//! - **Reset on borrow**: a borrowed buffer is always empty (no stale bytes).
//! - **Return on drop**: every code path (written, rejected as full, drained at
//!   close) gives the buffer back by dropping it.
//! - **Single owner**: a buffer is held by exactly one of pool, queue or
//!   in-flight write.
//! - **Lazy growth**: the pool starts empty and keeps at most `max_idle` idle
//!   buffers; extra returns are freed.
//!
//! A process-wide pool is available through [`BufferPool::global`]; writers
//! take an explicit pool through [`WriterConfig`](crate::WriterConfig).

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::config::{DEFAULT_BUFFER_SIZE, DEFAULT_POOL_MAX_IDLE};

static GLOBAL_POOL: OnceLock<BufferPool> = OnceLock::new();

struct PoolInner {
    idle: Mutex<Vec<Vec<u8>>>,
    buffer_size: usize,
    max_idle: usize,
}

impl PoolInner {
    fn put(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }
}

/// Shared pool of byte buffers.
///
/// Cheap to clone (internally an `Arc`); clones share the same idle list.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    /// Creates a pool whose fresh buffers start with `buffer_size` bytes of
    /// capacity and which keeps at most `max_idle` idle buffers.
    pub fn new(buffer_size: usize, max_idle: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::new()),
                buffer_size,
                max_idle,
            }),
        }
    }

    /// Returns the process-wide pool (created on first use).
    pub fn global() -> Self {
        GLOBAL_POOL
            .get_or_init(|| Self::new(DEFAULT_BUFFER_SIZE, DEFAULT_POOL_MAX_IDLE))
            .clone()
    }

    /// Borrows an empty buffer.
    pub fn get(&self) -> PooledBuffer {
        let reused = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let mut buf = reused.unwrap_or_else(|| Vec::with_capacity(self.inner.buffer_size));
        buf.clear();
        PooledBuffer {
            buf,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Borrows a buffer holding a copy of `data`.
    pub fn copy_from(&self, data: &[u8]) -> PooledBuffer {
        let mut buf = self.get();
        buf.extend_from_slice(data);
        buf
    }

    /// Number of idle buffers currently held.
    pub fn idle_count(&self) -> usize {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Initial capacity of freshly allocated buffers.
    pub fn buffer_size(&self) -> usize {
        self.inner.buffer_size
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, DEFAULT_POOL_MAX_IDLE)
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("buffer_size", &self.inner.buffer_size)
            .field("max_idle", &self.inner.max_idle)
            .field("idle", &self.idle_count())
            .finish()
    }
}

/// A buffer borrowed from a [`BufferPool`]; returns itself on drop.
pub struct PooledBuffer {
    buf: Vec<u8>,
    pool: Arc<PoolInner>,
}

impl PooledBuffer {
    /// Appends bytes to the buffer.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Returns the buffered bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl std::ops::Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.buf.len())
            .finish()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}
