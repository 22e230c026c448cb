//! # Queued writer in front of a blocking sink.
//!
//! [`AsyncWriter`] makes writes to a slow [`Sink`] look non-blocking: `write`
//! copies the data into a pooled buffer and enqueues it; a dedicated consumer
//! task writes buffers to the sink in FIFO order.
//!
//! ## Architecture
//! ```text
//! write(data)
//!     ├─► pending sink error? ──► return it (nothing enqueued)
//!     ├─► pool.copy_from(data)
//!     └─► try_send ──► [bounded queue] ──► consumer task
//!           │                                  ├─► spawn_blocking(sink.write)
//!           └─► full → QueueFull               ├─► error → error slot
//!                                              └─► buffer dropped → pool
//!
//! close()
//!     └─► cancel token ──► consumer: close queue, drain, sink.close() ──► joined
//! ```
//!
//! ## Rules
//! - **Non-blocking write**: `write` never waits; a full queue is `QueueFull`.
//! - **Deferred errors**: a sink error is reported by a *later* `write`.
//! - **Bounded error slot**: when full, the oldest pending error is evicted.
//! - **No loss on close**: every buffer accepted before the queue is closed
//!   reaches the sink before `Sink::close` runs.
//! - **Lifecycle**: `Open → Closing → Closed`, no way back.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::WriterConfig;
use crate::error::WriterError;
use crate::pool::{BufferPool, PooledBuffer};
use crate::writer::Sink;

const STATE_OPEN: u8 = 0;
const STATE_CLOSING: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// Bounded FIFO of sink errors waiting to be reported.
struct ErrorSlot {
    pending: Mutex<VecDeque<io::Error>>,
    capacity: usize,
}

impl ErrorSlot {
    fn new(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
            capacity: capacity.max(1),
        }
    }

    /// Stores an error; returns `true` if an older one had to be evicted.
    fn push(&self, err: io::Error) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let evicted = if pending.len() >= self.capacity {
            pending.pop_front();
            true
        } else {
            false
        };
        pending.push_back(err);
        evicted
    }

    fn pop(&self) -> Option<io::Error> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Non-blocking writer backed by one consumer task.
///
/// Must be created inside a tokio runtime. Dropping the writer without
/// [`close`](AsyncWriter::close) still drains and closes the sink in the
/// background.
///
/// ## Example
/// ```
/// use spillway::{AsyncWriter, IoSink, WriterConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), spillway::WriterError> {
/// let writer = AsyncWriter::new(IoSink::new(std::io::sink()), WriterConfig::default());
/// assert_eq!(writer.write(b"hello")?, 5);
/// writer.close().await?;
/// assert!(writer.write(b"late").is_err());
/// # Ok(())
/// # }
/// ```
pub struct AsyncWriter {
    queue: mpsc::Sender<PooledBuffer>,
    pool: BufferPool,
    state: AtomicU8,
    errors: Arc<ErrorSlot>,
    token: CancellationToken,
    consumer: Mutex<Option<JoinHandle<Result<(), WriterError>>>>,
}

impl AsyncWriter {
    /// Creates a writer and spawns its consumer task.
    pub fn new<S: Sink>(sink: S, cfg: WriterConfig) -> Self {
        Self::spawn(sink, cfg, CancellationToken::new())
    }

    /// Creates a writer whose consumer also stops when `parent` is cancelled.
    ///
    /// Parent cancellation drains and closes the sink exactly like
    /// [`close`](AsyncWriter::close); later writes fail with `Closed`.
    pub fn with_parent<S: Sink>(sink: S, cfg: WriterConfig, parent: &CancellationToken) -> Self {
        Self::spawn(sink, cfg, parent.child_token())
    }

    fn spawn<S: Sink>(sink: S, cfg: WriterConfig, token: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel::<PooledBuffer>(cfg.queue_capacity_clamped());
        let errors = Arc::new(ErrorSlot::new(cfg.error_capacity_clamped()));

        let consumer = tokio::spawn(run_consumer(
            sink,
            rx,
            token.clone(),
            Arc::clone(&errors),
        ));

        Self {
            queue: tx,
            pool: cfg.pool_or_global(),
            state: AtomicU8::new(STATE_OPEN),
            errors,
            token,
            consumer: Mutex::new(Some(consumer)),
        }
    }

    /// Enqueues a copy of `data` without blocking.
    ///
    /// ### Errors
    /// - [`WriterError::Closed`] once close has started, the parent token was
    ///   cancelled or the consumer stopped
    /// - a pending [`WriterError::Sink`] from an earlier write; nothing is enqueued
    /// - [`WriterError::QueueFull`] when the queue has no room; retryable
    pub fn write(&self, data: &[u8]) -> Result<usize, WriterError> {
        if self.is_closed() {
            return Err(WriterError::Closed);
        }
        if let Some(err) = self.errors.pop() {
            return Err(WriterError::Sink(err));
        }

        let buf = self.pool.copy_from(data);
        match self.queue.try_send(buf) {
            Ok(()) => Ok(data.len()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(WriterError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(WriterError::Closed),
        }
    }

    /// Stops the consumer, drains the queue into the sink and closes the sink.
    ///
    /// Waits until the consumer has fully stopped. Returns the sink's close
    /// error if there is one, otherwise the oldest sink error nobody has seen
    /// yet (e.g. one hit while draining); a second call returns
    /// [`WriterError::Closed`].
    pub async fn close(&self) -> Result<(), WriterError> {
        if self
            .state
            .compare_exchange(
                STATE_OPEN,
                STATE_CLOSING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(WriterError::Closed);
        }

        self.token.cancel();
        let consumer = self
            .consumer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let res = match consumer {
            Some(handle) => match handle.await {
                Ok(res) => res,
                Err(join_err) => Err(WriterError::Internal(join_err.to_string())),
            },
            None => Ok(()),
        };

        self.state.store(STATE_CLOSED, Ordering::Release);
        res?;
        match self.errors.pop() {
            Some(err) => Err(WriterError::Sink(err)),
            None => Ok(()),
        }
    }

    /// Returns `true` once the writer stopped accepting data: close has
    /// started, the parent token was cancelled or the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) != STATE_OPEN
            || self.token.is_cancelled()
            || self.queue.is_closed()
    }

    /// Number of sink errors waiting to be reported.
    pub fn pending_errors(&self) -> usize {
        self.errors.len()
    }
}

impl Drop for AsyncWriter {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl std::fmt::Debug for AsyncWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncWriter")
            .field("state", &self.state.load(Ordering::Relaxed))
            .field("pending_errors", &self.errors.len())
            .finish()
    }
}

impl io::Write for &AsyncWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        AsyncWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Consumer loop: one per writer, owns the sink.
async fn run_consumer<S: Sink>(
    mut sink: S,
    mut rx: mpsc::Receiver<PooledBuffer>,
    token: CancellationToken,
    errors: Arc<ErrorSlot>,
) -> Result<(), WriterError> {
    debug!("async writer consumer started");

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            msg = rx.recv() => match msg {
                Some(buf) => sink = write_one(sink, buf, &errors).await?,
                None => break,
            },
        }
    }

    // Anything accepted before this point is drained; later try_send sees Closed.
    rx.close();
    let mut drained = 0usize;
    while let Ok(buf) = rx.try_recv() {
        sink = write_one(sink, buf, &errors).await?;
        drained += 1;
    }
    debug!(drained, "async writer queue drained");

    let res = tokio::task::spawn_blocking(move || sink.close())
        .await
        .map_err(|e| WriterError::Internal(e.to_string()))?;
    if let Err(err) = &res {
        warn!(error = %err, "sink close failed");
    }
    debug!("async writer consumer stopped");
    res.map_err(WriterError::Sink)
}

/// Writes one buffer on the blocking pool and hands the sink back.
async fn write_one<S: Sink>(
    mut sink: S,
    buf: PooledBuffer,
    errors: &ErrorSlot,
) -> Result<S, WriterError> {
    let (sink, res) = tokio::task::spawn_blocking(move || {
        let res = match sink.write(&buf) {
            Ok(n) if n < buf.len() => Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {n} of {} bytes", buf.len()),
            )),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        trace!(len = buf.len(), ok = res.is_ok(), "buffer written");
        (sink, res)
    })
    .await
    .map_err(|e| WriterError::Internal(e.to_string()))?;

    if let Err(err) = res {
        warn!(error = %err, "sink write failed");
        if errors.push(err) {
            warn!("error slot full, oldest pending error evicted");
        }
    }
    Ok(sink)
}
