//! # spillway
//!
//! **Spillway** decouples producers from slow consumers inside a tokio
//! application. It provides three building blocks that share one idea: the
//! caller enqueues and returns, a worker task does the slow part.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producers                 queue (bounded)              worker                 destination
//! ┌──────────┐  write()   ┌───────────────────┐  recv  ┌──────────────┐  write  ┌──────────────┐
//! │ caller   ├───────────►│ PooledBuffer FIFO ├───────►│ consumer task├────────►│ Sink (file,  │
//! └──────────┘            └───────────────────┘        └──────┬───────┘         │ gzip, io::W) │
//!       ▲                                                     │ errors          └──────────────┘
//!       └──────────── next write() returns it ◄── ErrorSlot ◄─┘
//!
//! ┌──────────┐ publish()  ┌───────────────────┐        ┌──────────────┐
//! │ caller   ├───────────►│ MessageBus        ├─[q]───►│ worker ──► h1│
//! └──────────┘            │ topic → handlers  ├─[q]───►│ worker ──► h2│
//!                         └───────────────────┘        └──────────────┘
//!
//! ┌──────────┐ publish()  ┌───────────────────┐ try_send
//! │ caller   ├───────────►│ EventBus          ├────────► subscriber channels (drop when full)
//! └──────────┘            └───────────────────┘
//! ```
//!
//! ### Writer lifecycle
//! ```text
//! AsyncWriter::new(sink) ──► Open
//!   write(data) ──► copy into pooled buffer ──► try_send
//!       ├─ queue full   ─► WriterError::QueueFull (nothing enqueued)
//!       └─ sink failed earlier ─► that error (this write is not enqueued)
//!   close()     ──► Closing ──► cancel worker ──► drain queue ──► sink.close() ──► Closed
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Writer**        | Non-blocking writes drained by a background task.           | [`AsyncWriter`], [`Sink`], [`IoSink`]       |
//! | **Files**         | Plain or gzip file destinations.                             | [`FileSink`], [`open_file_writer`]          |
//! | **Message bus**   | Typed topics, one queue and worker per handler.              | [`MessageBus`], [`Handler`], [`HandlerFn`]  |
//! | **Event bus**     | Fire-and-forget fan-out that never blocks the publisher.     | [`EventBus`], [`Event`], [`SubscriptionId`] |
//! | **Buffers**       | Reusable byte buffers shared by all writers.                 | [`BufferPool`], [`PooledBuffer`]            |
//! | **Errors**        | Typed errors with stable labels.                             | [`WriterError`], [`BusError`]               |
//! | **Configuration** | Queue capacities and pool selection.                         | [`WriterConfig`], [`BusConfig`]             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogHandler`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use spillway::{AsyncWriter, HandlerFn, HandlerRef, IoSink, MessageBus, WriterConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Writer: enqueue now, write later.
//!     let writer = AsyncWriter::new(IoSink::new(Vec::<u8>::new()), WriterConfig::default());
//!     writer.write(b"hello ")?;
//!     writer.write(b"world\n")?;
//!     writer.close().await?;
//!
//!     // Message bus: handlers run on their own workers.
//!     let bus = MessageBus::default();
//!     let printer: HandlerRef<String> = HandlerFn::arc("printer", |name: String| async move {
//!         println!("hello, {name}");
//!     });
//!     bus.subscribe("greetings", printer).await?;
//!     bus.publish("greetings", "spillway".to_string()).await?;
//!     bus.close("greetings").await?;
//!     Ok(())
//! }
//! ```
mod bus;
mod config;
mod error;
mod events;
mod pool;
mod writer;

// ---- Public re-exports ----

pub use bus::{Handler, HandlerFn, HandlerRef, MessageBus};
pub use config::{
    BusConfig, DEFAULT_BUFFER_SIZE, DEFAULT_HANDLER_QUEUE_CAPACITY, DEFAULT_POOL_MAX_IDLE,
    DEFAULT_QUEUE_CAPACITY, WriterConfig,
};
pub use error::{BusError, WriterError};
pub use events::{Event, EventBus, SubscriptionId};
pub use pool::{BufferPool, PooledBuffer};
pub use writer::{AsyncWriter, FileSink, IoSink, Sink, open_file_writer};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use bus::LogHandler;
