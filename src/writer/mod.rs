//! Async writer: sink contract, queued writer and file sinks.
//!
//! ## Contents
//! - [`Sink`], [`IoSink`] blocking destination contract and `io::Write` adapter
//! - [`AsyncWriter`] bounded queue + consumer task in front of a sink
//! - [`FileSink`], [`open_file_writer`] plain or gzip file output

mod async_writer;
mod file;
mod sink;

pub use async_writer::AsyncWriter;
pub use file::{FileSink, open_file_writer};
pub use sink::{IoSink, Sink};
