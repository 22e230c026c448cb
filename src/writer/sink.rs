//! # Sink contract
//!
//! A [`Sink`] is the blocking destination an [`AsyncWriter`](crate::AsyncWriter)
//! writes to. The writer moves the sink into its consumer task and calls it
//! from tokio's blocking pool, so implementations may block freely.
//!
//! ## Contract
//! - `write` receives one whole accepted buffer and returns the number of bytes
//!   consumed; a short count is reported as an error by the writer.
//! - `close` is invoked exactly once, after the final drain at shutdown.
//!   The default does nothing (sinks without a close capability).

use std::io;

/// Blocking destination for an async writer.
pub trait Sink: Send + 'static {
    /// Writes one buffer.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Releases the sink; called once at writer shutdown.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts any [`std::io::Write`] into a [`Sink`].
///
/// Each buffer is written with `write_all`; `close` flushes.
///
/// ## Example
/// ```
/// use spillway::{IoSink, Sink};
///
/// let mut sink = IoSink::new(Vec::new());
/// sink.write(b"abc").unwrap();
/// sink.close().unwrap();
/// assert_eq!(sink.into_inner(), b"abc");
/// ```
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W> IoSink<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Borrows the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: io::Write + Send + 'static> Sink for IoSink<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Flushy {
        data: Vec<u8>,
        flushed: bool,
    }

    impl io::Write for Flushy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            // Accept one byte at a time to exercise write_all.
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_io_sink_writes_whole_buffer_and_flushes_on_close() {
        let mut sink = IoSink::new(Flushy {
            data: Vec::new(),
            flushed: false,
        });
        assert_eq!(sink.write(b"hello").unwrap(), 5);
        sink.close().unwrap();

        let inner = sink.into_inner();
        assert_eq!(inner.data, b"hello");
        assert!(inner.flushed);
    }

    #[test]
    fn test_boxed_sink_delegates() {
        let mut sink: Box<dyn Sink> = Box::new(IoSink::new(Vec::new()));
        assert_eq!(sink.write(b"xy").unwrap(), 2);
        assert!(sink.close().is_ok());
    }
}
