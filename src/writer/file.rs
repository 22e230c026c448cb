//! # File-backed sinks, optionally gzip-compressed.
//!
//! [`FileSink`] writes either straight into a file or through a gzip encoder.
//! [`open_file_writer`] creates the file and puts an [`AsyncWriter`] in front
//! of it, so log-style producers never wait on disk or compression.
//!
//! ## Rules
//! - The file is created (truncated) synchronously; failure aborts construction.
//! - Closing finishes the gzip stream (trailer included) and syncs the file.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::config::WriterConfig;
use crate::writer::{AsyncWriter, Sink};

/// A sink writing into a file, plain or gzip-compressed.
pub enum FileSink {
    /// Bytes go straight to the file.
    Plain(File),
    /// Bytes are gzip-compressed into the file.
    Gzip(GzEncoder<File>),
}

impl FileSink {
    /// Creates (or truncates) `path` and wraps it.
    pub fn create(path: impl AsRef<Path>, gzip: bool) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), gzip, "file sink created");
        Ok(if gzip {
            FileSink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            FileSink::Plain(file)
        })
    }

    /// Returns `true` if output is compressed.
    pub fn is_gzip(&self) -> bool {
        matches!(self, FileSink::Gzip(_))
    }
}

impl Sink for FileSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            FileSink::Plain(file) => file.write_all(data)?,
            FileSink::Gzip(enc) => enc.write_all(data)?,
        }
        Ok(data.len())
    }

    fn close(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(file) => {
                file.flush()?;
                file.sync_all()
            }
            FileSink::Gzip(enc) => {
                enc.try_finish()?;
                enc.get_ref().sync_all()
            }
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSink::Plain(_) => f.write_str("FileSink::Plain"),
            FileSink::Gzip(_) => f.write_str("FileSink::Gzip"),
        }
    }
}

/// Creates `path` and returns an [`AsyncWriter`] writing into it.
///
/// With `gzip = true` the content is gzip-compressed; the stream is finished
/// when the writer is closed.
///
/// ### Errors
/// Returns the I/O error if the file cannot be created.
pub fn open_file_writer(
    path: impl AsRef<Path>,
    gzip: bool,
    cfg: WriterConfig,
) -> io::Result<AsyncWriter> {
    let sink = FileSink::create(path, gzip)?;
    Ok(AsyncWriter::new(sink, cfg))
}
