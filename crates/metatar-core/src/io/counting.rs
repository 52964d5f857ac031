//! Counting writer for tracking manifest bytes written.

use std::io::Write;

/// Wrapper writer that tracks total bytes written.
///
/// Only bytes the inner writer accepted are counted, so a failed write
/// leaves the count at what actually reached the sink.
///
/// # Examples
///
/// ```
/// use metatar_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(&[0u8; 512])?;
/// assert_eq!(writer.total_bytes(), 512);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Returns the total number of bytes successfully written.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.bytes_written
    }

    /// Unwraps the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
