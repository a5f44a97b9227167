//! Random-access backing storage.
//!
//! The document never writes to its backing source. All it needs is the total
//! length and the ability to read an arbitrary range, which any `Read + Seek`
//! type provides: files, buffered files and in-memory cursors alike.

use std::io::{self, Read, Seek, SeekFrom};

/// A random-access, read-only byte source.
pub trait ByteSource {
    /// Total length of the source in bytes.
    fn source_len(&mut self) -> io::Result<u64>;

    /// Reads up to `buf.len()` bytes starting at `position`.
    ///
    /// Returns the number of bytes read; `0` means end of source.
    fn read_at(&mut self, position: u64, buf: &mut [u8]) -> io::Result<usize>;
}

impl<R: Read + Seek> ByteSource for R {
    fn source_len(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0))
    }

    fn read_at(&mut self, position: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.seek(SeekFrom::Start(position))?;
        self.read(buf)
    }
}
