//! Byte-at-a-time access to program streams
//!
//! [`SourceCursor`] wraps the seekable source stream and tracks the current
//! offset itself, so the engine never has to ask the OS where it is.
//! [`read_one`] is the shared single-byte read used for both the source and
//! the program input.

use std::io::{self, Read, Seek, SeekFrom};

/// Read a single byte, returning `None` at end of stream.
///
/// `Interrupted` reads are re-issued, matching the contract of
/// [`std::io::Read::read_exact`].
pub fn read_one<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Seekable source stream with offset tracking
#[derive(Debug)]
pub struct SourceCursor<S> {
    inner: S,
    offset: u64,
}

impl<S: Read + Seek> SourceCursor<S> {
    /// Wrap a stream positioned at its start
    pub fn new(inner: S) -> Self {
        SourceCursor { inner, offset: 0 }
    }

    /// Read the next byte; on success the offset points just past it
    pub fn read_one_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = read_one(&mut self.inner)?;
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Offset of the next byte to be read
    pub fn current_offset(&self) -> u64 {
        self.offset
    }

    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.offset = self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}
