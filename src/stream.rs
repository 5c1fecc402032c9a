//! Sequential cursor over a [`Reader`].
//!
//! Header structures are decoded front to back from a `Stream`. Every seek is
//! absolute; [`Stream::peek`] runs a body of reads elsewhere and puts the
//! cursor back afterwards, whatever the body returned.

use crate::reader::Reader;
use crate::{Error, Result};

/// A mutable read cursor over a borrowed [`Reader`].
pub struct Stream<'a> {
    reader: &'a dyn Reader,
    pos: u64,
}

impl<'a> Stream<'a> {
    /// Create a cursor positioned at offset 0.
    pub fn new(reader: &'a dyn Reader) -> Self {
        Self { reader, pos: 0 }
    }

    /// Move to an absolute offset. Seeking past the end is allowed; the next
    /// read fails instead.
    pub fn seek(&mut self, offset: u64) {
        self.pos = offset;
    }

    /// Current absolute offset.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Advance the cursor by `count` bytes without reading them.
    pub fn skip(&mut self, count: u64) {
        self.pos = self.pos.saturating_add(count);
    }

    /// Size of the underlying source, if known.
    pub fn size(&self) -> Option<u64> {
        self.reader.size()
    }

    /// Whether the cursor is at or past the end of a source of known size.
    pub fn is_eof(&self) -> bool {
        self.size().is_some_and(|size| self.pos >= size)
    }

    /// Fill `buf` from the current position and advance past it.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact_at(self.pos, buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Read `len` bytes into a new buffer.
    ///
    /// When the source size is known, a request running past the end fails
    /// before anything is allocated.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if let Some(size) = self.size() {
            let available = size.saturating_sub(self.pos);
            if (len as u64) > available {
                return Err(Error::unexpected_eof(
                    self.pos,
                    len,
                    usize::try_from(available).unwrap_or(usize::MAX),
                ));
            }
        }
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Run `body` with the cursor at `offset`, then restore the previous
    /// position regardless of the outcome.
    pub fn peek<T, F>(&mut self, offset: u64, body: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved = self.pos;
        self.pos = offset;
        let result = body(self);
        self.pos = saved;
        result
    }
}
