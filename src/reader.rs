//! Positioned byte sources that PE structures are decoded from.

use crate::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// Trait for reading bytes at absolute offsets from a source.
///
/// Implementations are read-only views: they never carry a cursor of their
/// own, so several [`Stream`](crate::stream::Stream)s can walk one source
/// independently.
pub trait Reader {
    /// Read bytes at the given offset into the buffer.
    /// Returns the number of bytes actually read, which is short at end of data.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the source, if known.
    fn size(&self) -> Option<u64>;

    /// Read exact number of bytes at offset, returning error if not enough data.
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let n = self.read_at(offset, buf)?;
        if n < buf.len() {
            return Err(Error::unexpected_eof(offset, buf.len(), n));
        }
        Ok(())
    }
}

fn copy_from(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let Ok(offset) = usize::try_from(offset) else {
        return 0;
    };
    if offset >= data.len() {
        return 0;
    }
    let to_read = buf.len().min(data.len() - offset);
    buf[..to_read].copy_from_slice(&data[offset..offset + to_read]);
    to_read
}

/// Reader over a borrowed byte slice.
#[derive(Debug, Clone, Copy)]
pub struct SliceReader<'a> {
    data: &'a [u8],
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

impl Reader for SliceReader<'_> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        Ok(copy_from(self.data, offset, buf))
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// Reader over an owned buffer, e.g. a whole file loaded into memory.
#[derive(Debug, Clone)]
pub struct VecReader {
    data: Vec<u8>,
}

impl VecReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Reader for VecReader {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        Ok(copy_from(&self.data, offset, buf))
    }

    fn size(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// Reader for files on disk. Bytes are fetched on demand, so large
/// executables are never loaded whole.
pub struct FileReader {
    file: RefCell<File>,
    size: u64,
}

impl FileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let size = file.seek(SeekFrom::End(0))?;
        Ok(Self {
            file: RefCell::new(file),
            size,
        })
    }

    pub fn file_size(&self) -> u64 {
        self.size
    }
}

impl Reader for FileReader {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }
}
