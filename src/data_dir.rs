//! Data directory table.

use crate::stream::Stream;
use crate::Result;

/// Data directory slots by their fixed PE index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum DataDirectoryType {
    Export = 0,
    Import = 1,
    /// Resource table (.rsrc)
    Resource = 2,
    Exception = 3,
    Security = 4,
    BaseReloc = 5,
    Debug = 6,
    Architecture = 7,
    GlobalPtr = 8,
    Tls = 9,
    LoadConfig = 10,
    BoundImport = 11,
    Iat = 12,
    DelayImport = 13,
    ClrRuntime = 14,
    Reserved = 15,
}

impl DataDirectoryType {
    /// Get the index value.
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

/// Number of data directories a well-formed image declares.
pub const NUMBER_OF_DIRECTORY_ENTRIES: usize = 16;

/// Data Directory entry (IMAGE_DATA_DIRECTORY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataDirectory {
    /// RVA (Relative Virtual Address) of the table.
    pub virtual_address: u32,
    /// Size of the table in bytes.
    pub size: u32,
}

impl DataDirectory {
    /// Size of a data directory entry in bytes.
    pub const SIZE: usize = 8;

    /// Decode one entry at the stream's current position.
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        Ok(Self {
            virtual_address: stream.read_u32()?,
            size: stream.read_u32()?,
        })
    }

    /// Decode `count` consecutive entries.
    ///
    /// `count` comes straight from the file, so the up-front reservation is
    /// capped; a bogus count fails on the first missing entry instead.
    pub fn read_table(stream: &mut Stream<'_>, count: usize) -> Result<Vec<Self>> {
        let mut dirs = Vec::with_capacity(count.min(NUMBER_OF_DIRECTORY_ENTRIES));
        for _ in 0..count {
            dirs.push(Self::read(stream)?);
        }
        Ok(dirs)
    }
}
