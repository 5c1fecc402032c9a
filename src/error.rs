//! Error types for header decoding, address translation and resource crawling.

use std::io;

use thiserror::Error;

/// Result type alias for resex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a PE image or walking its resources.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The source ended before a structure was fully read.
    #[error("unexpected end of data at {offset:#x}: expected {expected} bytes, got {actual}")]
    UnexpectedEof {
        offset: u64,
        expected: usize,
        actual: usize,
    },
    /// Invalid DOS signature (expected "MZ").
    #[error("invalid DOS signature (expected 'MZ')")]
    InvalidDosSignature,
    /// Optional header magic is neither PE32 nor PE32+.
    #[error("invalid optional header magic: {0:#06x}")]
    InvalidOptionalHeaderMagic(u16),
    /// The data directory table has no slot at the given index.
    #[error("data directory {0} is not present in the optional header")]
    MissingDataDirectory(usize),
    /// No section contains the given RVA.
    #[error("RVA {0:#x} does not belong to any section")]
    RvaOutsideSections(u32),
    /// A subdirectory would be nested deeper than allowed.
    #[error("resource directory nesting exceeds depth limit of {depth}")]
    DepthLimitExceeded { depth: usize },
    /// The crawl visited more nodes than allowed.
    #[error("resource tree exceeds node limit of {limit}")]
    NodeLimitExceeded { limit: usize },
    /// A subdirectory points back at one of its ancestors.
    #[error("resource directory at offset {offset:#x} refers to itself")]
    ResourceCycle { offset: u32 },
}

impl Error {
    pub(crate) fn unexpected_eof(offset: u64, expected: usize, actual: usize) -> Self {
        Error::UnexpectedEof {
            offset,
            expected,
            actual,
        }
    }

    /// Whether this error means the input ran out of bytes.
    pub fn is_truncation(&self) -> bool {
        match self {
            Error::UnexpectedEof { .. } => true,
            Error::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
