//! # resex
//!
//! Lists and extracts the resources embedded in Windows PE executables.
//!
//! The resource directory of an image is treated as an archive: every data
//! entry becomes an [`ArchiveEntry`] holding a path built from the directory
//! names above it and the byte range of its payload in the file. Nothing is
//! interpreted; icons, dialogs and version blocks come out as raw bytes.
//!
//! ## Features
//!
//! - **Any source**: read from files, memory slices, or implement the
//!   [`Reader`] trait for custom sources.
//! - **Tolerant**: an unreadable entry is reported through the [`Logger`] and
//!   skipped; the rest of the tree is still listed.
//! - **Bounded**: directory depth and node count are capped by
//!   [`CrawlLimits`], so cyclic or pathological trees terminate.
//!
//! ## Example
//!
//! ```no_run
//! use resex::{ArchiveDecoder, ExeArchiveDecoder, FileReader, LogLogger, Stream};
//!
//! let reader = FileReader::open("example.exe").unwrap();
//! let mut stream = Stream::new(&reader);
//! let decoder = ExeArchiveDecoder::new();
//!
//! if decoder.detect(&mut stream) {
//!     let meta = decoder.enumerate(&LogLogger, &mut stream).unwrap();
//!     for entry in &meta {
//!         let bytes = decoder.extract(&mut stream, &meta, entry).unwrap();
//!         println!("{} ({} bytes)", entry.path, bytes.len());
//!     }
//! }
//! ```

pub mod archive;
pub mod coff;
pub mod crawler;
pub mod data_dir;
pub mod decoder;
pub mod dos;
pub mod error;
pub mod layout;
pub mod logger;
pub mod optional;
pub mod pe;
pub mod reader;
pub mod resource;
pub mod rva;
pub mod section;
pub mod stream;
pub mod unpack;

pub use archive::{ArchiveEntry, ArchiveMeta, PATH_SEPARATOR};
pub use crawler::{CrawlLimits, ResourceCrawler};
pub use decoder::{ArchiveDecoder, ExeArchiveDecoder};
pub use error::{Error, Result};
pub use layout::LayoutConfig;
pub use logger::{LogLogger, Logger, MemoryLogger};
pub use pe::PEHeaders;
pub use reader::{FileReader, Reader, SliceReader, VecReader};
pub use rva::RvaHelper;
pub use section::SectionHeader;
pub use stream::Stream;
pub use unpack::{extract_to_dir, FileNamer};
