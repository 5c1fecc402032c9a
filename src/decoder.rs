//! Archive decoder over PE resource directories.

use crate::archive::{ArchiveEntry, ArchiveMeta};
use crate::crawler::{CrawlLimits, ResourceCrawler};
use crate::dos::DOS_SIGNATURE;
use crate::logger::Logger;
use crate::pe::PEHeaders;
use crate::reader::SliceReader;
use crate::stream::Stream;
use crate::{Error, Result};

/// A container format whose members can be listed and read back.
pub trait ArchiveDecoder {
    /// Stable identifier of the format.
    fn name(&self) -> &'static str;

    /// Cheap signature check. Never fails; unreadable input is not recognized.
    fn detect(&self, stream: &mut Stream<'_>) -> bool;

    /// List every member. Recoverable per-member problems go to `logger`.
    fn enumerate(&self, logger: &dyn Logger, stream: &mut Stream<'_>) -> Result<ArchiveMeta>;

    /// Read the bytes of one member listed by [`ArchiveDecoder::enumerate`].
    fn extract(
        &self,
        stream: &mut Stream<'_>,
        meta: &ArchiveMeta,
        entry: &ArchiveEntry,
    ) -> Result<Vec<u8>>;
}

/// Treats the resource tree of a Windows executable as an archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExeArchiveDecoder {
    limits: CrawlLimits,
}

impl ExeArchiveDecoder {
    pub const NAME: &'static str = "microsoft/exe";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: CrawlLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    /// [`ArchiveDecoder::enumerate`] over in-memory bytes.
    pub fn enumerate_slice(&self, logger: &dyn Logger, data: &[u8]) -> Result<ArchiveMeta> {
        let reader = SliceReader::new(data);
        self.enumerate(logger, &mut Stream::new(&reader))
    }

    /// [`ArchiveDecoder::extract`] over in-memory bytes.
    pub fn extract_slice(
        &self,
        data: &[u8],
        meta: &ArchiveMeta,
        entry: &ArchiveEntry,
    ) -> Result<Vec<u8>> {
        let reader = SliceReader::new(data);
        self.extract(&mut Stream::new(&reader), meta, entry)
    }
}

impl ArchiveDecoder for ExeArchiveDecoder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn detect(&self, stream: &mut Stream<'_>) -> bool {
        stream
            .peek(0, |s| s.read_u16())
            .is_ok_and(|magic| magic == DOS_SIGNATURE)
    }

    fn enumerate(&self, logger: &dyn Logger, stream: &mut Stream<'_>) -> Result<ArchiveMeta> {
        let headers = PEHeaders::read(stream)?;
        let resources = headers.resource_directory()?;
        let rva_helper = headers.rva_helper();
        let base_offset = rva_helper.rva_to_offset(resources.virtual_address)?;
        log::debug!(
            "resource directory at rva {:#x} -> offset {:#x}, {} bytes",
            resources.virtual_address,
            base_offset,
            resources.size
        );

        ResourceCrawler::new(stream, rva_helper, base_offset, logger)
            .with_limits(self.limits)
            .crawl()
    }

    fn extract(
        &self,
        stream: &mut Stream<'_>,
        _meta: &ArchiveMeta,
        entry: &ArchiveEntry,
    ) -> Result<Vec<u8>> {
        stream.seek(entry.offset);
        let len = usize::try_from(entry.size)
            .map_err(|_| Error::unexpected_eof(entry.offset, usize::MAX, 0))?;
        stream.read_bytes(len)
    }
}
