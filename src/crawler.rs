//! Resource tree walk.
//!
//! The crawler walks the resource directory depth-first and emits one
//! [`ArchiveEntry`] per data entry, in pre-order. Directory entries are read
//! and named one at a time as the walk reaches them, so only the path of the
//! directory chain being walked is held in memory. Only the root directory has
//! to decode; below it every entry is processed on its own and a failure costs
//! that entry's subtree plus one diagnostic, never its siblings.

use crate::archive::{join_path, ArchiveEntry, ArchiveMeta};
use crate::logger::Logger;
use crate::resource::{
    id_display_name, read_resource_string, ResourceDataEntry, ResourceDirectoryEntry,
    ResourceDirectoryHeader, ResourceName, ResourceTarget,
};
use crate::rva::RvaHelper;
use crate::stream::Stream;
use crate::{Error, Result};

/// Bounds on how much of a resource tree is walked.
///
/// Nothing in the format prevents a directory from pointing back at itself,
/// nesting arbitrarily deep, or repeating one entry thousands of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Deepest directory level accepted; the root is level 0.
    pub max_depth: usize,
    /// Directory entries examined before the crawl stops. Every entry costs
    /// one unit, whether it yields a resource, a subdirectory or a failure.
    pub max_nodes: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_nodes: 1_000_000,
        }
    }
}

impl CrawlLimits {
    pub fn new(max_depth: usize, max_nodes: usize) -> Self {
        Self {
            max_depth,
            max_nodes,
        }
    }
}

/// A directory on the current walk chain.
struct Frame {
    offset: u32,
    path: String,
    len: usize,
    /// Index of the next entry to examine.
    next: usize,
}

/// Walks one resource section.
pub struct ResourceCrawler<'a, 'r> {
    stream: &'a mut Stream<'r>,
    rva_helper: RvaHelper<'a>,
    base_offset: u64,
    logger: &'a dyn Logger,
    limits: CrawlLimits,
    meta: ArchiveMeta,
    visited: usize,
    failures: usize,
}

impl<'a, 'r> ResourceCrawler<'a, 'r> {
    /// `base_offset` is the file offset of the resource section's root
    /// directory; every directory-relative offset is resolved against it.
    pub fn new(
        stream: &'a mut Stream<'r>,
        rva_helper: RvaHelper<'a>,
        base_offset: u64,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            stream,
            rva_helper,
            base_offset,
            logger,
            limits: CrawlLimits::default(),
            meta: ArchiveMeta::new(),
            visited: 0,
            failures: 0,
        }
    }

    pub fn with_limits(mut self, limits: CrawlLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Walk the whole tree.
    ///
    /// Fails only if the root directory itself cannot be decoded.
    pub fn crawl(mut self) -> Result<ArchiveMeta> {
        let root = self.open_directory(0, String::new())?;
        let mut frames = vec![root];

        while let Some(frame) = frames.last_mut() {
            if frame.next == frame.len {
                frames.pop();
                continue;
            }
            let (offset, index) = (frame.offset, frame.next);
            frame.next += 1;

            if self.visited >= self.limits.max_nodes {
                let err = Error::NodeLimitExceeded {
                    limit: self.limits.max_nodes,
                };
                self.report(offset, &err);
                break;
            }
            self.visited += 1;

            let entry = match self.read_entry(offset, index) {
                Ok(entry) => entry,
                Err(err) if frames.len() == 1 => return Err(err),
                Err(err) => {
                    // The rest of a truncated table is unreachable.
                    self.report(offset, &err);
                    if let Some(frame) = frames.last_mut() {
                        frame.next = frame.len;
                    }
                    continue;
                }
            };

            match self.visit(&entry, &frames) {
                Ok(Some(child)) => frames.push(child),
                Ok(None) => {}
                Err(err) => self.report(entry.target.offset(), &err),
            }
        }

        log::debug!(
            "resource crawl finished: {} entries, {} nodes visited, {} failures",
            self.meta.len(),
            self.visited,
            self.failures
        );
        Ok(self.meta)
    }

    /// Decode the directory header at `offset`.
    fn open_directory(&mut self, offset: u32, path: String) -> Result<Frame> {
        self.stream.seek(self.base_offset + u64::from(offset));
        let header = ResourceDirectoryHeader::read(self.stream)?;
        log::trace!(
            "resource directory at {:#x}: {} named, {} id entries",
            offset,
            header.number_of_named_entries,
            header.number_of_id_entries
        );
        Ok(Frame {
            offset,
            path,
            len: header.total_entries(),
            next: 0,
        })
    }

    fn read_entry(&mut self, directory: u32, index: usize) -> Result<ResourceDirectoryEntry> {
        let table = self.base_offset
            + u64::from(directory)
            + ResourceDirectoryHeader::SIZE as u64;
        self.stream
            .seek(table + (index * ResourceDirectoryEntry::SIZE) as u64);
        ResourceDirectoryEntry::read(self.stream)
    }

    /// Process one entry of the innermost directory in `frames`. Returns the
    /// child directory to descend into, if any.
    fn visit(&mut self, entry: &ResourceDirectoryEntry, frames: &[Frame]) -> Result<Option<Frame>> {
        let parent = frames.last().map_or("", |frame| frame.path.as_str());

        match entry.target {
            ResourceTarget::Subdirectory { offset } => {
                if frames.len() > self.limits.max_depth {
                    return Err(Error::DepthLimitExceeded {
                        depth: self.limits.max_depth,
                    });
                }
                if frames.iter().any(|frame| frame.offset == offset) {
                    return Err(Error::ResourceCycle { offset });
                }
                let path = join_path(parent, &self.entry_name(entry)?);
                self.open_directory(offset, path).map(Some)
            }
            ResourceTarget::DataEntry { offset } => {
                let path = join_path(parent, &self.entry_name(entry)?);
                self.process_entry(offset, path)?;
                Ok(None)
            }
        }
    }

    fn entry_name(&mut self, entry: &ResourceDirectoryEntry) -> Result<String> {
        match entry.name {
            ResourceName::Named { offset } => {
                let at = self.base_offset + u64::from(offset);
                self.stream.peek(at, read_resource_string)
            }
            ResourceName::Id(id) => Ok(id_display_name(id)),
        }
    }

    fn process_entry(&mut self, offset: u32, path: String) -> Result<()> {
        self.stream.seek(self.base_offset + u64::from(offset));
        let data_entry = ResourceDataEntry::read(self.stream)?;
        let file_offset = self.rva_helper.rva_to_offset(data_entry.offset_to_data)?;
        log::trace!(
            "resource {path}: rva {:#x} -> offset {file_offset:#x}, {} bytes",
            data_entry.offset_to_data,
            data_entry.size
        );
        self.meta
            .push(ArchiveEntry::new(path, file_offset, u64::from(data_entry.size)));
        Ok(())
    }

    fn report(&mut self, offset: u32, err: &Error) {
        self.failures += 1;
        self.logger.error(format_args!(
            "can't read resource entry located at {:#010x} ({})",
            self.base_offset + u64::from(offset),
            err
        ));
    }
}
