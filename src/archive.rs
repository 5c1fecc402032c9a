//! Archive entries produced by the resource crawler.

/// Separator between the levels of an entry path (U+FF0F FULLWIDTH SOLIDUS).
///
/// It never occurs in type names or numeric ids and keeps extracted files
/// flat on disk, one file per entry.
pub const PATH_SEPARATOR: &str = "\u{FF0F}";

/// Append `name` to a parent path. An empty parent yields `name` alone.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{name}")
    }
}

/// One embedded resource: where its bytes live in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Directory names from the root to the leaf, joined by [`PATH_SEPARATOR`].
    pub path: String,
    /// Absolute file offset of the payload.
    pub offset: u64,
    /// Payload length in bytes.
    pub size: u64,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            path: path.into(),
            offset,
            size,
        }
    }

    /// Path components from the root down.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.path.split(PATH_SEPARATOR)
    }
}

/// Ordered collection of entries, in crawl order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveMeta {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: ArchiveEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }

    /// First entry with exactly this path.
    pub fn find(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a ArchiveMeta {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
