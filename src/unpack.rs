//! Writing extracted resources out as flat files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveEntry, ArchiveMeta};
use crate::decoder::ArchiveDecoder;
use crate::stream::Stream;
use crate::Result;

/// Hands out file names for resource paths, one per entry, never the same
/// name twice.
///
/// Paths are passed through `sanitize-filename`. A path that sanitizes to an
/// empty name, `.` or `..` falls back to `resource_<index>`. A name that was
/// already handed out gets a `_(2)`, `_(3)`, ... suffix before its extension.
#[derive(Debug, Default)]
pub struct FileNamer {
    taken: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// File name for the `index`-th extracted entry.
    pub fn file_name(&mut self, index: usize, entry_path: &str) -> String {
        let safe_name = match sanitize_filename::sanitize(entry_path) {
            name if name.is_empty() || name == "." || name == ".." => {
                format!("resource_{index}")
            }
            name => name,
        };

        let mut candidate = safe_name.clone();
        if !self.taken.contains(&candidate) {
            self.taken.insert(candidate.clone());
            return candidate;
        }

        let (stem, ext) = match safe_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (safe_name.as_str(), None),
        };
        let mut n = 2u32;
        loop {
            candidate = match ext {
                Some(ext) => format!("{stem}_({n}).{ext}"),
                None => format!("{stem}_({n})"),
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Extract `entries` into `output`, creating the directory if needed.
///
/// Returns the written paths in the order of `entries`. Stops at the first
/// entry that cannot be read or written.
pub fn extract_to_dir<'m, I>(
    decoder: &dyn ArchiveDecoder,
    stream: &mut Stream<'_>,
    meta: &ArchiveMeta,
    entries: I,
    output: &Path,
) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'m ArchiveEntry>,
{
    fs::create_dir_all(output)?;

    let mut namer = FileNamer::new();
    let mut written = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let bytes = decoder.extract(stream, meta, entry)?;
        let target = output.join(namer.file_name(index, &entry.path));
        fs::write(&target, &bytes)?;
        log::debug!(
            "wrote {} -> {} ({} bytes)",
            entry.path,
            target.display(),
            bytes.len()
        );
        written.push(target);
    }
    Ok(written)
}
