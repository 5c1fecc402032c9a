//! Section header structures and parsing.

use crate::stream::Stream;
use crate::Result;

/// IMAGE_SECTION_HEADER.
///
/// Only the virtual range and the raw pointer take part in address
/// translation; the rest is carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionHeader {
    /// Null-padded, not necessarily ASCII.
    pub name: [u8; 8],
    pub virtual_size: u32,
    pub virtual_address: u32,
    pub size_of_raw_data: u32,
    pub pointer_to_raw_data: u32,
    pub pointer_to_relocations: u32,
    pub pointer_to_linenumbers: u32,
    pub number_of_relocations: u16,
    pub number_of_linenumbers: u16,
    pub characteristics: u32,
}

impl SectionHeader {
    pub const SIZE: usize = 40;

    /// Decode a section header at the stream's current position.
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        Ok(Self {
            name: stream.read_array()?,
            virtual_size: stream.read_u32()?,
            virtual_address: stream.read_u32()?,
            size_of_raw_data: stream.read_u32()?,
            pointer_to_raw_data: stream.read_u32()?,
            pointer_to_relocations: stream.read_u32()?,
            pointer_to_linenumbers: stream.read_u32()?,
            number_of_relocations: stream.read_u16()?,
            number_of_linenumbers: stream.read_u16()?,
            characteristics: stream.read_u32()?,
        })
    }

    /// Decode `count` consecutive section headers.
    pub fn read_table(stream: &mut Stream<'_>, count: usize) -> Result<Vec<Self>> {
        let mut sections = Vec::with_capacity(count.min(96));
        for _ in 0..count {
            sections.push(Self::read(stream)?);
        }
        Ok(sections)
    }

    /// Name up to the first NUL; empty if it is not UTF-8.
    pub fn name_str(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(8);
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }

    /// Whether `rva` falls inside `[virtual_address, virtual_address + virtual_size)`.
    pub fn contains_rva(&self, rva: u32) -> bool {
        let start = u64::from(self.virtual_address);
        let end = start + u64::from(self.virtual_size);
        (start..end).contains(&u64::from(rva))
    }
}
