//! File and section alignment rules used when mapping RVAs to file offsets.
//!
//! Loaders tolerate images that declare alignments below the architectural
//! minimums, and so does [`LayoutConfig`].

use crate::optional::OptionalHeader;

/// Smallest file alignment taken at face value.
pub const MIN_FILE_ALIGNMENT: u32 = 0x200;
/// Smallest section alignment taken at face value.
pub const MIN_SECTION_ALIGNMENT: u32 = 0x1000;

/// Round `value` down to a multiple of `alignment`. Zero alignment is a no-op.
///
/// Unlike a mask, this also handles alignments that are not powers of two.
#[inline]
pub fn align_down(value: u32, alignment: u32) -> u32 {
    if alignment == 0 {
        return value;
    }
    value - value % alignment
}

/// Alignment values declared by an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Declared file alignment (typically 0x200).
    pub file_alignment: u32,
    /// Declared section alignment (typically 0x1000).
    pub section_alignment: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            file_alignment: MIN_FILE_ALIGNMENT,
            section_alignment: MIN_SECTION_ALIGNMENT,
        }
    }
}

impl LayoutConfig {
    pub fn new(file_alignment: u32, section_alignment: u32) -> Self {
        Self {
            file_alignment,
            section_alignment,
        }
    }

    /// Create config from optional header.
    pub fn from_optional_header(opt: &OptionalHeader) -> Self {
        Self::new(opt.file_alignment, opt.section_alignment)
    }

    /// Divisor used for section addresses: the file alignment stands in when
    /// the declared section alignment is below 0x1000.
    pub fn effective_section_alignment(&self) -> u32 {
        if self.section_alignment < MIN_SECTION_ALIGNMENT {
            self.file_alignment
        } else {
            self.section_alignment
        }
    }

    /// Adjust a raw data pointer: with a declared file alignment below 0x200
    /// the pointer is rounded down to 0x200, otherwise it is used as is.
    pub fn align_file(&self, pointer_to_raw_data: u32) -> u32 {
        if self.file_alignment < MIN_FILE_ALIGNMENT {
            align_down(pointer_to_raw_data, MIN_FILE_ALIGNMENT)
        } else {
            pointer_to_raw_data
        }
    }

    /// Round a section virtual address down to the effective section alignment.
    pub fn align_section(&self, virtual_address: u32) -> u32 {
        align_down(virtual_address, self.effective_section_alignment())
    }
}
