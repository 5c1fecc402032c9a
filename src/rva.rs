//! Translation of relative virtual addresses into file offsets.

use crate::layout::LayoutConfig;
use crate::section::SectionHeader;
use crate::{Error, Result};

/// Maps RVAs onto the file using the section table and the image's declared
/// alignments.
#[derive(Debug, Clone, Copy)]
pub struct RvaHelper<'a> {
    layout: LayoutConfig,
    sections: &'a [SectionHeader],
}

impl<'a> RvaHelper<'a> {
    pub fn new(layout: LayoutConfig, sections: &'a [SectionHeader]) -> Self {
        Self { layout, sections }
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    /// First section whose virtual range contains `rva`.
    pub fn section_for_rva(&self, rva: u32) -> Result<&'a SectionHeader> {
        self.sections
            .iter()
            .find(|section| section.contains_rva(rva))
            .ok_or(Error::RvaOutsideSections(rva))
    }

    /// Convert an RVA to an absolute file offset.
    ///
    /// `offset = rva + align_file(pointer_to_raw_data) - align_section(virtual_address)`
    pub fn rva_to_offset(&self, rva: u32) -> Result<u64> {
        let section = self.section_for_rva(rva)?;
        let raw_base = self.layout.align_file(section.pointer_to_raw_data);
        let virtual_base = self.layout.align_section(section.virtual_address);
        // virtual_base <= virtual_address <= rva
        Ok(u64::from(rva - virtual_base) + u64::from(raw_base))
    }
}
