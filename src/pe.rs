//! PE header parsing.

use crate::coff::NtHeaders;
use crate::data_dir::{DataDirectory, DataDirectoryType};
use crate::dos::DosHeader;
use crate::layout::LayoutConfig;
use crate::reader::SliceReader;
use crate::rva::RvaHelper;
use crate::section::SectionHeader;
use crate::stream::Stream;
use crate::{Error, Result};

/// Everything in front of the section data: DOS header, NT headers, data
/// directory table and section table.
#[derive(Debug, Clone)]
pub struct PEHeaders {
    /// DOS header.
    pub dos_header: DosHeader,
    /// Signature, COFF file header and optional header.
    pub nt_headers: NtHeaders,
    /// Data directories, as many as the optional header declares.
    pub data_directories: Vec<DataDirectory>,
    /// Section headers.
    pub sections: Vec<SectionHeader>,
    /// Offset where the NT headers start.
    pub pe_offset: u64,
}

impl PEHeaders {
    /// Decode all headers from the start of `stream`.
    ///
    /// The data directory table is read right after the optional header's
    /// fixed part and the section table right after the data directories.
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        stream.seek(0);
        let dos_header = DosHeader::read(stream)?;
        if !dos_header.has_valid_signature() {
            return Err(Error::InvalidDosSignature);
        }

        let pe_offset = u64::from(dos_header.e_lfanew);
        stream.seek(pe_offset);
        let nt_headers = NtHeaders::read(stream)?;
        if !nt_headers.has_valid_signature() {
            log::warn!(
                "unexpected NT header signature {:#010x} at {:#x}",
                nt_headers.signature,
                pe_offset
            );
        }

        let optional = &nt_headers.optional_header;
        log::debug!(
            "{} image, machine {:#06x} ({}), file alignment {:#x}, section alignment {:#x}",
            if optional.is_pe32plus() { "PE32+" } else { "PE32" },
            nt_headers.file_header.machine,
            nt_headers.file_header.machine_name().unwrap_or("unknown"),
            optional.file_alignment,
            optional.section_alignment
        );

        let data_directories =
            DataDirectory::read_table(stream, optional.number_of_rva_and_sizes as usize)?;
        let sections =
            SectionHeader::read_table(stream, nt_headers.file_header.number_of_sections as usize)?;
        for section in &sections {
            log::debug!(
                "section {:<8} va {:#010x} vsize {:#x} raw {:#010x} rsize {:#x}",
                section.name_str(),
                section.virtual_address,
                section.virtual_size,
                section.pointer_to_raw_data,
                section.size_of_raw_data
            );
        }

        Ok(Self {
            dos_header,
            nt_headers,
            data_directories,
            sections,
            pe_offset,
        })
    }

    /// Read headers from a byte slice.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let reader = SliceReader::new(data);
        Self::read(&mut Stream::new(&reader))
    }

    pub fn is_64bit(&self) -> bool {
        self.nt_headers.optional_header.is_pe32plus()
    }

    /// Data directory slot `kind`, failing if the table is too short.
    pub fn data_directory(&self, kind: DataDirectoryType) -> Result<DataDirectory> {
        let index = kind.as_index();
        self.data_directories
            .get(index)
            .copied()
            .ok_or(Error::MissingDataDirectory(index))
    }

    pub fn resource_directory(&self) -> Result<DataDirectory> {
        self.data_directory(DataDirectoryType::Resource)
    }

    /// Alignment rules declared by the optional header.
    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig::from_optional_header(&self.nt_headers.optional_header)
    }

    /// Address translator over this image's section table.
    pub fn rva_helper(&self) -> RvaHelper<'_> {
        RvaHelper::new(self.layout(), &self.sections)
    }
}
