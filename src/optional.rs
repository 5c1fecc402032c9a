//! Optional header structures and parsing.
//!
//! PE32 and PE32+ share one layout except for the image base, the PE32-only
//! `base_of_data` field, and the width of the four stack/heap fields. Both
//! decode into the same [`OptionalHeader`], with the narrow fields widened.
//! The data directory table that trails the header is decoded separately by
//! [`DataDirectory::read_table`](crate::data_dir::DataDirectory::read_table).

use crate::stream::Stream;
use crate::{Error, Result};

/// PE32 magic number.
pub const PE32_MAGIC: u16 = 0x10B;
/// PE32+ (64-bit) magic number.
pub const PE32PLUS_MAGIC: u16 = 0x20B;

/// Which optional header variant was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalHeaderKind {
    /// 32-bit image (magic 0x10B).
    Pe32,
    /// 64-bit image (magic 0x20B).
    Pe32Plus,
}

impl OptionalHeaderKind {
    pub fn from_magic(magic: u16) -> Option<Self> {
        match magic {
            PE32_MAGIC => Some(Self::Pe32),
            PE32PLUS_MAGIC => Some(Self::Pe32Plus),
            _ => None,
        }
    }

    /// Size of the fixed part of the header, data directories excluded.
    pub const fn base_size(self) -> usize {
        match self {
            Self::Pe32 => 96,
            Self::Pe32Plus => 112,
        }
    }
}

/// Optional header (IMAGE_OPTIONAL_HEADER32 / IMAGE_OPTIONAL_HEADER64).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalHeader {
    pub magic: u16,
    pub kind: OptionalHeaderKind,
    pub major_linker_version: u8,
    pub minor_linker_version: u8,
    pub size_of_code: u32,
    pub size_of_initialized_data: u32,
    pub size_of_uninitialized_data: u32,
    pub address_of_entry_point: u32,
    pub base_of_code: u32,
    /// Only present in PE32 images.
    pub base_of_data: Option<u32>,
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub major_operating_system_version: u16,
    pub minor_operating_system_version: u16,
    pub major_image_version: u16,
    pub minor_image_version: u16,
    pub major_subsystem_version: u16,
    pub minor_subsystem_version: u16,
    pub win32_version_value: u32,
    pub size_of_image: u32,
    pub size_of_headers: u32,
    pub check_sum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub size_of_stack_reserve: u64,
    pub size_of_stack_commit: u64,
    pub size_of_heap_reserve: u64,
    pub size_of_heap_commit: u64,
    pub loader_flags: u32,
    /// Number of entries in the data directory table that follows.
    pub number_of_rva_and_sizes: u32,
}

impl OptionalHeader {
    /// Decode the optional header at the stream's current position.
    ///
    /// Consumes exactly [`OptionalHeaderKind::base_size`] bytes. A magic other
    /// than PE32 or PE32+ fails with [`Error::InvalidOptionalHeaderMagic`].
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        let magic = stream.read_u16()?;
        let kind =
            OptionalHeaderKind::from_magic(magic).ok_or(Error::InvalidOptionalHeaderMagic(magic))?;
        let pe32 = kind == OptionalHeaderKind::Pe32;

        let major_linker_version = stream.read_u8()?;
        let minor_linker_version = stream.read_u8()?;
        let size_of_code = stream.read_u32()?;
        let size_of_initialized_data = stream.read_u32()?;
        let size_of_uninitialized_data = stream.read_u32()?;
        let address_of_entry_point = stream.read_u32()?;
        let base_of_code = stream.read_u32()?;
        let (base_of_data, image_base) = if pe32 {
            (Some(stream.read_u32()?), u64::from(stream.read_u32()?))
        } else {
            (None, stream.read_u64()?)
        };
        let section_alignment = stream.read_u32()?;
        let file_alignment = stream.read_u32()?;
        let major_operating_system_version = stream.read_u16()?;
        let minor_operating_system_version = stream.read_u16()?;
        let major_image_version = stream.read_u16()?;
        let minor_image_version = stream.read_u16()?;
        let major_subsystem_version = stream.read_u16()?;
        let minor_subsystem_version = stream.read_u16()?;
        let win32_version_value = stream.read_u32()?;
        let size_of_image = stream.read_u32()?;
        let size_of_headers = stream.read_u32()?;
        let check_sum = stream.read_u32()?;
        let subsystem = stream.read_u16()?;
        let dll_characteristics = stream.read_u16()?;

        let size_of_stack_reserve = read_reserve_field(stream, kind)?;
        let size_of_stack_commit = read_reserve_field(stream, kind)?;
        let size_of_heap_reserve = read_reserve_field(stream, kind)?;
        let size_of_heap_commit = read_reserve_field(stream, kind)?;

        let loader_flags = stream.read_u32()?;
        let number_of_rva_and_sizes = stream.read_u32()?;

        Ok(Self {
            magic,
            kind,
            major_linker_version,
            minor_linker_version,
            size_of_code,
            size_of_initialized_data,
            size_of_uninitialized_data,
            address_of_entry_point,
            base_of_code,
            base_of_data,
            image_base,
            section_alignment,
            file_alignment,
            major_operating_system_version,
            minor_operating_system_version,
            major_image_version,
            minor_image_version,
            major_subsystem_version,
            minor_subsystem_version,
            win32_version_value,
            size_of_image,
            size_of_headers,
            check_sum,
            subsystem,
            dll_characteristics,
            size_of_stack_reserve,
            size_of_stack_commit,
            size_of_heap_reserve,
            size_of_heap_commit,
            loader_flags,
            number_of_rva_and_sizes,
        })
    }

    pub fn is_pe32plus(&self) -> bool {
        self.kind == OptionalHeaderKind::Pe32Plus
    }
}

/// Stack/heap sizes are 4 bytes wide in PE32 and 8 bytes in PE32+.
fn read_reserve_field(stream: &mut Stream<'_>, kind: OptionalHeaderKind) -> Result<u64> {
    match kind {
        OptionalHeaderKind::Pe32 => Ok(u64::from(stream.read_u32()?)),
        OptionalHeaderKind::Pe32Plus => stream.read_u64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;

    fn header_bytes(magic: u16) -> Vec<u8> {
        let kind = OptionalHeaderKind::from_magic(magic).unwrap_or(OptionalHeaderKind::Pe32);
        let mut data = vec![0u8; kind.base_size()];
        data[0..2].copy_from_slice(&magic.to_le_bytes());
        data[32..36].copy_from_slice(&0x1000u32.to_le_bytes());
        data[36..40].copy_from_slice(&0x200u32.to_le_bytes());
        let (stack_at, count_at) = match kind {
            OptionalHeaderKind::Pe32 => (72, 92),
            OptionalHeaderKind::Pe32Plus => (72, 108),
        };
        data[stack_at] = 0x42;
        data[count_at..count_at + 4].copy_from_slice(&16u32.to_le_bytes());
        data
    }

    #[test]
    fn test_pe32_header() {
        let mut data = header_bytes(PE32_MAGIC);
        data[24..28].copy_from_slice(&0x2000u32.to_le_bytes());
        data[28..32].copy_from_slice(&0x400000u32.to_le_bytes());
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);

        let header = OptionalHeader::read(&mut stream).unwrap();
        assert_eq!(stream.tell(), 96);
        assert!(!header.is_pe32plus());
        assert_eq!(header.base_of_data, Some(0x2000));
        assert_eq!(header.image_base, 0x400000);
        assert_eq!(header.section_alignment, 0x1000);
        assert_eq!(header.file_alignment, 0x200);
        assert_eq!(header.size_of_stack_reserve, 0x42);
        assert_eq!(header.number_of_rva_and_sizes, 16);
    }

    #[test]
    fn test_pe32plus_header() {
        let mut data = header_bytes(PE32PLUS_MAGIC);
        data[24..32].copy_from_slice(&0x1_4000_0000u64.to_le_bytes());
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);

        let header = OptionalHeader::read(&mut stream).unwrap();
        assert_eq!(stream.tell(), 112);
        assert!(header.is_pe32plus());
        assert_eq!(header.base_of_data, None);
        assert_eq!(header.image_base, 0x1_4000_0000);
        assert_eq!(header.size_of_stack_reserve, 0x42);
        assert_eq!(header.number_of_rva_and_sizes, 16);
    }

    #[test]
    fn test_invalid_magic_is_rejected() {
        let data = header_bytes(0x107);
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);

        let result = OptionalHeader::read(&mut stream);
        assert!(matches!(result, Err(Error::InvalidOptionalHeaderMagic(0x107))));
    }

    #[test]
    fn test_truncated_header() {
        let data = header_bytes(PE32PLUS_MAGIC);
        let reader = SliceReader::new(&data[..100]);
        let mut stream = Stream::new(&reader);
        assert!(OptionalHeader::read(&mut stream).unwrap_err().is_truncation());
    }
}
