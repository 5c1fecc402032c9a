//! NT headers: signature and COFF file header.

use crate::optional::OptionalHeader;
use crate::stream::Stream;
use crate::Result;

/// "PE\0\0" read as a little-endian u32.
pub const PE_SIGNATURE: u32 = 0x0000_4550;

/// Short name of a COFF machine value, for diagnostics.
pub fn machine_name(machine: u16) -> Option<&'static str> {
    Some(match machine {
        0x014C => "x86",
        0x8664 => "x64",
        0x01C0 | 0x01C4 => "arm",
        0xAA64 => "arm64",
        0x0200 => "ia64",
        _ => return None,
    })
}

/// IMAGE_FILE_HEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoffHeader {
    pub machine: u16,
    pub number_of_sections: u16,
    pub time_date_stamp: u32,
    pub pointer_to_symbol_table: u32,
    pub number_of_symbols: u32,
    /// Declared size of the optional header. Not used to locate the section
    /// table, which is read right after the data directories.
    pub size_of_optional_header: u16,
    pub characteristics: u16,
}

impl CoffHeader {
    pub const SIZE: usize = 20;

    /// Decode a COFF header at the stream's current position.
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        Ok(Self {
            machine: stream.read_u16()?,
            number_of_sections: stream.read_u16()?,
            time_date_stamp: stream.read_u32()?,
            pointer_to_symbol_table: stream.read_u32()?,
            number_of_symbols: stream.read_u32()?,
            size_of_optional_header: stream.read_u16()?,
            characteristics: stream.read_u16()?,
        })
    }

    pub fn machine_name(&self) -> Option<&'static str> {
        machine_name(self.machine)
    }
}

/// NT headers (IMAGE_NT_HEADERS): signature, file header and optional header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtHeaders {
    /// Raw signature word, "PE\0\0" in well-formed images.
    pub signature: u32,
    pub file_header: CoffHeader,
    pub optional_header: OptionalHeader,
}

impl NtHeaders {
    /// Decode the NT headers at the stream's current position.
    ///
    /// The signature is not enforced; the optional header magic is.
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        let signature = stream.read_u32()?;
        let file_header = CoffHeader::read(stream)?;
        let optional_header = OptionalHeader::read(stream)?;
        Ok(Self {
            signature,
            file_header,
            optional_header,
        })
    }

    /// Whether the signature reads "PE\0\0".
    pub fn has_valid_signature(&self) -> bool {
        self.signature == PE_SIGNATURE
    }
}
