//! DOS header.

use crate::stream::Stream;
use crate::Result;

/// "MZ" read as a little-endian u16.
pub const DOS_SIGNATURE: u16 = 0x5A4D;

/// IMAGE_DOS_HEADER, the first 64 bytes of every image.
///
/// Apart from the magic, the only field that matters here is `e_lfanew`, the
/// file offset of the NT headers. The reserved words are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DosHeader {
    pub e_magic: u16,
    pub e_cblp: u16,
    pub e_cp: u16,
    pub e_crlc: u16,
    pub e_cparhdr: u16,
    pub e_minalloc: u16,
    pub e_maxalloc: u16,
    pub e_ss: u16,
    pub e_sp: u16,
    pub e_csum: u16,
    pub e_ip: u16,
    pub e_cs: u16,
    pub e_lfarlc: u16,
    pub e_ovno: u16,
    pub e_oemid: u16,
    pub e_oeminfo: u16,
    pub e_lfanew: u32,
}

impl DosHeader {
    pub const SIZE: usize = 64;

    /// Decode a DOS header at the stream's current position.
    ///
    /// The magic is decoded but not checked; see [`DosHeader::has_valid_signature`].
    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        let mut header = Self {
            e_magic: stream.read_u16()?,
            e_cblp: stream.read_u16()?,
            e_cp: stream.read_u16()?,
            e_crlc: stream.read_u16()?,
            e_cparhdr: stream.read_u16()?,
            e_minalloc: stream.read_u16()?,
            e_maxalloc: stream.read_u16()?,
            e_ss: stream.read_u16()?,
            e_sp: stream.read_u16()?,
            e_csum: stream.read_u16()?,
            e_ip: stream.read_u16()?,
            e_cs: stream.read_u16()?,
            e_lfarlc: stream.read_u16()?,
            e_ovno: stream.read_u16()?,
            ..Self::default()
        };
        stream.skip(8); // e_res
        header.e_oemid = stream.read_u16()?;
        header.e_oeminfo = stream.read_u16()?;
        stream.skip(20); // e_res2
        header.e_lfanew = stream.read_u32()?;
        Ok(header)
    }

    pub fn has_valid_signature(&self) -> bool {
        self.e_magic == DOS_SIGNATURE
    }
}
