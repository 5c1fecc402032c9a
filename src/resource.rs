//! Resource directory structures.
//!
//! The resource section holds a tree of directories. Each directory header is
//! followed by its entries, named entries first, then numeric ones. An entry
//! either points at a subdirectory or at a data entry describing one blob.
//! Every offset stored in the tree is relative to the start of the resource
//! section, except the data entry's `offset_to_data`, which is an RVA.

use crate::stream::Stream;
use crate::Result;

/// High bit shared by the name and offset words of a directory entry.
const HIGH_BIT: u32 = 0x8000_0000;

/// Standard resource types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ResourceType {
    Cursor = 1,
    Bitmap = 2,
    Icon = 3,
    Menu = 4,
    Dialog = 5,
    String = 6,
    FontDirectory = 7,
    Font = 8,
    Accelerator = 9,
    RcData = 10,
    MessageTable = 11,
    Version = 16,
    DlgInclude = 17,
    PlugAndPlay = 19,
    Vxd = 20,
    AnimatedCursor = 21,
    AnimatedIcon = 22,
    Html = 23,
    Manifest = 24,
}

impl ResourceType {
    pub fn from_id(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Cursor),
            2 => Some(Self::Bitmap),
            3 => Some(Self::Icon),
            4 => Some(Self::Menu),
            5 => Some(Self::Dialog),
            6 => Some(Self::String),
            7 => Some(Self::FontDirectory),
            8 => Some(Self::Font),
            9 => Some(Self::Accelerator),
            10 => Some(Self::RcData),
            11 => Some(Self::MessageTable),
            16 => Some(Self::Version),
            17 => Some(Self::DlgInclude),
            19 => Some(Self::PlugAndPlay),
            20 => Some(Self::Vxd),
            21 => Some(Self::AnimatedCursor),
            22 => Some(Self::AnimatedIcon),
            23 => Some(Self::Html),
            24 => Some(Self::Manifest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cursor => "CURSOR",
            Self::Bitmap => "BITMAP",
            Self::Icon => "ICON",
            Self::Menu => "MENU",
            Self::Dialog => "DIALOG",
            Self::String => "STRING",
            Self::FontDirectory => "FONT_DIRECTORY",
            Self::Font => "FONT",
            Self::Accelerator => "ACCELERATOR",
            Self::RcData => "RC_DATA",
            Self::MessageTable => "MESSAGE_TABLE",
            Self::Version => "VERSION",
            Self::DlgInclude => "DLG_INCLUDE",
            Self::PlugAndPlay => "PLUG_AND_PLAY",
            Self::Vxd => "VXD",
            Self::AnimatedCursor => "ANIMATED_CURSOR",
            Self::AnimatedIcon => "ANIMATED_ICON",
            Self::Html => "HTML",
            Self::Manifest => "MANIFEST",
        }
    }
}

/// Display name for a numeric entry id: the type constant name when known,
/// the decimal id otherwise.
pub fn id_display_name(id: u32) -> String {
    match ResourceType::from_id(id) {
        Some(rt) => rt.name().to_string(),
        None => id.to_string(),
    }
}

/// IMAGE_RESOURCE_DIRECTORY - 16 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceDirectoryHeader {
    /// Resource flags (reserved, usually 0).
    pub characteristics: u32,
    pub time_date_stamp: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub number_of_named_entries: u16,
    pub number_of_id_entries: u16,
}

impl ResourceDirectoryHeader {
    pub const SIZE: usize = 16;

    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        Ok(Self {
            characteristics: stream.read_u32()?,
            time_date_stamp: stream.read_u32()?,
            major_version: stream.read_u16()?,
            minor_version: stream.read_u16()?,
            number_of_named_entries: stream.read_u16()?,
            number_of_id_entries: stream.read_u16()?,
        })
    }

    pub fn total_entries(&self) -> usize {
        self.number_of_named_entries as usize + self.number_of_id_entries as usize
    }
}

/// How a directory entry is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceName {
    /// Length-prefixed UTF-16 string at this offset from the section base.
    Named { offset: u32 },
    /// Numeric id; at the top level this is a [`ResourceType`] value.
    Id(u32),
}

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTarget {
    /// Another [`ResourceDirectoryHeader`], offset from the section base.
    Subdirectory { offset: u32 },
    /// A [`ResourceDataEntry`], offset from the section base.
    DataEntry { offset: u32 },
}

impl ResourceTarget {
    pub fn offset(&self) -> u32 {
        match *self {
            Self::Subdirectory { offset } | Self::DataEntry { offset } => offset,
        }
    }
}

/// IMAGE_RESOURCE_DIRECTORY_ENTRY - 8 bytes, with both packed words decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDirectoryEntry {
    pub name: ResourceName,
    pub target: ResourceTarget,
}

impl ResourceDirectoryEntry {
    pub const SIZE: usize = 8;

    /// Decode the raw name and offset words.
    pub fn from_raw(name_word: u32, offset_word: u32) -> Self {
        let name = if name_word & HIGH_BIT != 0 {
            ResourceName::Named {
                offset: name_word & !HIGH_BIT,
            }
        } else {
            ResourceName::Id(name_word)
        };
        let target = if offset_word & HIGH_BIT != 0 {
            ResourceTarget::Subdirectory {
                offset: offset_word & !HIGH_BIT,
            }
        } else {
            ResourceTarget::DataEntry {
                offset: offset_word,
            }
        };
        Self { name, target }
    }

    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        let name_word = stream.read_u32()?;
        let offset_word = stream.read_u32()?;
        Ok(Self::from_raw(name_word, offset_word))
    }
}

/// IMAGE_RESOURCE_DATA_ENTRY - 16 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceDataEntry {
    /// RVA of the resource data.
    pub offset_to_data: u32,
    pub size: u32,
    pub code_page: u32,
    pub reserved: u32,
}

impl ResourceDataEntry {
    pub const SIZE: usize = 16;

    pub fn read(stream: &mut Stream<'_>) -> Result<Self> {
        Ok(Self {
            offset_to_data: stream.read_u32()?,
            size: stream.read_u32()?,
            code_page: stream.read_u32()?,
            reserved: stream.read_u32()?,
        })
    }
}

/// Read a resource name string at the stream's current position: a u16
/// character count followed by that many UTF-16LE code units.
///
/// Unpaired surrogates are replaced rather than rejected.
pub fn read_resource_string(stream: &mut Stream<'_>) -> Result<String> {
    let len = stream.read_u16()? as usize;
    let bytes = stream.read_bytes(len * 2)?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;

    #[test]
    fn test_resource_directory_header_read() {
        let mut data = vec![0u8; 16];
        data[4..8].copy_from_slice(&0x12345678u32.to_le_bytes());
        data[8..10].copy_from_slice(&4u16.to_le_bytes());
        data[12..14].copy_from_slice(&2u16.to_le_bytes());
        data[14..16].copy_from_slice(&5u16.to_le_bytes());
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);

        let header = ResourceDirectoryHeader::read(&mut stream).unwrap();
        assert_eq!(stream.tell(), ResourceDirectoryHeader::SIZE as u64);
        assert_eq!(header.time_date_stamp, 0x12345678);
        assert_eq!(header.major_version, 4);
        assert_eq!(header.total_entries(), 7);
    }

    #[test]
    fn test_resource_entry_flags() {
        let entry = ResourceDirectoryEntry::from_raw(0x8000_1000, 0x8000_2000);
        assert_eq!(entry.name, ResourceName::Named { offset: 0x1000 });
        assert_eq!(entry.target, ResourceTarget::Subdirectory { offset: 0x2000 });

        let entry = ResourceDirectoryEntry::from_raw(16, 0x3000);
        assert_eq!(entry.name, ResourceName::Id(16));
        assert_eq!(entry.target, ResourceTarget::DataEntry { offset: 0x3000 });
        assert_eq!(entry.target.offset(), 0x3000);
    }

    #[test]
    fn test_large_ids_keep_all_31_bits() {
        let entry = ResourceDirectoryEntry::from_raw(0x0001_0001, 0);
        assert_eq!(entry.name, ResourceName::Id(0x0001_0001));
        assert_eq!(id_display_name(0x0001_0001), "65537");
    }

    #[test]
    fn test_resource_type_names() {
        assert_eq!(id_display_name(1), "CURSOR");
        assert_eq!(id_display_name(3), "ICON");
        assert_eq!(id_display_name(7), "FONT_DIRECTORY");
        assert_eq!(id_display_name(10), "RC_DATA");
        assert_eq!(id_display_name(11), "MESSAGE_TABLE");
        assert_eq!(id_display_name(19), "PLUG_AND_PLAY");
        assert_eq!(id_display_name(21), "ANIMATED_CURSOR");
        assert_eq!(id_display_name(24), "MANIFEST");
    }

    #[test]
    fn test_unknown_ids_render_as_decimal() {
        assert_eq!(id_display_name(0), "0");
        assert_eq!(id_display_name(12), "12");
        assert_eq!(id_display_name(14), "14");
        assert_eq!(id_display_name(18), "18");
        assert_eq!(id_display_name(1033), "1033");
    }

    #[test]
    fn test_read_resource_string() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u16.to_le_bytes());
        for unit in "PNG".encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);
        assert_eq!(read_resource_string(&mut stream).unwrap(), "PNG");
    }

    #[test]
    fn test_read_resource_string_lossy() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.extend_from_slice(&0xD800u16.to_le_bytes());
        data.extend_from_slice(&(b'A' as u16).to_le_bytes());
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);
        assert_eq!(read_resource_string(&mut stream).unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn test_read_resource_string_truncated() {
        let data = [5u8, 0, b'A', 0];
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);
        assert!(read_resource_string(&mut stream).unwrap_err().is_truncation());
    }

    #[test]
    fn test_data_entry_read() {
        let mut data = Vec::new();
        for word in [0x2010u32, 0x20, 1252, 0] {
            data.extend_from_slice(&word.to_le_bytes());
        }
        let reader = SliceReader::new(&data);
        let mut stream = Stream::new(&reader);

        let entry = ResourceDataEntry::read(&mut stream).unwrap();
        assert_eq!(entry.offset_to_data, 0x2010);
        assert_eq!(entry.size, 0x20);
        assert_eq!(entry.code_page, 1252);
        assert_eq!(stream.tell(), ResourceDataEntry::SIZE as u64);
    }
}
