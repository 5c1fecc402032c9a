//! Synthetic PE images for integration tests.

#![allow(dead_code)]

/// High bit of a directory entry's name word: the name is a string.
pub const NAMED: u32 = 0x8000_0000;
/// High bit of a directory entry's offset word: the target is a directory.
pub const SUBDIR: u32 = 0x8000_0000;

const PE_OFFSET: usize = 0x80;
const TEXT_RVA: u32 = 0x1000;
const TEXT_RAW: u32 = 0x200;

fn put(buf: &mut Vec<u8>, at: usize, bytes: &[u8]) {
    if buf.len() < at + bytes.len() {
        buf.resize(at + bytes.len(), 0);
    }
    buf[at..at + bytes.len()].copy_from_slice(bytes);
}

fn put_u16(buf: &mut Vec<u8>, at: usize, value: u16) {
    put(buf, at, &value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, at: usize, value: u32) {
    put(buf, at, &value.to_le_bytes());
}

/// Raw bytes of a resource section, laid out by hand.
///
/// Offsets are relative to the start of the section.
#[derive(Debug, Clone, Default)]
pub struct ResourceSection {
    data: Vec<u8>,
}

impl ResourceSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory header followed by `entries` as `(name word, offset word)`.
    /// The first `named` entries are counted as named.
    pub fn dir(mut self, at: usize, named: u16, entries: &[(u32, u32)]) -> Self {
        put_u16(&mut self.data, at + 12, named);
        put_u16(&mut self.data, at + 14, entries.len() as u16 - named);
        for (i, (name, target)) in entries.iter().enumerate() {
            put_u32(&mut self.data, at + 16 + i * 8, *name);
            put_u32(&mut self.data, at + 20 + i * 8, *target);
        }
        self
    }

    pub fn data_entry(mut self, at: usize, rva: u32, size: u32) -> Self {
        put_u32(&mut self.data, at, rva);
        put_u32(&mut self.data, at + 4, size);
        put_u32(&mut self.data, at + 8, 0);
        put_u32(&mut self.data, at + 12, 0);
        self
    }

    /// Length-prefixed UTF-16LE string.
    pub fn name(mut self, at: usize, name: &str) -> Self {
        let units: Vec<u16> = name.encode_utf16().collect();
        put_u16(&mut self.data, at, units.len() as u16);
        for (i, unit) in units.iter().enumerate() {
            put_u16(&mut self.data, at + 2 + i * 2, *unit);
        }
        self
    }

    pub fn bytes(mut self, at: usize, bytes: &[u8]) -> Self {
        put(&mut self.data, at, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Builds a minimal image with a `.text` section and a `.rsrc` section.
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    pe32plus: bool,
    optional_magic: Option<u16>,
    file_alignment: u32,
    section_alignment: u32,
    number_of_rva_and_sizes: u32,
    resource_directory: Option<(u32, u32)>,
    rsrc_rva: u32,
    rsrc_pointer: u32,
    rsrc_placement: Option<u32>,
    rsrc: Vec<u8>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            pe32plus: false,
            optional_magic: None,
            file_alignment: 0x200,
            section_alignment: 0x1000,
            number_of_rva_and_sizes: 16,
            resource_directory: None,
            rsrc_rva: 0x2000,
            rsrc_pointer: 0x400,
            rsrc_placement: None,
            rsrc: Vec::new(),
        }
    }

    pub fn pe32plus(mut self, pe32plus: bool) -> Self {
        self.pe32plus = pe32plus;
        self
    }

    /// Write this magic instead of the one matching the header layout.
    pub fn optional_magic(mut self, magic: u16) -> Self {
        self.optional_magic = Some(magic);
        self
    }

    pub fn file_alignment(mut self, alignment: u32) -> Self {
        self.file_alignment = alignment;
        self
    }

    pub fn section_alignment(mut self, alignment: u32) -> Self {
        self.section_alignment = alignment;
        self
    }

    pub fn number_of_rva_and_sizes(mut self, count: u32) -> Self {
        self.number_of_rva_and_sizes = count;
        self
    }

    /// Override data directory 2 (defaults to the `.rsrc` section).
    pub fn resource_directory(mut self, rva: u32, size: u32) -> Self {
        self.resource_directory = Some((rva, size));
        self
    }

    pub fn rsrc_rva(mut self, rva: u32) -> Self {
        self.rsrc_rva = rva;
        self
    }

    /// Declared `pointer_to_raw_data` of `.rsrc`.
    pub fn rsrc_pointer(mut self, pointer: u32) -> Self {
        self.rsrc_pointer = pointer;
        self
    }

    /// File offset the section bytes are actually written at (defaults to
    /// the declared pointer).
    pub fn rsrc_placement(mut self, offset: u32) -> Self {
        self.rsrc_placement = Some(offset);
        self
    }

    pub fn rsrc(mut self, section: ResourceSection) -> Self {
        self.rsrc = section.into_bytes();
        self
    }

    /// File offset where the `.rsrc` bytes land.
    pub fn rsrc_offset(&self) -> u64 {
        u64::from(self.rsrc_placement.unwrap_or(self.rsrc_pointer))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut image = vec![0u8; TEXT_RAW as usize];

        // DOS header
        put(&mut image, 0, b"MZ");
        put_u32(&mut image, 0x3C, PE_OFFSET as u32);

        // NT headers
        let dirs = self.number_of_rva_and_sizes as usize;
        let base_size = if self.pe32plus { 112 } else { 96 };
        put(&mut image, PE_OFFSET, b"PE\0\0");
        let coff = PE_OFFSET + 4;
        put_u16(&mut image, coff, if self.pe32plus { 0x8664 } else { 0x14C });
        put_u16(&mut image, coff + 2, 2);
        put_u16(&mut image, coff + 16, (base_size + dirs * 8) as u16);
        put_u16(&mut image, coff + 18, 0x0102);

        let opt = coff + 20;
        let magic = self
            .optional_magic
            .unwrap_or(if self.pe32plus { 0x20B } else { 0x10B });
        put_u16(&mut image, opt, magic);
        put_u32(&mut image, opt + 16, TEXT_RVA);
        put_u32(&mut image, opt + 32, self.section_alignment);
        put_u32(&mut image, opt + 36, self.file_alignment);
        put_u32(&mut image, opt + 56, self.rsrc_rva + 0x1000);
        put_u32(&mut image, opt + 60, TEXT_RAW);
        put_u32(&mut image, opt + base_size - 4, self.number_of_rva_and_sizes);

        let dd = opt + base_size;
        if dirs > 2 {
            let (rva, size) = self
                .resource_directory
                .unwrap_or((self.rsrc_rva, self.rsrc.len() as u32));
            put_u32(&mut image, dd + 16, rva);
            put_u32(&mut image, dd + 20, size);
        }

        let sh = dd + dirs * 8;
        put(&mut image, sh, b".text\0\0\0");
        put_u32(&mut image, sh + 8, 0x100);
        put_u32(&mut image, sh + 12, TEXT_RVA);
        put_u32(&mut image, sh + 16, 0x200);
        put_u32(&mut image, sh + 20, TEXT_RAW);
        put_u32(&mut image, sh + 36, 0x6000_0020);

        let sh = sh + 40;
        put(&mut image, sh, b".rsrc\0\0\0");
        put_u32(&mut image, sh + 8, 0x1000);
        put_u32(&mut image, sh + 12, self.rsrc_rva);
        put_u32(&mut image, sh + 16, self.rsrc.len() as u32);
        put_u32(&mut image, sh + 20, self.rsrc_pointer);
        put_u32(&mut image, sh + 36, 0x4000_0040);

        put(&mut image, TEXT_RAW as usize, &[0xCC; 0x200]);
        put(&mut image, self.rsrc_offset() as usize, &self.rsrc);
        image
    }
}

/// Resource section used by most tests, with data RVAs based at `rva`.
///
/// ```text
/// A/ICON/logo        "LOGO-PNG"
/// ICON/1/1033        16 x 0x01
/// ICON/2/1033        "icon two"
/// VERSION/1/1033     "VS_VERSION"
/// ```
pub fn sample_resources(rva: u32) -> ResourceSection {
    ResourceSection::new()
        .dir(
            0x000,
            1,
            &[
                (NAMED | 0x300, SUBDIR | 0x040),
                (3, SUBDIR | 0x080),
                (16, SUBDIR | 0x0E0),
            ],
        )
        .dir(0x040, 0, &[(3, SUBDIR | 0x060)])
        .dir(0x060, 1, &[(NAMED | 0x310, 0x180)])
        .dir(0x080, 0, &[(1, SUBDIR | 0x0A0), (2, SUBDIR | 0x0C0)])
        .dir(0x0A0, 0, &[(1033, 0x190)])
        .dir(0x0C0, 0, &[(1033, 0x1A0)])
        .dir(0x0E0, 0, &[(1, SUBDIR | 0x100)])
        .dir(0x100, 0, &[(1033, 0x1B0)])
        .data_entry(0x180, rva + 0x400, 8)
        .data_entry(0x190, rva + 0x410, 16)
        .data_entry(0x1A0, rva + 0x420, 8)
        .data_entry(0x1B0, rva + 0x440, 10)
        .name(0x300, "A")
        .name(0x310, "logo")
        .bytes(0x400, b"LOGO-PNG")
        .bytes(0x410, &[0x01; 16])
        .bytes(0x420, b"icon two")
        .bytes(0x440, b"VS_VERSION")
}

/// `(path, offset relative to .rsrc, size)` of [`sample_resources`] entries.
pub const SAMPLE_ENTRIES: [(&str, u64, u64); 4] = [
    ("A\u{FF0F}ICON\u{FF0F}logo", 0x400, 8),
    ("ICON\u{FF0F}1\u{FF0F}1033", 0x410, 16),
    ("ICON\u{FF0F}2\u{FF0F}1033", 0x420, 8),
    ("VERSION\u{FF0F}1\u{FF0F}1033", 0x440, 10),
];
