#![forbid(unsafe_code)]

use crate::wad::omap::OrderedMap;

/// Header: 4-byte magic, u32 lump count, u32 directory offset.
pub const HEADER_LEN: usize = 12;

/// Directory entry: u32 offset, u32 size, 8-byte NUL-padded name.
pub const DIR_ENTRY_LEN: usize = 16;

/// Lump and patch names are at most this many bytes on the wire.
pub const NAME_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

impl WadKind {
    pub fn magic(self) -> [u8; 4] {
        match self {
            WadKind::Iwad => *b"IWAD",
            WadKind::Pwad => *b"PWAD",
        }
    }

    pub fn from_magic(magic: &[u8; 4]) -> Option<WadKind> {
        match magic {
            b"IWAD" => Some(WadKind::Iwad),
            b"PWAD" => Some(WadKind::Pwad),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WadKind::Iwad => "IWAD",
            WadKind::Pwad => "PWAD",
        }
    }
}

/// Where a lump came from: the owning archive's basename and the lump's
/// original directory index. Observational only — used for conflict
/// reporting, never traversed for mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumpSource {
    pub archive: String,
    pub index: usize,
}

/// A named byte blob. Bytes are never mutated after read; only the `used`
/// claim flag changes once a typed reader has consumed the lump.
#[derive(Debug, Clone)]
pub struct Lump {
    pub name: String,
    pub data: Vec<u8>,
    pub used: bool,
    pub source: Option<LumpSource>,
}

impl Lump {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Lump {
        Lump {
            name: name.into(),
            data,
            used: false,
            source: None,
        }
    }

    /// Zero-length lump, used for map and namespace markers.
    pub fn marker(name: impl Into<String>) -> Lump {
        Lump::new(name, Vec::new())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// `"<archive-basename>:<lump-name>"`, or just the name for lumps that
    /// were synthesized rather than read from a file.
    pub fn full_name(&self) -> String {
        match &self.source {
            Some(src) => format!("{}:{}", src.archive, self.name),
            None => self.name.clone(),
        }
    }
}

/// A typed container of lumps. Constructed either empty with a declared
/// kind or fully materialized from a file (see `read::read_wad`); only
/// `add_lump` mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Wad {
    pub kind: WadKind,
    pub lumps: OrderedMap<Lump>,
}

impl Wad {
    pub fn new(kind: WadKind) -> Wad {
        Wad {
            kind,
            lumps: OrderedMap::new(),
        }
    }

    pub fn add_lump(&mut self, lump: Lump) {
        self.lumps.add(lump.name.clone(), lump);
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    /// Name lookup, resolving to the first insertion under that name.
    /// (The underlying map's own `get` resolves to the latest insertion;
    /// archive lookup deliberately scans in directory order instead.)
    pub fn lump(&self, name: &str) -> Option<&Lump> {
        self.lumps.iter().find(|l| l.name == name)
    }

    pub fn lump_mut(&mut self, name: &str) -> Option<&mut Lump> {
        self.lumps.iter_mut().find(|l| l.name == name)
    }

    pub fn lump_at(&self, pos: usize) -> Option<&Lump> {
        self.lumps.value_at(pos)
    }

    pub fn lump_at_mut(&mut self, pos: usize) -> Option<&mut Lump> {
        self.lumps.value_at_mut(pos)
    }
}
