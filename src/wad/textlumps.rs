#![forbid(unsafe_code)]

use crate::wad::format::{Lump, Wad};
use crate::wad::omap::OrderedMap;
use crate::wad::report::{DupeKind, DupeLog};

/// Text-format configuration lumps that merge by concatenation: the Doom,
/// Hexen, ZDoom, Skulltag and Doomsday families.
const TEXT_LUMPS: [&str; 47] = [
    "ALTHUDCF", "ANIMDEFS", "BOTINFO", "CMPGNINF", "CVARINFO", "DD_DEFNS", "DD_DIREC",
    "DECALDEF", "DECORATE", "DEFBINDS", "DEFCVARS", "DEHACKED", "DEHSUPP", "DMXGUS",
    "DMXGUSC", "EMAPINFO", "FONTDEFS", "FSGLOBAL", "GAMEINFO", "GLDEFS", "IWADINFO",
    "KEYCONF", "LANGUAGE", "LOADACS", "LOCKDEFS", "MAPINFO", "MENUDEF", "MODELDEF",
    "MUSINFO", "PALVERS", "REVERBS", "SBARINFO", "SECRETS", "SECTINFO", "SKININFO",
    "SNDINFO", "SNDSEQ", "TEAMINFO", "TERRAIN", "TEXTCOLO", "TEXTURES", "TRNSLATE",
    "VOXELDEF", "WADINFO", "X11R6RGB", "XHAIRS", "ZMAPINFO",
];

pub fn is_text_lump(name: &str) -> bool {
    TEXT_LUMPS.contains(&name)
}

/// Name-gated concatenation of known text lumps. Bytes are opaque; a
/// second definition appends after a single newline separator.
#[derive(Debug, Default)]
pub struct TextTable {
    lumps: OrderedMap<Lump>,
}

impl TextTable {
    pub fn new() -> TextTable {
        TextTable::default()
    }

    pub fn get(&self, name: &str) -> Option<&Lump> {
        self.lumps.get(name)
    }

    pub fn read_from(&mut self, wad: &mut Wad, log: &mut DupeLog) {
        for i in 0..wad.len() {
            let lump = match wad.lump_at(i) {
                Some(l) if !l.used && is_text_lump(&l.name) => l.clone(),
                _ => continue,
            };
            if let Some(l) = wad.lump_at_mut(i) {
                l.used = true;
            }

            match self.lumps.get_mut(&lump.name) {
                None => self.lumps.add(lump.name.clone(), lump),
                Some(existing) => {
                    log.add(
                        DupeKind::Merge,
                        "text lump",
                        existing.full_name(),
                        lump.full_name(),
                    );
                    existing.data.push(b'\n');
                    existing.data.extend_from_slice(&lump.data);
                }
            }
        }
    }

    pub fn write_to(&self, out: &mut Wad) {
        for lump in self.lumps.iter() {
            out.add_lump(lump.clone());
        }
    }

    pub fn sort(&mut self) {
        self.lumps.sort();
    }
}
