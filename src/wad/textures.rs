#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::io::Cursor;

use tracing::warn;

use crate::wad::error::{WadError, WadResult};
use crate::wad::format::{Lump, Wad};
use crate::wad::io::{
    read_i16, read_name, read_u16, read_u32, write_i16, write_name, write_u16, write_u32,
};
use crate::wad::omap::OrderedMap;
use crate::wad::report::{DupeKind, DupeLog};

const PNAMES: &str = "PNAMES";
const TEXTURE1: &str = "TEXTURE1";
const TEXTURE2: &str = "TEXTURE2";

/// First TEXTURE1 entry of the stock IWADs. These are dummy definitions the
/// engine never draws, and they must stay first when the table is sorted.
const NULL_TEXTURES: [&str; 4] = ["AASTINKY", "AASHITTY", "BADPATCH", "ABADONE"];

// Wire record sizes. The Strife 1.1 variant drops four bytes from the
// texture header and four from every patch record.
const TEX_HEADER_DOOM: usize = 22;
const TEX_HEADER_STRIFE: usize = 18;
const PATCH_REC_DOOM: usize = 10;
const PATCH_REC_STRIFE: usize = 6;

/// One patch placement inside a texture. `index` is a cache of the patch
/// name's position in the serialized PNAMES list; it is stale from read
/// time until `TextureTable::update_patch_names` rebuilds it.
#[derive(Debug, Clone)]
pub struct PatchDef {
    pub name: String,
    pub x: i16,
    pub y: i16,
    pub index: usize,
}

// Structural equality; the numeric index is a derived cache and never
// participates.
impl PartialEq for PatchDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.x == other.x && self.y == other.y
    }
}

impl Eq for PatchDef {}

#[derive(Debug, Clone)]
pub struct TextureDef {
    pub name: String,
    pub width: i16,
    pub height: i16,
    pub patches: Vec<PatchDef>,
    /// Basename of the archive this definition came from, for reports.
    pub source: String,
}

impl TextureDef {
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.source, self.name)
    }
}

// Structural equality; the source archive is reporting metadata only.
impl PartialEq for TextureDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.width == other.width
            && self.height == other.height
            && self.patches == other.patches
    }
}

impl Eq for TextureDef {}

/// The merged TEXTURE1/TEXTURE2 + PNAMES state.
///
/// While in merge-edit mode every patch is referenced canonically by name;
/// numeric PNAMES indices are rebuilt by `update_patch_names` immediately
/// before serialization.
#[derive(Debug, Default)]
pub struct TextureTable {
    textures: OrderedMap<TextureDef>,
    patch_names: Vec<String>,
    strife_mode: bool,
}

impl TextureTable {
    pub fn new() -> TextureTable {
        TextureTable::default()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TextureDef> {
        self.textures.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureDef> {
        self.textures.iter()
    }

    /// The rebuilt PNAMES list. Meaningful only after `update_patch_names`.
    pub fn patch_names(&self) -> &[String] {
        &self.patch_names
    }

    pub fn strife_mode(&self) -> bool {
        self.strife_mode
    }

    /// Read PNAMES + TEXTURE1 (+ TEXTURE2 when present) out of an archive,
    /// claiming those lumps. Absent PNAMES or TEXTURE1 yields an empty
    /// table and claims nothing.
    pub fn read_from(wad: &mut Wad) -> WadResult<TextureTable> {
        let mut table = TextureTable::new();

        let (pnames_data, source) = match wad.lump(PNAMES) {
            Some(l) if wad.lump(TEXTURE1).is_some() => (
                l.data.clone(),
                l.source
                    .as_ref()
                    .map(|s| s.archive.clone())
                    .unwrap_or_default(),
            ),
            _ => return Ok(table),
        };

        let patch_names = read_pnames(&pnames_data)?;

        let tex1 = wad.lump(TEXTURE1).map(|l| l.data.clone());
        if let Some(data) = tex1 {
            table.read_texture_lump(&data, &patch_names, &source)?;
        }
        let tex2 = wad.lump(TEXTURE2).map(|l| l.data.clone());
        if let Some(data) = tex2 {
            table.read_texture_lump(&data, &patch_names, &source)?;
        }

        for name in [PNAMES, TEXTURE1, TEXTURE2] {
            if let Some(l) = wad.lump_mut(name) {
                l.used = true;
            }
        }

        Ok(table)
    }

    fn read_texture_lump(
        &mut self,
        data: &[u8],
        patch_names: &[String],
        source: &str,
    ) -> WadResult<()> {
        let mut cur = Cursor::new(data);
        let count = read_u32(&mut cur)? as usize;
        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            offsets.push(read_u32(&mut cur)? as u64);
        }

        for offset in offsets {
            cur.set_position(offset);
            let tex = self.read_texture(&mut cur, patch_names, source)?;
            self.textures.add(tex.name.clone(), tex);
        }
        Ok(())
    }

    fn read_texture(
        &mut self,
        cur: &mut Cursor<&[u8]>,
        patch_names: &[String],
        source: &str,
    ) -> WadResult<TextureDef> {
        let name = read_name::<8>(cur)?;
        let _ = read_u32(cur)?;
        let width = read_i16(cur)?;
        let height = read_i16(cur)?;

        // Canonical records have two more unused shorts here before the
        // patch count; Strife 1.1 overloads the first of them as the patch
        // count itself. The first non-zero probe latches Strife mode for
        // the rest of the table's lifetime, serialization included.
        let probe = read_u16(cur)?;
        if probe != 0 {
            self.strife_mode = true;
        }
        let patch_count = if self.strife_mode {
            probe
        } else {
            let _ = read_u16(cur)?;
            read_u16(cur)?
        };

        let mut patches = Vec::with_capacity(patch_count as usize);
        for _ in 0..patch_count {
            let x = read_i16(cur)?;
            let y = read_i16(cur)?;
            let index = read_u16(cur)? as usize;
            if !self.strife_mode {
                let _ = read_u32(cur)?;
            }
            let patch_name = patch_names.get(index).ok_or_else(|| {
                WadError::Integrity(format!(
                    "texture {name}: patch index {index} past PNAMES ({} entries)",
                    patch_names.len()
                ))
            })?;
            patches.push(PatchDef {
                name: patch_name.clone(),
                x,
                y,
                index,
            });
        }

        Ok(TextureDef {
            name,
            width,
            height,
            patches,
            source: source.to_string(),
        })
    }

    /// Fold another table into this one. New names append; identical
    /// definitions are kept silently; differing definitions overwrite and
    /// log a duplicate record.
    pub fn merge_from(&mut self, other: TextureTable, log: &mut DupeLog) {
        if other.strife_mode {
            self.strife_mode = true;
        }
        for (name, tex) in other.textures {
            match self.textures.get(&name) {
                None => self.textures.add(name, tex),
                Some(existing) if *existing == tex => {}
                Some(existing) => {
                    log.add(
                        DupeKind::Overwrite,
                        "texture",
                        existing.full_name(),
                        tex.full_name(),
                    );
                    self.textures.update(name, tex);
                }
            }
        }
    }

    /// Rebuild the patch-name list from the union of names in use, in
    /// first-seen order, and renumber every patch's cached index. Must run
    /// exactly once before `write_to`.
    pub fn update_patch_names(&mut self) {
        self.patch_names.clear();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for tex in self.textures.iter_mut() {
            for patch in &mut tex.patches {
                let index = match positions.get(&patch.name) {
                    Some(&pos) => pos,
                    None => {
                        let pos = self.patch_names.len();
                        self.patch_names.push(patch.name.clone());
                        positions.insert(patch.name.clone(), pos);
                        pos
                    }
                };
                patch.index = index;
            }
        }
    }

    /// Emit TEXTURE1 and PNAMES. Every texture lands in TEXTURE1; TEXTURE2
    /// is never produced even when one was read.
    pub fn write_to(&self, wad: &mut Wad) -> WadResult<()> {
        if self.textures.is_empty() {
            return Ok(());
        }

        let (header_len, patch_len) = if self.strife_mode {
            (TEX_HEADER_STRIFE, PATCH_REC_STRIFE)
        } else {
            (TEX_HEADER_DOOM, PATCH_REC_DOOM)
        };

        let count = self.textures.len();
        let mut buf: Vec<u8> = Vec::new();
        // u32 count + count u32 offsets, then the records.
        let mut offset = 4 + 4 * count;
        write_u32(&mut buf, count as u32)?;
        for tex in self.textures.iter() {
            write_u32(&mut buf, offset as u32)?;
            offset += header_len + tex.patches.len() * patch_len;
        }
        for tex in self.textures.iter() {
            write_name::<8>(&mut buf, &tex.name)?;
            write_u32(&mut buf, 0)?;
            write_i16(&mut buf, tex.width)?;
            write_i16(&mut buf, tex.height)?;
            if !self.strife_mode {
                write_u32(&mut buf, 0)?;
            }
            write_u16(&mut buf, tex.patches.len() as u16)?;
            for patch in &tex.patches {
                write_i16(&mut buf, patch.x)?;
                write_i16(&mut buf, patch.y)?;
                write_u16(&mut buf, patch.index as u16)?;
                if !self.strife_mode {
                    write_u32(&mut buf, 0)?;
                }
            }
        }
        wad.add_lump(Lump::new(TEXTURE1, buf));

        let mut buf: Vec<u8> = Vec::new();
        write_u32(&mut buf, self.patch_names.len() as u32)?;
        for name in &self.patch_names {
            write_name::<8>(&mut buf, name)?;
        }
        wad.add_lump(Lump::new(PNAMES, buf));
        Ok(())
    }

    /// Order ascending by name, keeping the stock null textures pinned to
    /// the top. Two simultaneous null textures usually means mismatched
    /// IWAD bases; report and fall back to their natural order.
    pub fn sort(&mut self) {
        let nulls: Vec<&str> = NULL_TEXTURES
            .iter()
            .copied()
            .filter(|n| self.textures.contains(n))
            .collect();
        if nulls.len() > 1 {
            warn!(
                "multiple null textures present ({}); inputs likely target different IWADs",
                nulls.join(", ")
            );
        }
        self.textures.sort_by(|a, b| {
            let a_null = NULL_TEXTURES.contains(&a);
            let b_null = NULL_TEXTURES.contains(&b);
            b_null.cmp(&a_null).then_with(|| a.cmp(b))
        });
    }
}

fn read_pnames(data: &[u8]) -> WadResult<Vec<String>> {
    let mut cur = Cursor::new(data);
    let count = read_u32(&mut cur)? as usize;
    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        names.push(read_name::<8>(&mut cur)?);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::format::{LumpSource, WadKind};
    use crate::wad::io::pack_name;

    fn pnames_lump(names: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(names.len() as u32).to_le_bytes());
        for n in names {
            buf.extend_from_slice(&pack_name::<8>(n));
        }
        buf
    }

    /// (name, width, height, patches as (x, y, pnames index))
    type TexSpec<'a> = (&'a str, i16, i16, &'a [(i16, i16, u16)]);

    fn texture1_lump(specs: &[TexSpec], strife: bool) -> Vec<u8> {
        let (header_len, patch_len) = if strife { (18, 6) } else { (22, 10) };
        let mut buf = Vec::new();
        buf.extend_from_slice(&(specs.len() as u32).to_le_bytes());
        let mut offset = 4 + 4 * specs.len();
        for (_, _, _, patches) in specs {
            buf.extend_from_slice(&(offset as u32).to_le_bytes());
            offset += header_len + patches.len() * patch_len;
        }
        for (name, w, h, patches) in specs {
            buf.extend_from_slice(&pack_name::<8>(name));
            buf.extend_from_slice(&0u32.to_le_bytes());
            buf.extend_from_slice(&w.to_le_bytes());
            buf.extend_from_slice(&h.to_le_bytes());
            if !strife {
                buf.extend_from_slice(&0u32.to_le_bytes());
            }
            buf.extend_from_slice(&(patches.len() as u16).to_le_bytes());
            for (x, y, idx) in patches.iter() {
                buf.extend_from_slice(&x.to_le_bytes());
                buf.extend_from_slice(&y.to_le_bytes());
                buf.extend_from_slice(&idx.to_le_bytes());
                if !strife {
                    buf.extend_from_slice(&0u32.to_le_bytes());
                }
            }
        }
        buf
    }

    fn wad_with(archive: &str, lumps: &[(&str, Vec<u8>)]) -> Wad {
        let mut wad = Wad::new(WadKind::Pwad);
        for (index, (name, data)) in lumps.iter().enumerate() {
            let mut lump = Lump::new(*name, data.clone());
            lump.source = Some(LumpSource {
                archive: archive.to_string(),
                index,
            });
            wad.add_lump(lump);
        }
        wad
    }

    #[test]
    fn absent_lumps_are_a_no_op() {
        let mut wad = wad_with("a.wad", &[("PNAMES", pnames_lump(&["WALL00_1"]))]);
        let table = TextureTable::read_from(&mut wad).unwrap();
        assert!(table.is_empty());
        assert!(!wad.lump("PNAMES").unwrap().used);
    }

    #[test]
    fn reads_doom_format_and_resolves_patch_names() {
        let mut wad = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1", "WALL00_2"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("AASHITTY", 64, 64, &[(0, 0, 1)])], false),
                ),
            ],
        );
        let table = TextureTable::read_from(&mut wad).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.strife_mode());
        let tex = table.get("AASHITTY").unwrap();
        assert_eq!((tex.width, tex.height), (64, 64));
        assert_eq!(tex.patches[0].name, "WALL00_2");
        assert!(wad.lump("TEXTURE1").unwrap().used);
        assert!(wad.lump("PNAMES").unwrap().used);
    }

    #[test]
    fn equal_textures_merge_silently_new_ones_append() {
        let mut a = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("AASHITTY", 64, 64, &[(0, 0, 0)])], false),
                ),
            ],
        );
        let mut b = wad_with(
            "b.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1"])),
                (
                    "TEXTURE1",
                    texture1_lump(
                        &[
                            ("AASHITTY", 64, 64, &[(0, 0, 0)]),
                            ("DIFF", 128, 128, &[(4, 2, 0)]),
                        ],
                        false,
                    ),
                ),
            ],
        );

        let mut log = DupeLog::new();
        let mut table = TextureTable::read_from(&mut a).unwrap();
        table.merge_from(TextureTable::read_from(&mut b).unwrap(), &mut log);

        assert_eq!(table.len(), 2);
        assert!(log.is_empty());
        assert!(table.get("DIFF").is_some());
        // The silently-kept definition still credits the first archive.
        assert_eq!(table.get("AASHITTY").unwrap().source, "a.wad");
    }

    #[test]
    fn differing_texture_overwrites_and_logs() {
        let mut a = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("STARTAN3", 64, 128, &[(0, 0, 0)])], false),
                ),
            ],
        );
        let mut b = wad_with(
            "b.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("STARTAN3", 128, 128, &[(0, 0, 0)])], false),
                ),
            ],
        );

        let mut log = DupeLog::new();
        let mut table = TextureTable::read_from(&mut a).unwrap();
        table.merge_from(TextureTable::read_from(&mut b).unwrap(), &mut log);

        assert_eq!(table.get("STARTAN3").unwrap().width, 128);
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].old, "a.wad:STARTAN3");
        assert_eq!(log.records()[0].new, "b.wad:STARTAN3");
    }

    #[test]
    fn renumbering_unifies_pnames_across_inputs() {
        // Both inputs reference "B" by index 1 of their own PNAMES.
        let mut a = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["A", "B", "C"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("TEX_A", 64, 64, &[(0, 0, 1)])], false),
                ),
            ],
        );
        let mut b = wad_with(
            "b.wad",
            &[
                ("PNAMES", pnames_lump(&["Z", "B", "Y"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("TEX_B", 64, 64, &[(0, 0, 1)])], false),
                ),
            ],
        );

        let mut log = DupeLog::new();
        let mut table = TextureTable::read_from(&mut a).unwrap();
        table.merge_from(TextureTable::read_from(&mut b).unwrap(), &mut log);
        table.update_patch_names();

        assert_eq!(table.patch_names(), ["B"]);
        for tex in table.iter() {
            for patch in &tex.patches {
                assert_eq!(table.patch_names()[patch.index], patch.name);
            }
        }
    }

    #[test]
    fn strife_variant_detected_and_latched() {
        let mut wad = wad_with(
            "strife.wad",
            &[
                ("PNAMES", pnames_lump(&["STRIFE1"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("SHED", 64, 64, &[(0, 0, 0)])], true),
                ),
            ],
        );
        let table = TextureTable::read_from(&mut wad).unwrap();
        assert!(table.strife_mode());
        assert_eq!(table.get("SHED").unwrap().patches.len(), 1);

        // The latch survives merging into a canonical table.
        let mut log = DupeLog::new();
        let mut master = TextureTable::new();
        master.merge_from(table, &mut log);
        assert!(master.strife_mode());

        // And Strife record sizes are used on write: 18-byte header,
        // 6-byte patch record.
        master.update_patch_names();
        let mut out = Wad::new(WadKind::Pwad);
        master.write_to(&mut out).unwrap();
        let tex1 = out.lump("TEXTURE1").unwrap();
        assert_eq!(tex1.data.len(), 4 + 4 + 18 + 6);
    }

    #[test]
    fn write_read_round_trip_is_structural() {
        let mut wad = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["WALL00_1", "WALL00_2"])),
                (
                    "TEXTURE1",
                    texture1_lump(
                        &[
                            ("AASHITTY", 64, 64, &[(0, 0, 0)]),
                            ("BIGDOOR2", 128, 128, &[(0, 0, 1), (64, 0, 0)]),
                        ],
                        false,
                    ),
                ),
            ],
        );
        let mut table = TextureTable::read_from(&mut wad).unwrap();
        table.update_patch_names();

        let mut out = Wad::new(WadKind::Pwad);
        table.write_to(&mut out).unwrap();
        assert!(out.lump("TEXTURE2").is_none());

        let mut back_wad = Wad::new(WadKind::Pwad);
        back_wad.add_lump(out.lump("PNAMES").unwrap().clone());
        back_wad.add_lump(out.lump("TEXTURE1").unwrap().clone());
        let back = TextureTable::read_from(&mut back_wad).unwrap();

        assert_eq!(back.len(), table.len());
        for tex in table.iter() {
            assert_eq!(back.get(&tex.name).unwrap(), tex);
        }
    }

    #[test]
    fn patch_index_past_pnames_is_fatal() {
        let mut wad = wad_with(
            "a.wad",
            &[
                ("PNAMES", pnames_lump(&["ONLY"])),
                (
                    "TEXTURE1",
                    texture1_lump(&[("BROKEN", 64, 64, &[(0, 0, 9)])], false),
                ),
            ],
        );
        assert!(matches!(
            TextureTable::read_from(&mut wad),
            Err(WadError::Integrity(_))
        ));
    }

    #[test]
    fn sort_pins_null_texture_first() {
        let mut table = TextureTable::new();
        for name in ["ZZWOLF1", "AASHITTY", "BIGDOOR2"] {
            table.textures.add(
                name,
                TextureDef {
                    name: name.into(),
                    width: 64,
                    height: 64,
                    patches: Vec::new(),
                    source: "a.wad".into(),
                },
            );
        }
        table.sort();
        let names: Vec<&str> = table.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["AASHITTY", "BIGDOOR2", "ZZWOLF1"]);
    }
}
