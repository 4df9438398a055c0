#![forbid(unsafe_code)]

use std::io::Cursor;

use crate::wad::error::{WadError, WadResult};
use crate::wad::format::{Lump, Wad};
use crate::wad::io::{read_name, read_u16, read_u32, read_u8, write_name, write_u16, write_u32};
use crate::wad::omap::OrderedMap;
use crate::wad::report::{DupeKind, DupeLog};

const ANIMATED: &str = "ANIMATED";
const SWITCHES: &str = "SWITCHES";

// Neither lump is length-prefixed; a sentinel record ends the stream.
const ANIMATED_RECORD: usize = 23;
const SWITCHES_RECORD: usize = 20;

/// One Boom animation cycle: 0 = wall texture, 1 = flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimateDef {
    pub kind: u8,
    pub last: String,
    pub first: String,
    /// Cycle speed in game tics.
    pub speed: u32,
    pub source: String,
}

impl AnimateDef {
    fn full_name(&self) -> String {
        format!("{}:{}", self.source, self.first)
    }
}

/// One Boom switch pair with its IWAD selector (1, 2 or 3 on the wire;
/// 0 is the stream terminator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchDef {
    pub off: String,
    pub on: String,
    pub iwad: u16,
    pub source: String,
}

impl SwitchDef {
    fn full_name(&self) -> String {
        format!("{}:{}", self.source, self.off)
    }
}

#[derive(Debug, Default)]
pub struct AnimatedTable {
    defs: OrderedMap<AnimateDef>,
}

impl AnimatedTable {
    pub fn new() -> AnimatedTable {
        AnimatedTable::default()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimateDef> {
        self.defs.iter()
    }

    /// Decode an archive's ANIMATED lump, claiming it. Two definitions are
    /// the same animation when their (first, last) pair matches; the later
    /// one wins and the collision is logged.
    pub fn read_from(&mut self, wad: &mut Wad, log: &mut DupeLog) -> WadResult<()> {
        let lump = match wad.lump(ANIMATED) {
            Some(l) => l.clone(),
            None => return Ok(()),
        };
        if let Some(l) = wad.lump_mut(ANIMATED) {
            l.used = true;
        }
        let source = lump
            .source
            .as_ref()
            .map(|s| s.archive.clone())
            .unwrap_or_default();

        let data = &lump.data;
        let mut pos = 0;
        loop {
            if pos >= data.len() {
                return Err(WadError::Integrity(format!(
                    "{source}: ANIMATED stream is not sentinel-terminated"
                )));
            }
            if data[pos] == 0xFF {
                break;
            }
            if pos + ANIMATED_RECORD > data.len() {
                return Err(WadError::Integrity(format!(
                    "{source}: truncated ANIMATED record at byte {pos}"
                )));
            }
            let mut cur = Cursor::new(&data[pos..pos + ANIMATED_RECORD]);
            let def = AnimateDef {
                kind: read_u8(&mut cur)?,
                last: read_name::<9>(&mut cur)?,
                first: read_name::<9>(&mut cur)?,
                speed: read_u32(&mut cur)?,
                source: source.clone(),
            };
            pos += ANIMATED_RECORD;

            let key = format!("{}/{}", def.first, def.last);
            match self.defs.get(&key) {
                Some(existing) => {
                    log.add(
                        DupeKind::Overwrite,
                        "animation",
                        existing.full_name(),
                        def.full_name(),
                    );
                    self.defs.update(key, def);
                }
                None => self.defs.add(key, def),
            }
        }
        Ok(())
    }

    pub fn write_to(&self, out: &mut Wad) -> WadResult<()> {
        if self.defs.is_empty() {
            return Ok(());
        }
        let mut buf: Vec<u8> = Vec::new();
        for def in self.defs.iter() {
            buf.push(def.kind);
            write_name::<9>(&mut buf, &def.last)?;
            write_name::<9>(&mut buf, &def.first)?;
            write_u32(&mut buf, def.speed)?;
        }
        // Terminator record: 0xFF type, remaining fields zero-filled.
        buf.push(0xFF);
        buf.extend_from_slice(&[0u8; ANIMATED_RECORD - 1]);
        out.add_lump(Lump::new(ANIMATED, buf));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SwitchesTable {
    defs: OrderedMap<SwitchDef>,
}

impl SwitchesTable {
    pub fn new() -> SwitchesTable {
        SwitchesTable::default()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchDef> {
        self.defs.iter()
    }

    /// Decode an archive's SWITCHES lump, claiming it. Identity is the
    /// (off, on) pair; the later definition wins and the collision is
    /// logged.
    pub fn read_from(&mut self, wad: &mut Wad, log: &mut DupeLog) -> WadResult<()> {
        let lump = match wad.lump(SWITCHES) {
            Some(l) => l.clone(),
            None => return Ok(()),
        };
        if let Some(l) = wad.lump_mut(SWITCHES) {
            l.used = true;
        }
        let source = lump
            .source
            .as_ref()
            .map(|s| s.archive.clone())
            .unwrap_or_default();

        let data = &lump.data;
        let mut pos = 0;
        loop {
            if pos + SWITCHES_RECORD > data.len() {
                return Err(WadError::Integrity(format!(
                    "{source}: SWITCHES stream is not sentinel-terminated"
                )));
            }
            let mut cur = Cursor::new(&data[pos..pos + SWITCHES_RECORD]);
            let off = read_name::<9>(&mut cur)?;
            let on = read_name::<9>(&mut cur)?;
            let iwad = read_u16(&mut cur)?;
            pos += SWITCHES_RECORD;
            if iwad == 0 {
                break;
            }
            let def = SwitchDef {
                off,
                on,
                iwad,
                source: source.clone(),
            };

            let key = format!("{}/{}", def.off, def.on);
            match self.defs.get(&key) {
                Some(existing) => {
                    log.add(
                        DupeKind::Overwrite,
                        "switch",
                        existing.full_name(),
                        def.full_name(),
                    );
                    self.defs.update(key, def);
                }
                None => self.defs.add(key, def),
            }
        }
        Ok(())
    }

    pub fn write_to(&self, out: &mut Wad) -> WadResult<()> {
        if self.defs.is_empty() {
            return Ok(());
        }
        let mut buf: Vec<u8> = Vec::new();
        for def in self.defs.iter() {
            write_name::<9>(&mut buf, &def.off)?;
            write_name::<9>(&mut buf, &def.on)?;
            write_u16(&mut buf, def.iwad)?;
        }
        // Terminator record: zero IWAD selector, names zero-filled.
        buf.extend_from_slice(&[0u8; SWITCHES_RECORD]);
        out.add_lump(Lump::new(SWITCHES, buf));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::format::{LumpSource, WadKind};
    use crate::wad::io::pack_name;

    fn animated_lump(records: &[(u8, &str, &str, u32)], terminated: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        for (kind, last, first, speed) in records {
            buf.push(*kind);
            buf.extend_from_slice(&pack_name::<9>(last));
            buf.extend_from_slice(&pack_name::<9>(first));
            buf.extend_from_slice(&speed.to_le_bytes());
        }
        if terminated {
            buf.push(0xFF);
            buf.extend_from_slice(&[0u8; 22]);
        }
        buf
    }

    fn switches_lump(records: &[(&str, &str, u16)], terminated: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        for (off, on, iwad) in records {
            buf.extend_from_slice(&pack_name::<9>(off));
            buf.extend_from_slice(&pack_name::<9>(on));
            buf.extend_from_slice(&iwad.to_le_bytes());
        }
        if terminated {
            buf.extend_from_slice(&[0u8; 20]);
        }
        buf
    }

    fn wad_with(archive: &str, name: &str, data: Vec<u8>) -> Wad {
        let mut wad = Wad::new(WadKind::Pwad);
        let mut lump = Lump::new(name, data);
        lump.source = Some(LumpSource {
            archive: archive.to_string(),
            index: 0,
        });
        wad.add_lump(lump);
        wad
    }

    #[test]
    fn later_animation_replaces_earlier_and_logs() {
        let mut a = wad_with(
            "a.wad",
            "ANIMATED",
            animated_lump(&[(0, "SLADRIP3", "SLADRIP1", 8)], true),
        );
        let mut b = wad_with(
            "b.wad",
            "ANIMATED",
            animated_lump(&[(0, "SLADRIP3", "SLADRIP1", 16)], true),
        );

        let mut table = AnimatedTable::new();
        let mut log = DupeLog::new();
        table.read_from(&mut a, &mut log).unwrap();
        table.read_from(&mut b, &mut log).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().speed, 16);
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].old, "a.wad:SLADRIP1");
        assert_eq!(log.records()[0].new, "b.wad:SLADRIP1");
        assert!(a.lump("ANIMATED").unwrap().used);
    }

    #[test]
    fn unterminated_animated_is_fatal() {
        let mut wad = wad_with(
            "a.wad",
            "ANIMATED",
            animated_lump(&[(1, "NUKAGE3", "NUKAGE1", 8)], false),
        );
        let mut table = AnimatedTable::new();
        let mut log = DupeLog::new();
        assert!(matches!(
            table.read_from(&mut wad, &mut log),
            Err(WadError::Integrity(_))
        ));
    }

    #[test]
    fn animated_write_appends_zero_filled_sentinel() {
        let mut wad = wad_with(
            "a.wad",
            "ANIMATED",
            animated_lump(&[(1, "NUKAGE3", "NUKAGE1", 8)], true),
        );
        let mut table = AnimatedTable::new();
        let mut log = DupeLog::new();
        table.read_from(&mut wad, &mut log).unwrap();

        let mut out = Wad::new(WadKind::Pwad);
        table.write_to(&mut out).unwrap();
        let data = &out.lump("ANIMATED").unwrap().data;
        assert_eq!(data.len(), 23 * 2);
        assert_eq!(data[23], 0xFF);
        assert!(data[24..].iter().all(|&b| b == 0));
    }

    #[test]
    fn switch_dedup_is_by_off_on_pair() {
        let mut a = wad_with(
            "a.wad",
            "SWITCHES",
            switches_lump(&[("SW1BRCOM", "SW2BRCOM", 1), ("SW1STON1", "SW2STON1", 2)], true),
        );
        let mut b = wad_with(
            "b.wad",
            "SWITCHES",
            switches_lump(&[("SW1BRCOM", "SW2BRCOM", 3)], true),
        );

        let mut table = SwitchesTable::new();
        let mut log = DupeLog::new();
        table.read_from(&mut a, &mut log).unwrap();
        table.read_from(&mut b, &mut log).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next().unwrap().iwad, 3);
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].label, "switch");
    }

    #[test]
    fn unterminated_switches_is_fatal() {
        let mut wad = wad_with(
            "a.wad",
            "SWITCHES",
            switches_lump(&[("SW1BRCOM", "SW2BRCOM", 1)], false),
        );
        let mut table = SwitchesTable::new();
        let mut log = DupeLog::new();
        assert!(matches!(
            table.read_from(&mut wad, &mut log),
            Err(WadError::Integrity(_))
        ));
    }

    #[test]
    fn switches_round_trip() {
        let mut wad = wad_with(
            "a.wad",
            "SWITCHES",
            switches_lump(&[("SW1BRCOM", "SW2BRCOM", 1)], true),
        );
        let mut table = SwitchesTable::new();
        let mut log = DupeLog::new();
        table.read_from(&mut wad, &mut log).unwrap();

        let mut out = Wad::new(WadKind::Pwad);
        table.write_to(&mut out).unwrap();
        let data = out.lump("SWITCHES").unwrap().data.clone();
        assert_eq!(data.len(), 40);

        let mut back = wad_with("b.wad", "SWITCHES", data);
        let mut table2 = SwitchesTable::new();
        table2.read_from(&mut back, &mut log).unwrap();
        assert_eq!(table2.len(), 1);
        let def = table2.iter().next().unwrap();
        assert_eq!(def.off, "SW1BRCOM");
        assert_eq!(def.on, "SW2BRCOM");
        assert_eq!(def.iwad, 1);
    }
}
