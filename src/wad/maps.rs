#![forbid(unsafe_code)]

use std::ops::Range;

use tracing::warn;

use crate::wad::format::{Lump, Wad};
use crate::wad::omap::OrderedMap;
use crate::wad::report::{DupeKind, DupeLog};

/// Lump names that may appear inside a Doom/Hexen map run.
const MAP_LUMPS: [&str; 12] = [
    "THINGS", "VERTEXES", "SIDEDEFS", "SECTORS", "SEGS", "SSECTORS", "NODES", "LINEDEFS",
    "REJECT", "BLOCKMAP", "BEHAVIOR", "SCRIPTS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Doom,
    Hexen,
    Udmf,
}

/// A map anchored to its marker lump: the half-open lump-index range
/// `[start, end)` inside the source archive, excluding the marker itself.
#[derive(Debug, Clone)]
pub struct MapMarker {
    pub name: String,
    pub format: MapFormat,
    /// Input slot of the archive owning the run; resolved against the
    /// retained input list at serialization time.
    pub archive: usize,
    /// Basename of that archive, for reports.
    pub source: String,
    pub range: Range<usize>,
}

impl MapMarker {
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.source, self.name)
    }
}

#[derive(Debug, Default)]
pub struct MapTable {
    maps: OrderedMap<MapMarker>,
}

enum State {
    Out,
    In {
        name: String,
        source: String,
        format: MapFormat,
        start: usize,
    },
}

impl MapTable {
    pub fn new() -> MapTable {
        MapTable::default()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MapMarker> {
        self.maps.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapMarker> {
        self.maps.iter()
    }

    /// Scan the archive left to right, claiming coherent map-lump runs.
    ///
    /// A `THINGS` or `TEXTMAP` lump begins a map whose marker is the lump
    /// immediately before it; one with nothing before it cannot anchor a
    /// map and is left unclaimed. A UDMF run missing its `ENDMAP` is closed
    /// at the end of the archive.
    pub fn read_from(&mut self, wad: &mut Wad, archive_slot: usize, log: &mut DupeLog) {
        let count = wad.len();
        let mut state = State::Out;
        let mut i = 0;

        while i < count {
            let lump_name = wad.lump_at(i).map(|l| l.name.clone()).unwrap_or_default();

            match &mut state {
                State::Out => {
                    let begins = lump_name == "THINGS" || lump_name == "TEXTMAP";
                    if begins && i > 0 {
                        if let Some(marker) = wad.lump_at(i - 1) {
                            let name = marker.name.clone();
                            let source = marker
                                .source
                                .as_ref()
                                .map(|s| s.archive.clone())
                                .unwrap_or_default();
                            let format = if lump_name == "TEXTMAP" {
                                MapFormat::Udmf
                            } else {
                                MapFormat::Doom
                            };
                            claim(wad, i - 1);
                            claim(wad, i);
                            state = State::In {
                                name,
                                source,
                                format,
                                start: i,
                            };
                        }
                    }
                    i += 1;
                }

                State::In {
                    format: MapFormat::Udmf,
                    name,
                    source,
                    start,
                } => {
                    claim(wad, i);
                    if lump_name == "ENDMAP" {
                        let marker = MapMarker {
                            name: std::mem::take(name),
                            format: MapFormat::Udmf,
                            archive: archive_slot,
                            source: std::mem::take(source),
                            range: *start..i + 1,
                        };
                        self.emit(marker, log);
                        state = State::Out;
                    }
                    i += 1;
                }

                State::In {
                    format,
                    name,
                    source,
                    start,
                } => {
                    if MAP_LUMPS.contains(&lump_name.as_str()) {
                        if lump_name == "BEHAVIOR" {
                            *format = MapFormat::Hexen;
                        }
                        claim(wad, i);
                        if i + 1 == count {
                            let marker = MapMarker {
                                name: std::mem::take(name),
                                format: *format,
                                archive: archive_slot,
                                source: std::mem::take(source),
                                range: *start..i + 1,
                            };
                            self.emit(marker, log);
                            state = State::Out;
                        }
                        i += 1;
                    } else {
                        // The run ends just before this lump, which stays
                        // unclaimed and is reconsidered from the Out state.
                        let marker = MapMarker {
                            name: std::mem::take(name),
                            format: *format,
                            archive: archive_slot,
                            source: std::mem::take(source),
                            range: *start..i,
                        };
                        self.emit(marker, log);
                        state = State::Out;
                    }
                }
            }
        }

        if let State::In {
            name,
            source,
            format: MapFormat::Udmf,
            start,
        } = state
        {
            warn!("{source}:{name}: UDMF map missing ENDMAP, closing at end of archive");
            let marker = MapMarker {
                name,
                format: MapFormat::Udmf,
                archive: archive_slot,
                source,
                range: start..count,
            };
            self.emit(marker, log);
        }
    }

    fn emit(&mut self, marker: MapMarker, log: &mut DupeLog) {
        match self.maps.get(&marker.name) {
            Some(existing) => {
                log.add(
                    DupeKind::Overwrite,
                    "map",
                    existing.full_name(),
                    marker.full_name(),
                );
                self.maps.update(marker.name.clone(), marker);
            }
            None => self.maps.add(marker.name.clone(), marker),
        }
    }

    /// Emit each map as an empty marker lump followed by its lump run,
    /// copied from the retained inputs.
    pub fn write_to(&self, out: &mut Wad, inputs: &[Wad]) {
        for marker in self.maps.iter() {
            out.add_lump(Lump::marker(marker.name.clone()));
            let Some(wad) = inputs.get(marker.archive) else {
                continue;
            };
            for index in marker.range.clone() {
                if let Some(lump) = wad.lump_at(index) {
                    out.add_lump(lump.clone());
                }
            }
        }
    }

    pub fn sort(&mut self) {
        self.maps.sort();
    }
}

fn claim(wad: &mut Wad, index: usize) {
    if let Some(lump) = wad.lump_at_mut(index) {
        lump.used = true;
    }
}
