#![forbid(unsafe_code)]

use std::collections::HashSet;

use crate::wad::format::{Lump, Wad};
use crate::wad::omap::OrderedMap;
use crate::wad::report::{DupeKind, DupeLog};

/// IWADs and PWADs bracket the same logical namespaces with different
/// marker prefixes; folding them is part of the merge semantics.
fn fold_alias(raw: &str) -> &str {
    match raw {
        "F" | "F1" | "F2" | "F3" => "FF",
        "S" => "SS",
        "P" | "P1" | "P2" | "P3" => "PP",
        other => other,
    }
}

/// The engine expects the short-form end markers for sprites and flats.
fn end_marker(namespace: &str) -> String {
    match namespace {
        "SS" => "S_END".to_string(),
        "FF" => "F_END".to_string(),
        other => format!("{other}_END"),
    }
}

#[derive(Debug)]
pub struct Namespace {
    pub name: String,
    pub lumps: OrderedMap<Lump>,
}

impl Namespace {
    fn new(name: impl Into<String>) -> Namespace {
        Namespace {
            name: name.into(),
            lumps: OrderedMap::new(),
        }
    }
}

/// Partitions leftover lumps into marker-bracketed namespaces plus a
/// "loose" bucket for everything outside any bracket.
#[derive(Debug, Default)]
pub struct NamespaceTable {
    spaces: OrderedMap<Namespace>,
    loose: OrderedMap<Lump>,
}

impl NamespaceTable {
    pub fn new() -> NamespaceTable {
        NamespaceTable::default()
    }

    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.spaces.get(name)
    }

    pub fn loose(&self) -> impl Iterator<Item = &Lump> {
        self.loose.iter()
    }

    pub fn loose_len(&self) -> usize {
        self.loose.len()
    }

    /// Single pass over the lumps no other reader claimed.
    ///
    /// A zero-size `*_START` opens a namespace (alias-folded); any
    /// zero-size `*_END` closes the one currently open, its own prefix
    /// deliberately unchecked. Content lumps key by name; a same-name
    /// collision keeps the existing lump when the bytes match and
    /// otherwise overwrites with a duplicate record.
    pub fn read_from(&mut self, wad: &mut Wad, log: &mut DupeLog) {
        let mut open: Option<String> = None;

        for i in 0..wad.len() {
            let lump = match wad.lump_at(i) {
                Some(l) if !l.used => l.clone(),
                _ => continue,
            };
            claim(wad, i);

            if lump.size() == 0 {
                if let Some(raw) = lump.name.strip_suffix("_START") {
                    let folded = fold_alias(raw).to_string();
                    if !self.spaces.contains(&folded) {
                        self.spaces.add(folded.clone(), Namespace::new(folded.clone()));
                    }
                    open = Some(folded);
                    continue;
                }
                if lump.name.ends_with("_END") && open.is_some() {
                    open = None;
                    continue;
                }
            }

            match &open {
                Some(name) => {
                    if let Some(ns) = self.spaces.get_mut(name) {
                        insert_lump(&mut ns.lumps, lump, log);
                    }
                }
                None => insert_lump(&mut self.loose, lump, log),
            }
        }
    }

    /// Drop PP lumps that no live patch name references.
    pub fn prune_patches(&mut self, live: &[String]) {
        let keep: HashSet<&str> = live.iter().map(String::as_str).collect();
        if let Some(pp) = self.spaces.get_mut("PP") {
            pp.lumps.retain(|name, _| keep.contains(name));
        }
    }

    /// Bracket each non-empty namespace with its start marker and the
    /// engine-preferred end marker.
    pub fn write_to(&self, out: &mut Wad) {
        for ns in self.spaces.iter() {
            if ns.lumps.is_empty() {
                continue;
            }
            out.add_lump(Lump::marker(format!("{}_START", ns.name)));
            for lump in ns.lumps.iter() {
                out.add_lump(lump.clone());
            }
            out.add_lump(Lump::marker(end_marker(&ns.name)));
        }
    }

    pub fn write_loose_to(&self, out: &mut Wad) {
        for lump in self.loose.iter() {
            out.add_lump(lump.clone());
        }
    }

    /// Sort the lumps inside every namespace by name.
    pub fn sort(&mut self) {
        for ns in self.spaces.iter_mut() {
            ns.lumps.sort();
        }
    }

    /// The loose bucket sorts under its own option.
    pub fn sort_loose(&mut self) {
        self.loose.sort();
    }
}

fn insert_lump(map: &mut OrderedMap<Lump>, lump: Lump, log: &mut DupeLog) {
    match map.get(&lump.name) {
        None => map.add(lump.name.clone(), lump),
        Some(existing) if existing.data == lump.data => {}
        Some(existing) => {
            log.add(
                DupeKind::Overwrite,
                "lump",
                existing.full_name(),
                lump.full_name(),
            );
            map.update(lump.name.clone(), lump);
        }
    }
}

fn claim(wad: &mut Wad, index: usize) {
    if let Some(lump) = wad.lump_at_mut(index) {
        lump.used = true;
    }
}
