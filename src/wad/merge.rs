#![forbid(unsafe_code)]

use std::fs::File;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::wad::animated::{AnimatedTable, SwitchesTable};
use crate::wad::error::{WadError, WadResult};
use crate::wad::format::{Wad, WadKind};
use crate::wad::maps::MapTable;
use crate::wad::namespaces::NamespaceTable;
use crate::wad::read::read_wad;
use crate::wad::report::DupeLog;
use crate::wad::textlumps::TextTable;
use crate::wad::textures::TextureTable;
use crate::wad::write::write_wad;

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub output: PathBuf,
    /// Intersect the PP namespace with the live patch-name list.
    pub filter_patches: bool,
    pub merge_text: bool,
    pub sort_ns: bool,
    pub sort_maps: bool,
    pub sort_textures: bool,
    pub sort_text: bool,
    pub sort_loose: bool,
    /// Where to write the duplicate report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            output: PathBuf::from("merged.wad"),
            filter_patches: true,
            merge_text: true,
            sort_ns: true,
            sort_maps: true,
            sort_textures: false,
            sort_text: true,
            sort_loose: false,
            report: None,
        }
    }
}

#[derive(Debug)]
pub struct MergeSummary {
    pub inputs_merged: usize,
    pub inputs_skipped: usize,
    pub lumps_written: usize,
    pub log: DupeLog,
}

/// Merge the given archives, in order, into one output archive.
///
/// Unreadable archives (bad magic, corrupt header) are skipped with a
/// warning; every other failure aborts the merge. Given the same inputs
/// in the same order and the same options, the output is byte-identical
/// across runs.
pub fn merge(inputs: &[PathBuf], opts: &MergeOptions) -> WadResult<MergeSummary> {
    let mut log = DupeLog::new();
    let mut textures = TextureTable::new();
    let mut animated = AnimatedTable::new();
    let mut switches = SwitchesTable::new();
    let mut maps = MapTable::new();
    let mut text = TextTable::new();
    let mut namespaces = NamespaceTable::new();

    // Inputs stay materialized: map markers reference lump runs inside
    // them until the output is assembled.
    let mut loaded: Vec<Wad> = Vec::new();
    let mut skipped = 0usize;

    for path in inputs {
        let mut wad = match read_wad(path) {
            Ok(wad) => wad,
            Err(err @ (WadError::InvalidFormat(_) | WadError::CorruptHeader(_))) => {
                warn!("skipping {}: {err}", path.display());
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        info!(
            "{}: {} ({} lumps)",
            path.display(),
            wad.kind.as_str(),
            wad.len()
        );

        let slot = loaded.len();
        let archive_textures = TextureTable::read_from(&mut wad)?;
        debug!("{}: {} textures", path.display(), archive_textures.len());
        textures.merge_from(archive_textures, &mut log);
        animated.read_from(&mut wad, &mut log)?;
        switches.read_from(&mut wad, &mut log)?;
        maps.read_from(&mut wad, slot, &mut log);
        if opts.merge_text {
            text.read_from(&mut wad, &mut log);
        }
        namespaces.read_from(&mut wad, &mut log);
        loaded.push(wad);
    }

    textures.update_patch_names();
    if opts.filter_patches {
        namespaces.prune_patches(textures.patch_names());
    }

    if opts.sort_textures {
        textures.sort();
    }
    if opts.sort_maps {
        maps.sort();
    }
    if opts.sort_ns {
        namespaces.sort();
    }
    if opts.sort_text {
        text.sort();
    }
    if opts.sort_loose {
        namespaces.sort_loose();
    }

    let mut out = Wad::new(WadKind::Pwad);
    namespaces.write_loose_to(&mut out);
    text.write_to(&mut out);
    animated.write_to(&mut out)?;
    switches.write_to(&mut out)?;
    textures.write_to(&mut out)?;
    maps.write_to(&mut out, &loaded);
    namespaces.write_to(&mut out);

    info!(
        "writing {} ({} lumps, {} duplicates resolved)",
        opts.output.display(),
        out.len(),
        log.len()
    );
    write_wad(&out, &opts.output)?;

    if let Some(report) = &opts.report {
        let mut file = File::create(report)?;
        log.write_to(&mut file)?;
    }

    Ok(MergeSummary {
        inputs_merged: loaded.len(),
        inputs_skipped: skipped,
        lumps_written: out.len(),
        log,
    })
}
