#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::wad::error::WadResult;
use crate::wad::format::{Wad, HEADER_LEN};
use crate::wad::io::{write_name, write_u32};

/// Serialize an archive. Lump offsets are recomputed so data packs
/// back-to-back from byte 12 in insertion order, with the directory
/// following the last lump. The header's lump count is the number of
/// lumps actually written.
pub fn write_wad(wad: &Wad, path: &Path) -> WadResult<()> {
    let mut out = File::create(path)?;

    let body_len: usize = wad.lumps.iter().map(|l| l.data.len()).sum();
    let dir_offset = HEADER_LEN + body_len;

    out.write_all(&wad.kind.magic())?;
    write_u32(&mut out, wad.len() as u32)?;
    write_u32(&mut out, dir_offset as u32)?;

    for lump in wad.lumps.iter() {
        out.write_all(&lump.data)?;
    }

    let mut offset = HEADER_LEN;
    for lump in wad.lumps.iter() {
        write_u32(&mut out, offset as u32)?;
        write_u32(&mut out, lump.data.len() as u32)?;
        write_name::<8>(&mut out, &lump.name)?;
        offset += lump.data.len();
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::format::{Lump, WadKind};
    use crate::wad::read::read_wad;
    use tempfile::tempdir;

    fn sample() -> Wad {
        let mut wad = Wad::new(WadKind::Pwad);
        wad.add_lump(Lump::new("DEMO1", b"demo bytes".to_vec()));
        wad.add_lump(Lump::marker("P_START"));
        wad.add_lump(Lump::new("WALL00_1", vec![1, 2, 3, 4]));
        wad.add_lump(Lump::marker("P_END"));
        wad
    }

    #[test]
    fn round_trip_preserves_names_sizes_and_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.wad");
        let wad = sample();
        write_wad(&wad, &path).unwrap();

        let back = read_wad(&path).unwrap();
        assert_eq!(back.kind, WadKind::Pwad);
        assert_eq!(back.len(), wad.len());
        for (a, b) in wad.lumps.iter().zip(back.lumps.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.data, b.data);
        }
    }

    #[test]
    fn long_names_truncate_to_eight_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trunc.wad");
        let mut wad = Wad::new(WadKind::Pwad);
        wad.add_lump(Lump::new("TOOLONGNAME", vec![9]));
        write_wad(&wad, &path).unwrap();

        let back = read_wad(&path).unwrap();
        assert_eq!(back.lump_at(0).unwrap().name, "TOOLONGN");
    }

    #[test]
    fn writes_are_deterministic() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wad");
        let b = dir.path().join("b.wad");
        let wad = sample();
        write_wad(&wad, &a).unwrap();
        write_wad(&wad, &b).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }
}
