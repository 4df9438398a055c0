#![forbid(unsafe_code)]

use std::io::Cursor;
use std::path::Path;

use crate::wad::error::{WadError, WadResult};
use crate::wad::format::{Lump, LumpSource, Wad, WadKind, DIR_ENTRY_LEN, HEADER_LEN};
use crate::wad::io::{read_exact, read_name, read_u32};

/// Read an archive, materializing every lump's bytes.
///
/// Each lump is stamped with its source archive basename and original
/// directory index so conflict reports can name where a resource came from.
pub fn read_wad(path: &Path) -> WadResult<Wad> {
    let data = std::fs::read(path)?;
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if data.len() < HEADER_LEN {
        return Err(WadError::InvalidFormat(format!(
            "{basename}: file too small for a wad header"
        )));
    }

    let mut cur = Cursor::new(&data[..]);
    let magic = read_exact::<4>(&mut cur)?;
    let kind = WadKind::from_magic(&magic).ok_or_else(|| {
        WadError::InvalidFormat(format!("{basename}: bad magic {:?}", magic))
    })?;

    let count = read_u32(&mut cur)? as usize;
    let dir_offset = read_u32(&mut cur)? as usize;

    if dir_offset < HEADER_LEN || dir_offset > data.len() {
        return Err(WadError::CorruptHeader(format!(
            "{basename}: directory offset {dir_offset} out of bounds"
        )));
    }
    let dir_len = count
        .checked_mul(DIR_ENTRY_LEN)
        .ok_or_else(|| WadError::CorruptHeader(format!("{basename}: directory overflow")))?;
    if dir_offset + dir_len > data.len() {
        return Err(WadError::CorruptHeader(format!(
            "{basename}: directory runs past end of file"
        )));
    }

    let mut wad = Wad::new(kind);
    let mut cur = Cursor::new(&data[dir_offset..dir_offset + dir_len]);
    for index in 0..count {
        let offset = read_u32(&mut cur)? as usize;
        let size = read_u32(&mut cur)? as usize;
        let name = read_name::<8>(&mut cur)?;

        let end = offset
            .checked_add(size)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                WadError::CorruptHeader(format!("{basename}: lump {name} out of bounds"))
            })?;

        let mut lump = Lump::new(name, data[offset..end].to_vec());
        lump.source = Some(LumpSource {
            archive: basename.clone(),
            index,
        });
        wad.add_lump(lump);
    }

    Ok(wad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::io::pack_name;
    use tempfile::tempdir;

    fn raw_wad(magic: &[u8; 4], lumps: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        let mut dir = Vec::new();
        for (name, data) in lumps {
            let offset = HEADER_LEN + body.len();
            body.extend_from_slice(data);
            dir.extend_from_slice(&(offset as u32).to_le_bytes());
            dir.extend_from_slice(&(data.len() as u32).to_le_bytes());
            dir.extend_from_slice(&pack_name::<8>(name));
        }
        let mut out = Vec::new();
        out.extend_from_slice(magic);
        out.extend_from_slice(&(lumps.len() as u32).to_le_bytes());
        out.extend_from_slice(&((HEADER_LEN + body.len()) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out.extend_from_slice(&dir);
        out
    }

    #[test]
    fn reads_lumps_and_stamps_sources() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("two.wad");
        std::fs::write(&path, raw_wad(b"PWAD", &[("FIRST", b"abc"), ("SECOND", b"")])).unwrap();

        let wad = read_wad(&path).unwrap();
        assert_eq!(wad.kind, WadKind::Pwad);
        assert_eq!(wad.len(), 2);

        let first = wad.lump_at(0).unwrap();
        assert_eq!(first.name, "FIRST");
        assert_eq!(first.data, b"abc");
        let src = first.source.as_ref().unwrap();
        assert_eq!(src.archive, "two.wad");
        assert_eq!(src.index, 0);

        assert_eq!(wad.lump_at(1).unwrap().size(), 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not.wad");
        std::fs::write(&path, raw_wad(b"ZIPF", &[])).unwrap();
        assert!(matches!(read_wad(&path), Err(WadError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_directory_out_of_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.wad");
        let mut data = raw_wad(b"PWAD", &[("ONLY", b"x")]);
        // Push the declared directory offset past the end of the file.
        let new_offset = data.len() as u32 + 1;
        data[8..12].copy_from_slice(&new_offset.to_le_bytes());
        std::fs::write(&path, data).unwrap();
        assert!(matches!(read_wad(&path), Err(WadError::CorruptHeader(_))));
    }

    #[test]
    fn rejects_lump_out_of_bounds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.wad");
        let mut data = raw_wad(b"PWAD", &[("ONLY", b"x")]);
        // Inflate the lump's declared size past the end of the file.
        let dir_offset = u32::from_le_bytes(data[8..12].try_into().unwrap()) as usize;
        data[dir_offset + 4..dir_offset + 8].copy_from_slice(&0xFFFFu32.to_le_bytes());
        std::fs::write(&path, data).unwrap();
        assert!(matches!(read_wad(&path), Err(WadError::CorruptHeader(_))));
    }

    #[test]
    fn duplicate_names_both_survive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.wad");
        std::fs::write(
            &path,
            raw_wad(b"IWAD", &[("TWICE", b"old"), ("TWICE", b"new")]),
        )
        .unwrap();

        let wad = read_wad(&path).unwrap();
        assert_eq!(wad.len(), 2);
        // Archive lookup resolves to the first insertion; both iterate.
        assert_eq!(wad.lump("TWICE").unwrap().data, b"old");
        assert_eq!(wad.lump_at(1).unwrap().data, b"new");
    }
}
