#![forbid(unsafe_code)]

use std::io::{Read, Write};

use crate::wad::error::WadResult;

pub fn read_exact<const N: usize>(r: &mut dyn Read) -> WadResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u8(r: &mut dyn Read) -> WadResult<u8> {
    Ok(read_exact::<1>(r)?[0])
}

pub fn read_u16(r: &mut dyn Read) -> WadResult<u16> {
    Ok(u16::from_le_bytes(read_exact::<2>(r)?))
}

pub fn read_i16(r: &mut dyn Read) -> WadResult<i16> {
    Ok(i16::from_le_bytes(read_exact::<2>(r)?))
}

pub fn read_u32(r: &mut dyn Read) -> WadResult<u32> {
    Ok(u32::from_le_bytes(read_exact::<4>(r)?))
}

pub fn write_u16(w: &mut dyn Write, v: u16) -> WadResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i16(w: &mut dyn Write, v: i16) -> WadResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u32(w: &mut dyn Write, v: u32) -> WadResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a fixed-width NUL-padded ASCII name field, trimmed at the first NUL.
pub fn read_name<const N: usize>(r: &mut dyn Read) -> WadResult<String> {
    let raw = read_exact::<N>(r)?;
    let len = raw.iter().position(|&b| b == 0).unwrap_or(N);
    Ok(String::from_utf8_lossy(&raw[..len]).into_owned())
}

/// Pack a name into a fixed-width NUL-padded field. Longer names truncate.
pub fn pack_name<const N: usize>(name: &str) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, b) in name.bytes().take(N).enumerate() {
        out[i] = b;
    }
    out
}

pub fn write_name<const N: usize>(w: &mut dyn Write, name: &str) -> WadResult<()> {
    w.write_all(&pack_name::<N>(name))?;
    Ok(())
}
