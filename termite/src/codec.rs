use anyhow::{bail, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Maximum byte length a `u16`-prefixed string can carry.
pub const MAX_STR_LEN: usize = u16::MAX as usize;

pub fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<()> {
    w.write_u32::<LittleEndian>(v)?;
    Ok(())
}

pub fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    Ok(r.read_u32::<LittleEndian>()?)
}

pub fn write_u64<W: Write>(w: &mut W, v: u64) -> Result<()> {
    w.write_u64::<LittleEndian>(v)?;
    Ok(())
}

pub fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    Ok(r.read_u64::<LittleEndian>()?)
}

/// Writes a `u16` length prefix followed by the raw bytes. A string longer
/// than the prefix can express is an error, never a wrapped length.
pub fn write_str<W: Write>(w: &mut W, s: &str) -> Result<()> {
    if s.len() > MAX_STR_LEN {
        bail!("string of {} bytes does not fit a u16 length prefix", s.len());
    }
    w.write_u16::<LittleEndian>(s.len() as u16)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub fn read_str<R: Read>(r: &mut R) -> Result<String> {
    let len = r.read_u16::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}
