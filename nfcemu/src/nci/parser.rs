// nfcemu-rs/nfcemu/src/nci/parser.rs

use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    ensure_len(data, idx + 1)?;
    Ok(data[idx])
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    ensure_len(data, idx + len)?;
    Ok(&data[idx..idx + len])
}

/// Split a counted list: the first byte is the number of entries, each
/// entry `entry_len` bytes long.
pub fn counted_entries(data: &[u8], entry_len: usize) -> Result<Vec<&[u8]>> {
    let count = byte_at(data, 0)? as usize;
    let body = slice_at(data, 1, count * entry_len)?;
    Ok(body.chunks(entry_len).collect())
}

/// Walk `count` `[id][len][value]` entries starting at `idx`.
pub fn tlv_entries(data: &[u8], idx: usize, count: usize) -> Result<Vec<(u8, &[u8])>> {
    let mut out = Vec::with_capacity(count);
    let mut pos = idx;
    for _ in 0..count {
        let id = byte_at(data, pos)?;
        let len = byte_at(data, pos + 1)? as usize;
        out.push((id, slice_at(data, pos + 2, len)?));
        pos += 2 + len;
    }
    Ok(out)
}
