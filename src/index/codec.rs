//! Binary encode/decode of the `DIRC` version-2 index format (spec.md §4.F).

use super::{Index, IndexEntry, FLAG_ASSUME_VALID, FLAG_EXTENDED, FLAG_STAGE_MASK, FLAG_STAGE_SHIFT};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::hash::{hash_bytes, ObjectId};

const SIGNATURE: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;
const HEADER_LEN: usize = 12;
const CHECKSUM_LEN: usize = 20;
const FIXED_ENTRY_LEN: usize = 62;

/// Number of trailing NUL padding bytes for a path of `name_len` bytes: the
/// entry (62-byte fixed prefix + path + padding) is always a multiple of 8,
/// and padding is always at least 1 byte (serving as the NUL terminator).
fn padding_len(name_len: usize) -> usize {
    8 - ((name_len + 6) % 8)
}

fn encode_entry(entry: &IndexEntry, out: &mut Vec<u8>) {
    for field in [
        entry.ctime_sec,
        entry.ctime_nsec,
        entry.mtime_sec,
        entry.mtime_nsec,
        entry.dev,
        entry.ino,
        entry.mode,
        entry.uid,
        entry.gid,
        entry.file_size,
    ] {
        out.extend_from_slice(&field.to_be_bytes());
    }
    out.extend_from_slice(entry.oid.as_bytes());
    out.extend_from_slice(&entry.flags().to_be_bytes());
    let path_bytes = entry.path.as_bytes();
    out.extend_from_slice(path_bytes);
    out.resize(out.len() + padding_len(path_bytes.len()), 0);
}

fn decode_entry(cursor: &mut Cursor) -> Result<IndexEntry> {
    let err = || Error::CorruptIndex("truncated index entry".into());
    let mut ints = [0u32; 10];
    for slot in &mut ints {
        *slot = cursor.read_u32_be().ok_or_else(err)?;
    }
    let [ctime_sec, ctime_nsec, mtime_sec, mtime_nsec, dev, ino, mode, uid, gid, file_size] = ints;
    let oid_bytes = cursor.read_n(ObjectId::LEN).ok_or_else(err)?;
    let mut raw = [0u8; ObjectId::LEN];
    raw.copy_from_slice(oid_bytes);
    let oid = ObjectId::from_bytes(raw);

    let flags = cursor.read_u16_be().ok_or_else(err)?;
    let assume_valid = flags & FLAG_ASSUME_VALID != 0;
    let extended = flags & FLAG_EXTENDED != 0;
    let stage = ((flags & FLAG_STAGE_MASK) >> FLAG_STAGE_SHIFT) as u8;

    let path_bytes = cursor
        .read_until(0)
        .ok_or_else(|| Error::CorruptIndex("unterminated entry path".into()))?;
    let path = String::from_utf8(path_bytes.to_vec())
        .map_err(|_| Error::CorruptIndex("entry path is not valid UTF-8".into()))?;
    // `read_until` already consumed the first of the 1..8 padding NULs.
    let extra_padding = padding_len(path_bytes.len()) - 1;
    if extra_padding > 0 {
        cursor.read_n(extra_padding).ok_or_else(err)?;
    }

    Ok(IndexEntry {
        ctime_sec,
        ctime_nsec,
        mtime_sec,
        mtime_nsec,
        dev,
        ino,
        mode,
        uid,
        gid,
        file_size,
        oid,
        assume_valid,
        extended,
        stage,
        path,
    })
}

/// Encodes `index` into the full on-disk `DIRC` v2 byte layout, including
/// the trailing SHA-1 checksum of everything preceding it.
pub fn encode_index(index: &Index) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + index.len() * (FIXED_ENTRY_LEN + 16));
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(&VERSION.to_be_bytes());
    out.extend_from_slice(&(index.len() as u32).to_be_bytes());
    for entry in index.entries() {
        encode_entry(entry, &mut out);
    }
    let checksum = hash_bytes(&out);
    out.extend_from_slice(checksum.as_bytes());
    out
}

/// Decodes a `DIRC` v2 index file, verifying its trailing checksum.
/// Any trailing bytes between the last entry and the checksum (index
/// extensions) are rejected — this core does not parse extensions.
pub fn decode_index(data: &[u8]) -> Result<Index> {
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(Error::CorruptIndex("file too short".into()));
    }
    let (body, checksum_bytes) = data.split_at(data.len() - CHECKSUM_LEN);
    if hash_bytes(body).as_bytes() != checksum_bytes {
        return Err(Error::CorruptIndex("checksum mismatch".into()));
    }

    let mut cursor = Cursor::new(body);
    let signature = cursor
        .read_n(4)
        .ok_or_else(|| Error::CorruptIndex("missing signature".into()))?;
    if signature != SIGNATURE {
        return Err(Error::CorruptIndex("bad signature".into()));
    }
    let version = cursor
        .read_u32_be()
        .ok_or_else(|| Error::CorruptIndex("missing version".into()))?;
    if version != VERSION {
        return Err(Error::UnsupportedIndexVersion(version));
    }
    let count = cursor
        .read_u32_be()
        .ok_or_else(|| Error::CorruptIndex("missing entry count".into()))?;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        entries.push(decode_entry(&mut cursor)?);
    }
    if !cursor.is_eof() {
        return Err(Error::CorruptIndex(
            "trailing bytes before checksum (extensions are not supported)".into(),
        ));
    }
    Ok(Index::from_entries(entries))
}
