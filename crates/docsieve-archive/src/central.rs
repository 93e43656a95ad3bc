//! Central directory scan for per-entry general purpose flags, which the zip
//! reader does not expose.

use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};

const EOCD_SIG: u32 = 0x0605_4b50;
const ZIP64_LOCATOR_SIG: u32 = 0x0706_4b50;
const ZIP64_EOCD_SIG: u32 = 0x0606_4b50;
const HEADER_SIG: u32 = 0x0201_4b50;

const EOCD_LEN: usize = 22;
const ZIP64_LOCATOR_LEN: usize = 20;
const ZIP64_EOCD_LEN: usize = 56;
const HEADER_LEN: usize = 46;
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Bit 0: entry is encrypted.
pub const FLAG_ENCRYPTED: u16 = 0x0001;
/// Bit 11: name and comment are UTF-8.
pub const FLAG_UTF8: u16 = 0x0800;

/// A central directory record, name bytes as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub raw_name: Vec<u8>,
    pub flags: u16,
}

impl RawEntry {
    pub fn is_utf8(&self) -> bool {
        self.flags & FLAG_UTF8 != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }
}

fn corrupted(reason: &str) -> Error {
    Error::Corrupted(reason.to_owned())
}

fn u16_at(buf: &[u8], at: usize) -> Option<u16> {
    let bytes = buf.get(at..at.checked_add(2)?)?;
    <[u8; 2]>::try_from(bytes).ok().map(u16::from_le_bytes)
}

fn u32_at(buf: &[u8], at: usize) -> Option<u32> {
    let bytes = buf.get(at..at.checked_add(4)?)?;
    <[u8; 4]>::try_from(bytes).ok().map(u32::from_le_bytes)
}

fn u64_at(buf: &[u8], at: usize) -> Option<u64> {
    let bytes = buf.get(at..at.checked_add(8)?)?;
    <[u8; 8]>::try_from(bytes).ok().map(u64::from_le_bytes)
}

fn field<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| corrupted("truncated central directory"))
}

fn read_at<R: Read + Seek>(reader: &mut R, offset: u64, len: usize) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Where the central directory lives and how many records it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Directory {
    eocd_pos: u64,
    count: u64,
    size: u64,
    offset: u64,
}

fn find_directory<R: Read + Seek>(reader: &mut R) -> Result<Directory> {
    let len = reader.seek(SeekFrom::End(0))?;
    let tail_len = len.min((EOCD_LEN + MAX_COMMENT_LEN) as u64);
    let tail_start = len - tail_len;
    let tail = read_at(reader, tail_start, tail_len as usize)?;

    let eocd_at = (0..=tail.len().saturating_sub(EOCD_LEN))
        .rev()
        .find(|&i| u32_at(&tail, i) == Some(EOCD_SIG) && i + EOCD_LEN <= tail.len())
        .ok_or_else(|| corrupted("end of central directory not found"))?;
    let eocd = &tail[eocd_at..];

    let mut dir = Directory {
        eocd_pos: tail_start + eocd_at as u64,
        count: u64::from(field(u16_at(eocd, 10))?),
        size: u64::from(field(u32_at(eocd, 12))?),
        offset: u64::from(field(u32_at(eocd, 16))?),
    };

    let saturated =
        dir.count == 0xFFFF || dir.size == 0xFFFF_FFFF || dir.offset == 0xFFFF_FFFF;
    if saturated && dir.eocd_pos >= ZIP64_LOCATOR_LEN as u64 {
        let locator = read_at(
            reader,
            dir.eocd_pos - ZIP64_LOCATOR_LEN as u64,
            ZIP64_LOCATOR_LEN,
        )?;
        if u32_at(&locator, 0) == Some(ZIP64_LOCATOR_SIG) {
            let record_at = field(u64_at(&locator, 8))?;
            if record_at.saturating_add(ZIP64_EOCD_LEN as u64) > len {
                return Err(corrupted("zip64 end record out of bounds"));
            }
            let record = read_at(reader, record_at, ZIP64_EOCD_LEN)?;
            if u32_at(&record, 0) != Some(ZIP64_EOCD_SIG) {
                return Err(corrupted("bad zip64 end record"));
            }
            dir.count = field(u64_at(&record, 32))?;
            dir.size = field(u64_at(&record, 40))?;
            dir.offset = field(u64_at(&record, 48))?;
        }
    }

    if dir.offset.saturating_add(dir.size) > len {
        return Err(corrupted("central directory out of bounds"));
    }
    Ok(dir)
}

/// Read every central directory record of the archive behind `reader`.
pub fn read_central_directory<R: Read + Seek>(reader: &mut R) -> Result<Vec<RawEntry>> {
    let dir = find_directory(reader)?;
    let size = usize::try_from(dir.size).map_err(|_| corrupted("central directory too large"))?;
    let mut records = read_at(reader, dir.offset, size)?;

    // Self-extracting stubs shift every offset by the stub length.
    if size > 0 && u32_at(&records, 0) != Some(HEADER_SIG) {
        let shifted = dir
            .eocd_pos
            .checked_sub(dir.size)
            .ok_or_else(|| corrupted("central directory not found"))?;
        records = read_at(reader, shifted, size)?;
        if u32_at(&records, 0) != Some(HEADER_SIG) {
            return Err(corrupted("central directory not found"));
        }
    }

    let mut entries = Vec::with_capacity(dir.count.min(u64::from(u16::MAX)) as usize);
    let mut pos = 0usize;
    while (entries.len() as u64) < dir.count {
        if field(u32_at(&records, pos))? != HEADER_SIG {
            return Err(corrupted("bad central directory header"));
        }
        let flags = field(u16_at(&records, pos + 8))?;
        let name_len = usize::from(field(u16_at(&records, pos + 28))?);
        let extra_len = usize::from(field(u16_at(&records, pos + 30))?);
        let comment_len = usize::from(field(u16_at(&records, pos + 32))?);

        let name_start = pos + HEADER_LEN;
        let raw_name = field(records.get(name_start..name_start + name_len))?.to_vec();
        entries.push(RawEntry { raw_name, flags });
        pos = name_start + name_len + extra_len + comment_len;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn archive(names: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"x").unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_names_and_flags() {
        let data = archive(&["plain.txt", "日本語.txt"]);
        let entries = read_central_directory(&mut Cursor::new(data)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].raw_name, b"plain.txt");
        assert!(!entries[0].is_utf8());
        assert_eq!(entries[1].raw_name, "日本語.txt".as_bytes());
        assert!(entries[1].is_utf8());
    }

    #[test]
    fn empty_archive() {
        let data = archive(&[]);
        assert!(read_central_directory(&mut Cursor::new(data)).unwrap().is_empty());
    }

    #[test]
    fn tolerates_prepended_stub() {
        let mut data = b"#!/bin/sh\nexit 0\n".to_vec();
        data.extend(archive(&["a"]));
        let entries = read_central_directory(&mut Cursor::new(data)).unwrap();
        assert_eq!(entries[0].raw_name, b"a");
    }

    #[test]
    fn rejects_non_archive() {
        let err = read_central_directory(&mut Cursor::new(b"not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, Error::Corrupted(_)));
    }

    #[test]
    fn rejects_truncated_directory() {
        let mut data = archive(&["a", "b"]);
        let eocd = data.len() - EOCD_LEN;
        // Claim a third record that is not there.
        data[eocd + 10] = 3;
        let err = read_central_directory(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::Corrupted(_)));
    }
}
