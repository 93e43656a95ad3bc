use std::io::{self, Read, Seek};

/// True for a local file header or a bare end-of-central-directory record
/// (an archive with no entries).
pub fn is_zip_signature(data: &[u8]) -> bool {
    matches!(
        data,
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] | [0x50, 0x4B, 0x07, 0x08, ..]
    )
}

/// Peek at the first bytes of `reader` and rewind.
pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let mut header = [0u8; 4];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.rewind()?;
    Ok(is_zip_signature(&header[..filled]))
}
