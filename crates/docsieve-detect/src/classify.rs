use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::document::mime;
use crate::error::{Error, Result};

/// Bytes of a file inspected by [`MagicClassifier`].
pub const SNIFF_LEN: usize = 8192;

/// Output of a content classifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub mime_type: String,
    pub is_text: bool,
    /// Short detector label, e.g. `pdf` or `markdown`.
    pub label: String,
}

impl Classification {
    pub fn new(mime_type: &str, is_text: bool, label: &str) -> Self {
        Self {
            mime_type: mime_type.to_owned(),
            is_text,
            label: label.to_owned(),
        }
    }
}

/// Content-based file type classifier. Must not consult the file extension.
pub trait MimeClassifier: Send + Sync {
    fn classify(&self, path: &Path) -> Result<Classification>;
}

/// Signature and heuristic classifier over the head of a file.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicClassifier;

impl MimeClassifier for MagicClassifier {
    fn classify(&self, path: &Path) -> Result<Classification> {
        let head = read_head(path, SNIFF_LEN)?;
        if head.is_empty() {
            return Ok(Classification::new(mime::EMPTY, false, "empty"));
        }
        if is_zip(&head) {
            return Ok(classify_container(path));
        }
        if let Some(c) = classify_binary(&head) {
            return Ok(c);
        }
        if looks_textual(&head) {
            return Ok(classify_text(&head));
        }
        Ok(Classification::new(mime::OCTET_STREAM, false, "unknown"))
    }
}

/// Read up to `limit` bytes from the start of `path`.
pub fn read_head(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let mut head = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64)
        .read_to_end(&mut head)
        .map_err(io_err)?;
    Ok(head)
}

fn is_zip(data: &[u8]) -> bool {
    matches!(data, [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..])
}

fn classify_container(path: &Path) -> Classification {
    let zip = Classification::new(mime::ZIP, false, "zip");
    let Ok(file) = File::open(path) else {
        return zip;
    };
    let Ok(archive) = zip::ZipArchive::new(file) else {
        return zip;
    };

    let mut names = archive.file_names();
    let known = names.find_map(|name| match name {
        "word/document.xml" => Some((mime::DOCX, "docx")),
        "xl/workbook.xml" => Some((mime::XLSX, "xlsx")),
        "ppt/presentation.xml" => Some((mime::PPTX, "pptx")),
        _ => None,
    });
    match known {
        Some((mime_type, label)) => Classification::new(mime_type, false, label),
        None => zip,
    }
}

fn classify_binary(data: &[u8]) -> Option<Classification> {
    let (mime_type, label) = match data {
        [b'%', b'P', b'D', b'F', b'-', ..] => (mime::PDF, "pdf"),
        [0x7F, b'E', b'L', b'F', ..] => ("application/x-executable", "elf"),
        [b'M', b'Z', ..] if data.contains(&0) => ("application/x-dosexec", "pebin"),
        [0xFE, 0xED, 0xFA, 0xCE | 0xCF, ..]
        | [0xCE | 0xCF, 0xFA, 0xED, 0xFE, ..]
        | [0xCA, 0xFE, 0xBA, 0xBE, ..] => ("application/x-mach-binary", "macho"),
        [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, ..] => {
            ("application/x-ole-storage", "ole")
        }
        [0x1F, 0x8B, ..] => ("application/gzip", "gzip"),
        [b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C, ..] => ("application/x-7z-compressed", "sevenzip"),
        [b'R', b'a', b'r', b'!', 0x1A, 0x07, ..] => ("application/x-rar", "rar"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => ("image/png", "png"),
        [0xFF, 0xD8, 0xFF, ..] => ("image/jpeg", "jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => ("image/gif", "gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ("image/webp", "webp"),
        [b'B', b'M', _, _, _, _, 0, 0, 0, 0, ..] => ("image/bmp", "bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => ("image/tiff", "tiff"),
        _ => return None,
    };
    Some(Classification::new(mime_type, false, label))
}

fn looks_textual(data: &[u8]) -> bool {
    if data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]) {
        return true;
    }
    if data.contains(&0) {
        return false;
    }
    let control = data
        .iter()
        .filter(|&&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C | 0x1B))
        .count();
    control * 100 <= data.len()
}

fn classify_text(data: &[u8]) -> Classification {
    let body = data.strip_prefix(&[0xEF, 0xBB, 0xBF][..]).unwrap_or(data);
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let lower = body[start..].to_ascii_lowercase();

    if lower.starts_with(b"<!doctype html") || lower.starts_with(b"<html") {
        return Classification::new(mime::TEXT_HTML, true, "html");
    }
    if lower.starts_with(b"<?xml") || lower.starts_with(b"<svg") {
        if contains(&lower, b"<svg") {
            return Classification::new("image/svg+xml", true, "svg");
        }
        if contains(&lower, b"<html") {
            return Classification::new(mime::TEXT_HTML, true, "html");
        }
        return Classification::new(mime::TEXT_XML, true, "xml");
    }
    if lower.starts_with(b"<") {
        if contains(&lower, b"<head") || contains(&lower, b"<body") {
            return Classification::new(mime::TEXT_HTML, true, "html");
        }
        if lower.get(1).is_some_and(u8::is_ascii_alphabetic) && contains(&lower, b"</") {
            return Classification::new(mime::TEXT_XML, true, "xml");
        }
    }
    if markdown_score(&lower) >= 3 {
        return Classification::new(mime::TEXT_MARKDOWN, true, "markdown");
    }
    Classification::new(mime::TEXT_PLAIN, true, "txt")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Headings and fences weigh 2, lists and links weigh 1.
fn markdown_score(data: &[u8]) -> usize {
    let mut score = 0;
    for line in data.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let hashes = line.iter().take_while(|&&b| b == b'#').count();
        if (1..=6).contains(&hashes) && line.get(hashes) == Some(&b' ') {
            score += 2;
        } else if line.starts_with(b"```") || line.starts_with(b"~~~") {
            score += 2;
        } else if line.starts_with(b"- ") || line.starts_with(b"* ") || line.starts_with(b"> ") {
            score += 1;
        }
        if contains(line, b"](") {
            score += 1;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(data: &[u8]) -> String {
        classify_binary(data)
            .or_else(|| looks_textual(data).then(|| classify_text(data)))
            .map(|c| c.label)
            .unwrap_or_default()
    }

    #[test]
    fn binary_signatures() {
        assert_eq!(label(b"%PDF-1.7\n"), "pdf");
        assert_eq!(label(&[0x7F, b'E', b'L', b'F', 2, 1, 1, 0]), "elf");
        assert_eq!(label(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]), "png");
        assert_eq!(label(b"GIF89a\x01\x00"), "gif");
        assert_eq!(label(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "webp");
    }

    #[test]
    fn zip_signatures() {
        assert!(is_zip(&[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00]));
        assert!(is_zip(&[0x50, 0x4B, 0x05, 0x06]));
        assert!(!is_zip(b"PK"));
    }

    #[test]
    fn text_subtypes() {
        assert_eq!(label(b"<!DOCTYPE html><html><body>x</body></html>"), "html");
        assert_eq!(label(b"<?xml version=\"1.0\"?><root>x</root>"), "xml");
        assert_eq!(label(b"\xEF\xBB\xBF  <note><to>x</to></note>"), "xml");
        assert_eq!(label(b"<?xml version=\"1.0\"?><svg xmlns=\"\"></svg>"), "svg");
        assert_eq!(label(b"# Title\n\nSome text with a [link](http://x).\n- item\n"), "markdown");
        assert_eq!(label(b"hello   world\n\n\n"), "txt");
    }

    #[test]
    fn nul_bytes_are_binary() {
        assert!(!looks_textual(b"abc\0def"));
        assert!(looks_textual(&[0xFF, 0xFE, b'a', 0x00]));
    }

    #[test]
    fn legacy_encodings_still_text() {
        let (sjis, _, _) = encoding_rs::SHIFT_JIS.encode("こんにちは、世界");
        assert!(looks_textual(&sjis));
    }

    #[test]
    fn single_heading_is_not_markdown() {
        assert!(markdown_score(b"# just a comment line\nplain text\n") < 3);
    }
}
