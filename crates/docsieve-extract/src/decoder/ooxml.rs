use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::BytesText;

use crate::{Error, Result};

/// Read one XML part out of an OOXML package.
pub fn read_part(path: &Path, part: &str, format: &'static str) -> Result<String> {
    let mut archive = open_package(path, format)?;
    let mut entry = archive
        .by_name(part)
        .map_err(|e| Error::decode(path, format, format!("{part}: {e}")))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| Error::decode(path, format, format!("{part}: {e}")))?;
    Ok(xml)
}

pub fn open_package(path: &Path, format: &'static str) -> Result<zip::ZipArchive<File>> {
    let file = File::open(path)?;
    zip::ZipArchive::new(file).map_err(|e| Error::decode(path, format, e))
}

/// Local names of the currently open elements, outermost first.
#[derive(Debug, Default)]
pub struct ElementPath {
    names: Vec<Vec<u8>>,
}

impl ElementPath {
    pub fn push(&mut self, local_name: &[u8]) {
        self.names.push(local_name.to_vec());
    }

    pub fn pop(&mut self) {
        self.names.pop();
    }

    /// True when the open elements are exactly `expected`.
    pub fn is(&self, expected: &[&[u8]]) -> bool {
        self.names.len() == expected.len()
            && self.names.iter().zip(expected).all(|(a, b)| a == b)
    }
}

/// Unescaped text, falling back to the raw bytes on an unknown entity.
pub fn text_of(event: &BytesText<'_>) -> String {
    match event.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(event).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_path_matching() {
        const DOC: &[u8] = b"document";
        const BODY: &[u8] = b"body";
        const P: &[u8] = b"p";

        let mut path = ElementPath::default();
        for name in [DOC, BODY, P] {
            path.push(name);
        }
        assert!(path.is(&[DOC, BODY, P]));
        assert!(!path.is(&[DOC, BODY]));

        path.pop();
        assert!(path.is(&[DOC, BODY]));
    }

    #[test]
    fn text_unescapes_entities() {
        let raw = BytesText::from_escaped("a &amp; b");
        assert_eq!(text_of(&raw), "a & b");

        let unknown = BytesText::from_escaped("x &nbsp; y");
        assert_eq!(text_of(&unknown), "x &nbsp; y");
    }
}
