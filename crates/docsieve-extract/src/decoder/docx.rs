use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::DocumentDecoder;
use super::ooxml::{ElementPath, read_part, text_of};
use crate::{Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

const DOCUMENT: &[u8] = b"document";
const BODY: &[u8] = b"body";
const P: &[u8] = b"p";
const R: &[u8] = b"r";
const T: &[u8] = b"t";
const HYPERLINK: &[u8] = b"hyperlink";
const TAB: &[u8] = b"tab";
const BR: &[u8] = b"br";
const CR: &[u8] = b"cr";

/// Word-processing documents: one line per body paragraph.
///
/// Paragraphs nested in tables or text boxes are not body paragraphs and
/// are skipped. Run text is concatenated; tabs and breaks become `\t`
/// and `\n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParagraphDecoder;

impl DocumentDecoder for ParagraphDecoder {
    fn decode(&self, path: &Path) -> Result<String> {
        let xml = read_part(path, DOCUMENT_PART, "docx")?;
        paragraphs(&xml).map_err(|e| Error::decode(path, "docx", e))
    }
}

fn in_run(path: &ElementPath) -> bool {
    path.is(&[DOCUMENT, BODY, P, R]) || path.is(&[DOCUMENT, BODY, P, HYPERLINK, R])
}

fn in_run_text(path: &ElementPath) -> bool {
    path.is(&[DOCUMENT, BODY, P, R, T]) || path.is(&[DOCUMENT, BODY, P, HYPERLINK, R, T])
}

pub(crate) fn paragraphs(xml: &str) -> quick_xml::Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut path = ElementPath::default();
    let mut out = String::new();
    let mut paragraph = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                if path.is(&[DOCUMENT, BODY]) && name.as_ref() == P {
                    paragraph.clear();
                }
                path.push(name.as_ref());
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if in_run(&path) {
                    match name.as_ref() {
                        TAB => paragraph.push('\t'),
                        BR | CR => paragraph.push('\n'),
                        _ => {}
                    }
                } else if path.is(&[DOCUMENT, BODY]) && name.as_ref() == P {
                    out.push('\n');
                }
            }
            Event::Text(e) if in_run_text(&path) => paragraph.push_str(&text_of(&e)),
            Event::End(_) => {
                if path.is(&[DOCUMENT, BODY, P]) {
                    out.push_str(&paragraph);
                    out.push('\n');
                    paragraph.clear();
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    #[test]
    fn one_line_per_paragraph() {
        let xml = doc(
            "<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space=\"preserve\"> world</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>second</w:t></w:r></w:p>",
        );
        assert_eq!(paragraphs(&xml).unwrap(), "Hello world\n\nsecond\n");
    }

    #[test]
    fn tabs_breaks_and_links() {
        let xml = doc(
            "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r>\
             <w:hyperlink><w:r><w:t>&amp;link</w:t></w:r></w:hyperlink></w:p>",
        );
        assert_eq!(paragraphs(&xml).unwrap(), "a\tb\nc&link\n");
    }

    #[test]
    fn table_paragraphs_are_not_body_paragraphs() {
        let xml = doc(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>body</w:t></w:r></w:p>",
        );
        assert_eq!(paragraphs(&xml).unwrap(), "body\n");
    }

    #[test]
    fn paragraph_properties_carry_no_text() {
        let xml = doc("<w:p><w:pPr><w:pStyle w:val=\"Title\"/></w:pPr><w:r><w:t>T</w:t></w:r></w:p>");
        assert_eq!(paragraphs(&xml).unwrap(), "T\n");
    }
}
