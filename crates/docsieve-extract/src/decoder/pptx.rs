use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::DocumentDecoder;
use super::ooxml::{ElementPath, open_package, text_of};
use crate::{Error, Result};

const FORMAT: &str = "pptx";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

const SLD: &[u8] = b"sld";
const C_SLD: &[u8] = b"cSld";
const SP_TREE: &[u8] = b"spTree";
const SP: &[u8] = b"sp";
const TX_BODY: &[u8] = b"txBody";
const P: &[u8] = b"p";
const R: &[u8] = b"r";
const FLD: &[u8] = b"fld";
const T: &[u8] = b"t";
const BR: &[u8] = b"br";

/// Presentations: every top-level text shape on every slide, one line each.
///
/// Slides follow the deck order in `presentation.xml`. A shape's
/// paragraphs are joined with `\n` and line breaks inside a paragraph
/// become `\x0b`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeTextDecoder;

impl DocumentDecoder for ShapeTextDecoder {
    fn decode(&self, path: &Path) -> Result<String> {
        let mut package = open_package(path, FORMAT)?;
        let mut out = String::new();
        for part in slide_parts(&mut package, path)? {
            let xml = read_entry(&mut package, &part)
                .map_err(|e| Error::decode(path, FORMAT, format!("{part}: {e}")))?;
            let text = shape_text(&xml).map_err(|e| Error::decode(path, FORMAT, e))?;
            out.push_str(&text);
        }
        Ok(out)
    }
}

fn read_entry(package: &mut zip::ZipArchive<File>, part: &str) -> std::io::Result<String> {
    let mut entry = package.by_name(part)?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

fn slide_parts(package: &mut zip::ZipArchive<File>, path: &Path) -> Result<Vec<String>> {
    let ordered = match (
        read_entry(package, PRESENTATION_PART),
        read_entry(package, PRESENTATION_RELS),
    ) {
        (Ok(presentation), Ok(rels)) => {
            let targets = relationship_targets(&rels).map_err(|e| Error::decode(path, FORMAT, e))?;
            slide_ids(&presentation)
                .map_err(|e| Error::decode(path, FORMAT, e))?
                .iter()
                .filter_map(|id| targets.get(id))
                .map(|target| resolve_target(target))
                .collect()
        }
        _ => Vec::new(),
    };
    if !ordered.is_empty() {
        return Ok(ordered);
    }

    let mut numbered: Vec<(u32, String)> = package
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_owned())))
        .collect();
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, name)| name).collect())
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_owned(),
        None => format!("ppt/{target}"),
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn relationship_targets(rels: &str) -> quick_xml::Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels);
    let mut targets = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id"), attribute(&e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Relationship ids of `p:sldId` entries, in deck order.
fn slide_ids(presentation: &str) -> quick_xml::Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation);
    let mut ids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                let rel = e.attributes().flatten().find(|a| {
                    a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id"
                });
                if let Some(Ok(value)) = rel.map(|a| a.unescape_value().map(|v| v.into_owned())) {
                    ids.push(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}

fn in_paragraph(path: &ElementPath) -> bool {
    path.is(&[SLD, C_SLD, SP_TREE, SP, TX_BODY, P])
}

fn in_text_run(path: &ElementPath) -> bool {
    path.is(&[SLD, C_SLD, SP_TREE, SP, TX_BODY, P, R, T])
        || path.is(&[SLD, C_SLD, SP_TREE, SP, TX_BODY, P, FLD, T])
}

pub(crate) fn shape_text(xml: &str) -> quick_xml::Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut path = ElementPath::default();
    let mut out = String::new();
    let mut shape: Option<Vec<String>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(e.local_name().as_ref());
                if path.is(&[SLD, C_SLD, SP_TREE, SP]) {
                    shape = Some(Vec::new());
                } else if in_paragraph(&path) {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if path.is(&[SLD, C_SLD, SP_TREE]) && name.as_ref() == SP {
                    out.push('\n');
                } else if path.is(&[SLD, C_SLD, SP_TREE, SP, TX_BODY]) && name.as_ref() == P {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                } else if in_paragraph(&path) && name.as_ref() == BR {
                    if let Some(last) = shape.as_mut().and_then(|p| p.last_mut()) {
                        last.push('\u{b}');
                    }
                }
            }
            Event::Text(e) if in_text_run(&path) => {
                if let Some(last) = shape.as_mut().and_then(|p| p.last_mut()) {
                    last.push_str(&text_of(&e));
                }
            }
            Event::End(_) => {
                if path.is(&[SLD, C_SLD, SP_TREE, SP]) {
                    if let Some(paragraphs) = shape.take() {
                        out.push_str(&paragraphs.join("\n"));
                        out.push('\n');
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}
