use std::fs;
use std::path::Path;

use docsieve_detect::{EncodingGuess, mime};
use encoding_rs::UTF_8;
use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::Html;

use super::TextDecoder;
use super::ooxml::text_of;
use crate::{Error, Result};

/// Text family decoder: strips HTML/XML markup, renders Markdown first,
/// and reads every other subtype verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupTextDecoder;

impl TextDecoder for MarkupTextDecoder {
    fn decode(
        &self,
        path: &Path,
        mime_type: &str,
        encoding: Option<EncodingGuess>,
    ) -> Result<String> {
        let text = read_text(path, encoding)?;
        match mime_type {
            mime::TEXT_HTML => Ok(html_text(&text)),
            mime::TEXT_XML => xml_text(&text).map_err(|e| Error::decode(path, "xml", e)),
            mime::TEXT_MARKDOWN => Ok(markdown_text(&text)),
            _ => Ok(text),
        }
    }
}

/// Read `path` under `encoding`, or UTF-8 when there is no guess.
///
/// A byte order mark overrides the guess. Malformed sequences become U+FFFD.
pub fn read_text(path: &Path, encoding: Option<EncodingGuess>) -> Result<String> {
    let bytes = fs::read(path)?;
    let encoding = encoding.map_or(UTF_8, EncodingGuess::encoding);
    let (text, _, _) = encoding.decode(&bytes);
    Ok(text.into_owned())
}

pub fn html_text(html: &str) -> String {
    Html::parse_document(html).root_element().text().collect()
}

pub fn xml_text(xml: &str) -> quick_xml::Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = false;
    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => out.push_str(&text_of(&e)),
            Event::CData(e) => out.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

pub fn markdown_text(markdown: &str) -> String {
    let parser = pulldown_cmark::Parser::new(markdown);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    Html::parse_fragment(&html).root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_drops_tags_and_comments() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head>\
                    <body><h1>Head</h1><!-- hidden --><p>a &amp; <b>b</b></p></body></html>";
        assert_eq!(html_text(html), "THeada & b");
    }

    #[test]
    fn xml_keeps_text_and_cdata() {
        let xml = "<?xml version=\"1.0\"?><root><a>one</a>\n<b><![CDATA[<two>]]></b></root>";
        assert_eq!(xml_text(xml).unwrap(), "one\n<two>");
    }

    #[test]
    fn xml_tolerates_mismatched_end_tags() {
        assert_eq!(xml_text("<a><b>x</a></b>").unwrap(), "x");
    }

    #[test]
    fn markdown_is_rendered_then_stripped() {
        let text = markdown_text("# Title\n\nSome *emphasis* and a [link](http://x).\n");
        assert_eq!(text, "Title\nSome emphasis and a link.\n");
    }
}
