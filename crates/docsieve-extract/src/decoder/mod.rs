//! Per-format decoders behind small traits so the dispatcher can be tested
//! against stand-ins.

use std::path::Path;

use docsieve_detect::EncodingGuess;

use crate::Result;

pub mod docx;
pub mod ooxml;
pub mod pdf;
pub mod pptx;
pub mod sheet;
pub mod text;

pub use docx::ParagraphDecoder;
pub use pdf::PdfDecoder;
pub use pptx::ShapeTextDecoder;
pub use sheet::CalamineDecoder;
pub use text::MarkupTextDecoder;

/// Turns a whole document into raw text.
pub trait DocumentDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<String>;
}

/// Text decoder that also receives the sniffed subtype and charset guess.
pub trait TextDecoder: Send + Sync {
    fn decode(&self, path: &Path, mime_type: &str, encoding: Option<EncodingGuess>)
    -> Result<String>;
}

pub trait SpreadsheetDecoder: Send + Sync {
    /// `None` or an empty name reads every sheet.
    fn decode(&self, path: &Path, sheet: Option<&str>) -> Result<String>;

    fn sheet_names(&self, path: &Path) -> Result<Vec<String>>;
}

/// One decoder per document family.
pub struct DecoderSet {
    pub text: Box<dyn TextDecoder>,
    pub pdf: Box<dyn DocumentDecoder>,
    pub spreadsheet: Box<dyn SpreadsheetDecoder>,
    pub word: Box<dyn DocumentDecoder>,
    pub presentation: Box<dyn DocumentDecoder>,
}

impl Default for DecoderSet {
    fn default() -> Self {
        Self {
            text: Box::new(MarkupTextDecoder),
            pdf: Box::new(PdfDecoder),
            spreadsheet: Box::new(CalamineDecoder),
            word: Box::new(ParagraphDecoder),
            presentation: Box::new(ShapeTextDecoder),
        }
    }
}
