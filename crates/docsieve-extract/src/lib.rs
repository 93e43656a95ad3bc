//! Plain-text extraction over content-sniffed documents.
//!
//! # Architecture
//!
//! - `dispatch.rs` - Identification, decoder selection, base64 scratch files
//! - `decoder/` - One decoder per document family
//! - `sanitize.rs` - Whitespace-run normalization
//! - `workbook.rs` - Spreadsheet row export and import

use std::path::Path;

pub use decoder::{DecoderSet, DocumentDecoder, SpreadsheetDecoder, TextDecoder};
pub use dispatch::Extractor;
pub use error::{Error, Result};
pub use sanitize::sanitize;
pub use workbook::{EXPORT_SHEET_NAME, export_rows, import_rows};

pub mod decoder;
mod dispatch;
mod error;
mod sanitize;
mod workbook;

/// [`Extractor::extract`] with the bundled classifier and decoders.
pub fn extract_text_from_file(path: impl AsRef<Path>) -> Result<String> {
    Extractor::default().extract(path)
}

/// [`Extractor::extract_base64`] with the bundled classifier and decoders.
pub fn extract_base64_to_text(extension: Option<&str>, data: Option<&str>) -> Result<String> {
    Extractor::default().extract_base64(data, extension)
}

pub fn sheet_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    Extractor::default().sheet_names(path)
}

pub fn extract_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<String> {
    Extractor::default().extract_sheet(path, sheet)
}
