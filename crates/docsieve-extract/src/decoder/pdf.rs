use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::DocumentDecoder;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct PdfDecoder;

impl DocumentDecoder for PdfDecoder {
    fn decode(&self, path: &Path) -> Result<String> {
        // pdf-extract panics on some malformed object streams.
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(Error::decode(path, "pdf", e)),
            Err(_) => Err(Error::decode(path, "pdf", "parser panicked")),
        }
    }
}
