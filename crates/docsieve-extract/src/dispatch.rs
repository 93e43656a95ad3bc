use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use docsieve_detect::{
    DocumentKind, Identification, MagicClassifier, MimeClassifier, identify_with,
};
use docsieve_diag::{Diagnostic, Diagnostics, Stage, TracingDiagnostics};
use tempfile::NamedTempFile;

use crate::decoder::DecoderSet;
use crate::sanitize::sanitize;
use crate::{Error, Result};

/// Identifies a file, hands it to the matching decoder and sanitizes the text.
pub struct Extractor {
    classifier: Box<dyn MimeClassifier>,
    decoders: DecoderSet,
    diagnostics: Arc<dyn Diagnostics>,
    scratch_dir: Option<PathBuf>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            classifier: Box::new(MagicClassifier),
            decoders: DecoderSet::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            scratch_dir: None,
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classifier(mut self, classifier: impl MimeClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn decoders(mut self, decoders: DecoderSet) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Directory for materialized base64 payloads; system temp when unset.
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn identify(&self, path: &Path) -> Identification {
        identify_with(path, self.classifier.as_ref(), self.diagnostics.as_ref())
    }

    /// Sanitized text of `path`.
    ///
    /// Unidentifiable and unsupported files yield an empty string. A decoder
    /// failure is returned as [`Error::Decode`].
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let identified = match self.identify(path) {
            Identification::Identified(identified) => identified,
            Identification::Failed { .. } => return Ok(sanitize(None::<&str>)),
        };

        let doc = identified.document_type();
        let kind = doc.kind();
        self.diagnostics.emit(
            Diagnostic::debug(Stage::Dispatch, format!("{} -> {kind:?}", doc.mime_type()))
                .with_path(path),
        );

        let raw = match kind {
            DocumentKind::Text => {
                Some(self.decoders.text.decode(path, doc.mime_type(), identified.encoding))
            }
            DocumentKind::Pdf => Some(self.decoders.pdf.decode(path)),
            DocumentKind::Spreadsheet => Some(self.decoders.spreadsheet.decode(path, None)),
            DocumentKind::Word => Some(self.decoders.word.decode(path)),
            DocumentKind::Presentation => Some(self.decoders.presentation.decode(path)),
            DocumentKind::Unsupported => {
                self.diagnostics.emit(
                    Diagnostic::notice(
                        Stage::Dispatch,
                        format!("unsupported file type: {}", doc.mime_type()),
                    )
                    .with_path(path),
                );
                None
            }
        };

        let raw = raw.transpose().inspect_err(|e| {
            self.diagnostics
                .emit(Diagnostic::error(Stage::Decode, e.to_string()).with_path(path));
        })?;
        Ok(sanitize(raw))
    }

    /// Decode a base64 payload into a scratch file and extract it.
    ///
    /// `extension` becomes the scratch file's suffix. The scratch file is
    /// removed before returning, whatever the outcome.
    pub fn extract_base64(&self, payload: Option<&str>, extension: Option<&str>) -> Result<String> {
        let Some(payload) = payload.filter(|p| !p.is_empty()) else {
            return Ok(String::new());
        };
        let compact: String = payload.split_ascii_whitespace().collect();
        let bytes = STANDARD.decode(compact)?;

        let scratch = self.materialize(&bytes, extension)?;
        let result = self.extract(scratch.path());

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            self.diagnostics.emit(
                Diagnostic::warning(Stage::Materialize, format!("failed to remove scratch file: {e}"))
                    .with_path(&scratch_path),
            );
        }
        result
    }

    fn materialize(&self, bytes: &[u8], extension: Option<&str>) -> Result<NamedTempFile> {
        let suffix = extension
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut builder = tempfile::Builder::new();
        builder.prefix("docsieve-").suffix(&suffix);
        let created = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };

        let mut scratch = created.map_err(|source| Error::TempFile { source })?;
        scratch
            .write_all(bytes)
            .and_then(|()| scratch.flush())
            .map_err(|source| Error::TempFile { source })?;
        self.diagnostics.emit(
            Diagnostic::debug(Stage::Materialize, format!("{} bytes", bytes.len()))
                .with_path(scratch.path()),
        );
        Ok(scratch)
    }

    /// Sheet names of a spreadsheet, in workbook order.
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        self.decoders.spreadsheet.sheet_names(path.as_ref())
    }

    /// Sanitized text of one sheet, or of all sheets when `sheet` is empty.
    pub fn extract_sheet(&self, path: impl AsRef<Path>, sheet: &str) -> Result<String> {
        let raw = self.decoders.spreadsheet.decode(path.as_ref(), Some(sheet))?;
        Ok(sanitize(Some(raw)))
    }
}
