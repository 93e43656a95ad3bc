use std::path::Path;

use docsieve_diag::{Diagnostic, Diagnostics, Stage, TracingDiagnostics};

use crate::classify::{Classification, MagicClassifier, MimeClassifier, read_head};
use crate::document::DocumentType;
use crate::encoding::{ENCODING_PROBE_LEN, EncodingGuess, detect_encoding};

/// Outcome of sniffing a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identification {
    Identified(Identified),
    /// The file could not be classified. Never an error for the caller.
    Failed { reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identified {
    pub classification: Classification,
    /// Present only for textual content with a non-empty head.
    pub encoding: Option<EncodingGuess>,
}

impl Identified {
    pub fn mime_type(&self) -> &str {
        &self.classification.mime_type
    }

    pub fn document_type(&self) -> DocumentType {
        DocumentType::new(self.classification.mime_type.as_str())
    }
}

impl Identification {
    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Identified(i) => Some(i.mime_type()),
            Self::Failed { .. } => None,
        }
    }

    pub fn encoding(&self) -> Option<EncodingGuess> {
        match self {
            Self::Identified(i) => i.encoding,
            Self::Failed { .. } => None,
        }
    }
}

/// Identify `path` with the bundled classifier, logging through `tracing`.
pub fn identify(path: impl AsRef<Path>) -> Identification {
    identify_with(path.as_ref(), &MagicClassifier, &TracingDiagnostics)
}

/// Classify `path` once and, for textual content, guess its encoding.
pub fn identify_with(
    path: &Path,
    classifier: &dyn MimeClassifier,
    diag: &dyn Diagnostics,
) -> Identification {
    let classification = match classifier.classify(path) {
        Ok(c) => c,
        Err(e) => {
            diag.emit(
                Diagnostic::warning(Stage::Identification, format!("identification failed: {e}"))
                    .with_path(path),
            );
            return Identification::Failed {
                reason: e.to_string(),
            };
        }
    };
    diag.emit(
        Diagnostic::debug(
            Stage::Identification,
            format!("{} ({})", classification.mime_type, classification.label),
        )
        .with_path(path),
    );

    let encoding = if classification.is_text {
        match read_head(path, ENCODING_PROBE_LEN) {
            Ok(head) => {
                let guess = detect_encoding(&head);
                diag.emit(
                    Diagnostic::debug(
                        Stage::EncodingDetection,
                        match guess {
                            Some(g) => format!("guessed {g}"),
                            None => "no guess".to_owned(),
                        },
                    )
                    .with_path(path),
                );
                guess
            }
            Err(e) => {
                diag.emit(
                    Diagnostic::warning(Stage::EncodingDetection, e.to_string()).with_path(path),
                );
                None
            }
        }
    } else {
        None
    };

    Identification::Identified(Identified {
        classification,
        encoding,
    })
}

/// The sniffed MIME type of `path`, if it can be classified.
pub fn get_mime_type(path: impl AsRef<Path>) -> Option<String> {
    identify(path).mime_type().map(str::to_owned)
}
