//! Content-based document identification.
//!
//! # Architecture
//!
//! - `classify.rs` - Signature and heuristic MIME sniffing
//! - `encoding.rs` - Statistical charset guess over a file head
//! - `identify.rs` - One classification plus encoding guess per file
//! - `document.rs` - MIME predicates and the decoder family enum

pub use classify::{Classification, MagicClassifier, MimeClassifier, SNIFF_LEN, read_head};
pub use document::{DocumentKind, DocumentType, mime};
pub use encoding::{ENCODING_PROBE_LEN, EncodingGuess, detect_encoding};
pub use error::{Error, Result};
pub use identify::{Identification, Identified, get_mime_type, identify, identify_with};

mod classify;
mod document;
mod encoding;
mod error;
mod identify;
