//! Zip archives with path sanitization and legacy name recovery.
//!
//! # Architecture
//!
//! - `central.rs` - Central directory scan (raw names and flags)
//! - `names.rs` - Archive-wide name decoding (UTF-8 or CP437/locale)
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract.rs` - Listing and extraction
//! - `create.rs` - Archive creation, optionally AES-256 encrypted

pub use central::{FLAG_ENCRYPTED, FLAG_UTF8, RawEntry, read_central_directory};
pub use create::{create, create_with};
pub use detect::{detect_from_reader, is_zip_signature};
pub use error::{Error, Result};
pub use extract::{extract, extract_with, list, list_with, read_index};
pub use names::{ArchiveEntry, ArchiveIndex, NameDecoding};
pub use options::ArchiveOptions;
pub use sanitize::{SanitizedPath, sanitize_path};

mod central;
mod create;
mod detect;
mod error;
mod extract;
pub mod names;
pub mod options;
mod sanitize;
