//! Zip listing and extraction with legacy name recovery.
//!
//! Both operations read the central directory first, decide once whether
//! the archive declares UTF-8 names, and decode every name under that
//! decision before any entry content is touched.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use docsieve_diag::{Diagnostic, Stage};
use zip::result::ZipError;

use crate::central::read_central_directory;
use crate::detect::detect_from_reader;
use crate::error::{Error, Result};
use crate::names::{ArchiveEntry, ArchiveIndex};
use crate::options::ArchiveOptions;
use crate::sanitize::sanitize_path;

fn open_archive(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}

/// Scan `path` and decode every entry name.
pub fn read_index(path: impl AsRef<Path>, options: &ArchiveOptions) -> Result<ArchiveIndex> {
    let path = path.as_ref();
    let mut file = open_archive(path)?;
    // Without a leading signature, only data prepended to an archive
    // (a self-extracting stub) is accepted.
    let has_signature = detect_from_reader(&mut file)?;
    let records = match read_central_directory(&mut file) {
        Ok(records) => records,
        Err(_) if !has_signature => {
            return Err(Error::Corrupted(format!(
                "'{}' is not a zip archive",
                path.display()
            )));
        }
        Err(e) => return Err(e),
    };

    let index = ArchiveIndex::decode(records, &options.names);
    options.diagnostics.emit(
        Diagnostic::debug(
            Stage::Archive,
            format!(
                "{} entries, utf-8 names: {}",
                index.entries.len(),
                index.declares_utf8
            ),
        )
        .with_path(path),
    );
    Ok(index)
}

/// Decoded entry names of `path`, legacy names read under the host locale.
pub fn list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    list_with(path, &ArchiveOptions::from_locale())
}

pub fn list_with(path: impl AsRef<Path>, options: &ArchiveOptions) -> Result<Vec<String>> {
    Ok(read_index(path, options)?.names())
}

/// Extract `path` into `destination`, legacy names read under the host locale.
pub fn extract(
    path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<()> {
    let options = ArchiveOptions::from_locale().maybe_password(password);
    extract_with(path, destination, &options)
}

/// Write every entry of `path` under `destination` by its decoded name.
///
/// All names are checked against `destination` before the first byte is
/// written.
pub fn extract_with(
    path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ArchiveOptions,
) -> Result<()> {
    let path = path.as_ref();
    let index = read_index(path, options)?;

    let destination = destination.as_ref();
    fs::create_dir_all(destination).map_err(|e| Error::DirectoryCreationFailed {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let base = fs::canonicalize(destination)?;
    for entry in &index.entries {
        sanitize_path(&entry.decoded_name, &base)?;
    }

    let mut archive = zip::ZipArchive::new(open_archive(path)?)?;
    for i in 0..archive.len() {
        let raw_name = archive.by_index_raw(i)?.name_raw().to_vec();
        let entry = index.find(&raw_name).ok_or_else(|| {
            Error::Corrupted(format!("entry {i} missing from central directory"))
        })?;
        let target = sanitize_path(&entry.decoded_name, &base)?.resolved;
        if target == base {
            continue;
        }

        if entry.is_encrypted() && options.password.is_none() {
            return Err(Error::PasswordRequired {
                entry: entry.decoded_name.clone(),
            });
        }
        let opened = match options.password.as_deref() {
            Some(password) if entry.is_encrypted() => {
                archive.by_index_decrypt(i, password.as_bytes())
            }
            _ => archive.by_index(i),
        };
        let mut file = opened.map_err(|e| open_error(e, entry))?;
        if entry.is_dir() || file.is_dir() {
            ensure_directory(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            ensure_directory(parent)?;
        }
        let mut out = File::create(&target).map_err(|e| Error::ExtractionFailed {
            path: target.clone(),
            source: e,
        })?;
        io::copy(&mut file, &mut out).map_err(|e| Error::ExtractionFailed {
            path: target.clone(),
            source: e,
        })?;
    }

    options.diagnostics.emit(
        Diagnostic::debug(
            Stage::Archive,
            format!("extracted {} entries to {}", index.entries.len(), base.display()),
        )
        .with_path(path),
    );
    Ok(())
}

fn open_error(e: ZipError, entry: &ArchiveEntry) -> Error {
    match e {
        ZipError::InvalidPassword => Error::InvalidPassword {
            entry: entry.decoded_name.clone(),
        },
        ZipError::UnsupportedArchive(msg) if msg == ZipError::PASSWORD_REQUIRED => {
            Error::PasswordRequired {
                entry: entry.decoded_name.clone(),
            }
        }
        other => Error::Zip(other),
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
