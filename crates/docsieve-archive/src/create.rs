use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use docsieve_diag::{Diagnostic, Stage};
use walkdir::WalkDir;
use zip::write::{FileOptions, SimpleFileOptions};
use zip::{AesMode, ZipWriter};

use crate::error::{Error, Result};
use crate::options::ArchiveOptions;

/// Zip `paths` into `output`.
///
/// A directory is added recursively with names rooted at the directory's
/// own name; a file is added under its base name. With a password every
/// entry is AES-256 encrypted. Duplicate names are not detected.
pub fn create<P: AsRef<Path>>(
    paths: &[P],
    output: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<()> {
    create_with(paths, output, &ArchiveOptions::default().maybe_password(password))
}

pub fn create_with<P: AsRef<Path>>(
    paths: &[P],
    output: impl AsRef<Path>,
    options: &ArchiveOptions,
) -> Result<()> {
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let output = output.as_ref();
    let mut writer = ZipWriter::new(File::create(output)?);
    // The archive may sit inside a directory being added.
    let own_path = fs::canonicalize(output)?;
    let file_options: FileOptions<'_, ()> = match options.password.as_deref() {
        Some(password) => {
            SimpleFileOptions::default().with_aes_encryption(AesMode::Aes256, password)
        }
        None => SimpleFileOptions::default(),
    };

    let mut added = 0usize;
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let root = fs::canonicalize(path)?;
            let parent = root.parent().unwrap_or(&root).to_path_buf();
            for entry in WalkDir::new(&root).sort_by_file_name() {
                let entry = entry?;
                if !entry.file_type().is_file() || entry.path() == own_path {
                    continue;
                }
                let relative = entry.path().strip_prefix(&parent).unwrap_or(entry.path());
                add_file(&mut writer, entry.path(), &archive_name(relative), file_options)?;
                added += 1;
            }
        } else if fs::canonicalize(path)? != own_path {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| Error::NotFound {
                    path: path.to_path_buf(),
                })?;
            add_file(&mut writer, path, &name, file_options)?;
            added += 1;
        }
    }

    writer.finish()?;
    options.diagnostics.emit(
        Diagnostic::debug(Stage::Archive, format!("wrote {added} entries")).with_path(output),
    );
    Ok(())
}

fn add_file(
    writer: &mut ZipWriter<File>,
    source: &Path,
    name: &str,
    options: FileOptions<'_, ()>,
) -> Result<()> {
    writer.start_file(name, options)?;
    let mut input = File::open(source)?;
    io::copy(&mut input, writer)?;
    Ok(())
}

/// `/`-separated archive name of a relative path.
fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
