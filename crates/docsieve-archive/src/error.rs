use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no such file or directory: '{path}'")]
    NotFound { path: PathBuf },

    #[error("archive is corrupted: {0}")]
    Corrupted(String),

    #[error("entry '{entry}' is encrypted and no password was given")]
    PasswordRequired { entry: String },

    #[error("invalid password for entry '{entry}'")]
    InvalidPassword { entry: String },

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: String, resolved: PathBuf },

    #[error("entry path contains null byte: '{entry}'")]
    InvalidPath { entry: String },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
