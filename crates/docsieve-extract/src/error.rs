use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode {format} document '{path}': {message}")]
    Decode {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("failed to materialize temporary file: {source}")]
    TempFile { source: io::Error },

    #[error("sheet '{sheet}' not found in '{path}'")]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("failed to write spreadsheet '{path}': {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn decode(path: &Path, format: &'static str, message: impl Display) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn spreadsheet(path: &Path, message: impl Display) -> Self {
        Self::Spreadsheet {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
