use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("classifier failed on '{path}': {message}")]
    Classifier { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
