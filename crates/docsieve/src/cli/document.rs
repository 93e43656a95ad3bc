use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::Session;

#[derive(Args, Clone, Debug)]
pub struct MimeArg {
    /// File to identify
    pub path: PathBuf,
}

impl MimeArg {
    pub fn run(self, _session: &Session) -> Result<Value> {
        Ok(docsieve_detect::get_mime_type(&self.path).map_or(Value::Null, Value::String))
    }
}

#[derive(Args, Clone, Debug)]
pub struct ExtractArg {
    /// Document to extract
    pub path: PathBuf,
}

impl ExtractArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let text = session
            .extractor()
            .extract(&self.path)
            .with_context(|| format!("Failed to extract text from '{}'", self.path.display()))?;
        Ok(Value::String(text))
    }
}

#[derive(Args, Clone, Debug)]
pub struct Base64Arg {
    /// Extension hint for the scratch file, without the dot
    #[arg(long, short)]
    pub ext: Option<String>,

    /// Read the payload from this file
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,

    /// Payload; read from stdin when neither this nor --file is given
    pub data: Option<String>,
}

impl Base64Arg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let payload = match (self.data, self.file) {
            (Some(data), _) => data,
            (None, Some(file)) => std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read payload from '{}'", file.display()))?,
            (None, None) => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read payload from stdin")?;
                buf
            }
        };
        let text = session
            .extractor()
            .extract_base64(Some(&payload), self.ext.as_deref())
            .context("Failed to extract text from base64 payload")?;
        Ok(Value::String(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_and_mime_over_plain_text() {
        let dir = tempfile::Builder::new()
            .prefix("docsieve-test-cli-")
            .tempdir()
            .expect("Failed to create temp dir");
        let path = dir.path().join("note.bin");
        std::fs::write(&path, "first\n\n\nsecond  line\n").unwrap();

        let session = Session::default();
        let mime = MimeArg { path: path.clone() }.run(&session).unwrap();
        assert_eq!(mime, Value::String("text/plain".into()));

        let text = ExtractArg { path }.run(&session).unwrap();
        assert_eq!(text, Value::String("first\nsecond line\n".into()));
    }

    #[test]
    fn mime_of_missing_file_is_null() {
        let session = Session::default();
        let mime = MimeArg {
            path: PathBuf::from("/nonexistent/docsieve/file"),
        }
        .run(&session)
        .unwrap();
        assert_eq!(mime, Value::Null);
    }

    #[test]
    fn base64_argument() {
        let session = Session::default();
        let arg = Base64Arg {
            ext: Some("txt".into()),
            file: None,
            // "hello  there"
            data: Some("aGVsbG8gIHRoZXJl".into()),
        };
        assert_eq!(arg.run(&session).unwrap(), Value::String("hello there".into()));
    }
}
