use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::Session;

#[derive(Args, Clone, Debug)]
pub struct ListArg {
    pub archive: PathBuf,

    /// Encoding of legacy (non-UTF-8) entry names, e.g. `shift_jis`
    #[arg(long)]
    pub name_encoding: Option<String>,
}

impl ListArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let options = session.archive_options(self.name_encoding.as_deref(), None);
        let names = docsieve_archive::list_with(&self.archive, &options)
            .with_context(|| format!("Failed to list '{}'", self.archive.display()))?;
        Ok(Value::from(names))
    }
}

#[derive(Args, Clone, Debug)]
pub struct ExtractArg {
    pub archive: PathBuf,

    /// Destination directory, created if missing
    pub destination: PathBuf,

    #[arg(long, short)]
    pub password: Option<String>,

    /// Encoding of legacy (non-UTF-8) entry names, e.g. `shift_jis`
    #[arg(long)]
    pub name_encoding: Option<String>,
}

impl ExtractArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let options =
            session.archive_options(self.name_encoding.as_deref(), self.password.as_deref());
        docsieve_archive::extract_with(&self.archive, &self.destination, &options).with_context(
            || {
                format!(
                    "Failed to extract '{}' into '{}'",
                    self.archive.display(),
                    self.destination.display()
                )
            },
        )?;
        Ok(Value::String(self.destination.display().to_string()))
    }
}

#[derive(Args, Clone, Debug)]
pub struct CreateArg {
    /// Archive to write
    pub output: PathBuf,

    /// Files and directories to add
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Encrypt every entry with AES-256
    #[arg(long, short)]
    pub password: Option<String>,
}

impl CreateArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let options = session.archive_options(None, self.password.as_deref());
        docsieve_archive::create_with(&self.paths, &self.output, &options)
            .with_context(|| format!("Failed to create '{}'", self.output.display()))?;
        Ok(Value::String(self.output.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_list_extract() {
        let dir = tempfile::Builder::new()
            .prefix("docsieve-test-cli-zip-")
            .tempdir()
            .expect("Failed to create temp dir");
        let input = dir.path().join("a.txt");
        std::fs::write(&input, b"alpha").unwrap();
        let archive = dir.path().join("a.zip");
        let session = Session::default();

        CreateArg {
            output: archive.clone(),
            paths: vec![input],
            password: Some("pw".into()),
        }
        .run(&session)
        .unwrap();

        let names = ListArg {
            archive: archive.clone(),
            name_encoding: None,
        }
        .run(&session)
        .unwrap();
        assert_eq!(names, json!(["a.txt"]));

        let out = dir.path().join("out");
        let missing = ExtractArg {
            archive: archive.clone(),
            destination: out.clone(),
            password: None,
            name_encoding: None,
        }
        .run(&session)
        .unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<docsieve_archive::Error>(),
            Some(docsieve_archive::Error::PasswordRequired { .. })
        ));

        ExtractArg {
            archive,
            destination: out.clone(),
            password: Some("pw".into()),
            name_encoding: None,
        }
        .run(&session)
        .unwrap();
        assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"alpha");
    }
}
