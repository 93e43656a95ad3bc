use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::Session;

#[derive(Args, Clone, Debug)]
pub struct SheetsArg {
    /// Workbook to inspect
    pub path: PathBuf,
}

impl SheetsArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let names = session
            .extractor()
            .sheet_names(&self.path)
            .with_context(|| format!("Failed to list sheets of '{}'", self.path.display()))?;
        Ok(Value::from(names))
    }
}

#[derive(Args, Clone, Debug)]
pub struct ExtractSheetArg {
    /// Workbook to read
    pub path: PathBuf,

    /// Sheet name; every sheet when omitted
    #[arg(long, short, default_value = "")]
    pub sheet: String,
}

impl ExtractSheetArg {
    pub fn run(self, session: &Session) -> Result<Value> {
        let text = session
            .extractor()
            .extract_sheet(&self.path, &self.sheet)
            .with_context(|| format!("Failed to read sheet from '{}'", self.path.display()))?;
        Ok(Value::String(text))
    }
}

#[derive(Args, Clone, Debug)]
pub struct ExportArg {
    /// Workbook to create
    pub output: PathBuf,

    /// JSON file holding an array of row arrays; stdin when omitted
    #[arg(long, short)]
    pub rows: Option<PathBuf>,
}

impl ExportArg {
    pub fn run(self, _session: &Session) -> Result<Value> {
        let json = match &self.rows {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read rows from '{}'", path.display()))?,
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read rows from stdin")?;
                buf
            }
        };
        let rows: Vec<Vec<Value>> =
            serde_json::from_str(&json).context("Rows must be a JSON array of arrays")?;
        docsieve_extract::export_rows(&self.output, &rows)
            .with_context(|| format!("Failed to write '{}'", self.output.display()))?;
        Ok(Value::String(self.output.display().to_string()))
    }
}

#[derive(Args, Clone, Debug)]
pub struct ImportArg {
    /// Workbook to read
    pub path: PathBuf,
}

impl ImportArg {
    pub fn run(self, _session: &Session) -> Result<Value> {
        let rows = docsieve_extract::import_rows(&self.path)
            .with_context(|| format!("Failed to import rows from '{}'", self.path.display()))?;
        Ok(Value::Array(rows.into_iter().map(Value::Array).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn export_then_import_and_list() {
        let dir = tempfile::Builder::new()
            .prefix("docsieve-test-cli-sheet-")
            .tempdir()
            .expect("Failed to create temp dir");
        let rows = dir.path().join("rows.json");
        std::fs::write(&rows, r#"[["name", "qty"], ["apple", 3]]"#).unwrap();
        let book = dir.path().join("book.xlsx");

        let session = Session::default();
        ExportArg {
            output: book.clone(),
            rows: Some(rows),
        }
        .run(&session)
        .unwrap();

        let names = SheetsArg { path: book.clone() }.run(&session).unwrap();
        assert_eq!(names, json!(["Sheet1"]));

        let imported = ImportArg { path: book }.run(&session).unwrap();
        assert_eq!(imported, json!([["name", "qty"], ["apple", 3.0]]));
    }
}
