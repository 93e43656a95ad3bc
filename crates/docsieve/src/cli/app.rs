use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cli::{document, sheet, zip};

#[derive(Debug, Parser)]
#[command(name = "docsieve", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Config file (default: ./docsieve.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the sniffed MIME type of a file
    #[command(name = "mime")]
    Mime(document::MimeArg),
    /// Print the normalized plain text of a document
    #[command(alias = "x", name = "extract")]
    Extract(document::ExtractArg),
    /// Extract text from a base64 payload (argument or stdin)
    #[command(name = "extract-base64")]
    ExtractBase64(document::Base64Arg),

    // Spreadsheets
    /// List worksheet names
    #[command(name = "sheets")]
    Sheets(sheet::SheetsArg),
    /// Print the rows of one worksheet, or all of them
    #[command(name = "extract-sheet")]
    ExtractSheet(sheet::ExtractSheetArg),
    /// Write a JSON array of rows (file or stdin) into a new workbook
    #[command(name = "export-sheet")]
    ExportSheet(sheet::ExportArg),
    /// Read the first worksheet as JSON rows
    #[command(name = "import-sheet")]
    ImportSheet(sheet::ImportArg),

    /// Zip archives
    #[command(subcommand, name = "zip")]
    Zip(ZipCommands),

    /// Show the effective configuration
    #[command(alias = "cfg", name = "config")]
    Config(ConfigArg),
}

#[derive(Debug, Subcommand)]
pub enum ZipCommands {
    /// List decoded entry names
    #[command(alias = "ls", name = "list")]
    List(zip::ListArg),
    /// Extract every entry under a destination directory
    #[command(alias = "x", name = "extract")]
    Extract(zip::ExtractArg),
    /// Create an archive from files and directories
    #[command(alias = "c", name = "create")]
    Create(zip::CreateArg),
}

#[derive(Args, Clone, Debug)]
pub struct ConfigArg {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        App::command().debug_assert();
    }

    #[test]
    fn parses_nested_zip_command() {
        let app = App::try_parse_from([
            "docsieve", "--format", "json", "zip", "extract", "a.zip", "out", "--password", "pw",
        ])
        .unwrap();
        assert_eq!(app.format, OutputFormat::Json);
        match app.cmd {
            Commands::Zip(ZipCommands::Extract(arg)) => {
                assert_eq!(arg.archive, PathBuf::from("a.zip"));
                assert_eq!(arg.destination, PathBuf::from("out"));
                assert_eq!(arg.password.as_deref(), Some("pw"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let app = App::try_parse_from(["docsieve", "extract", "doc.pdf", "-v"]).unwrap();
        assert!(app.verbose);
        assert_eq!(app.format, OutputFormat::Text);
    }
}
