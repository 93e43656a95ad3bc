use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Session;
use crate::cli::app::{App, Commands, ZipCommands};
use crate::config::Config;

mod cli;
mod config;
mod output;

fn main() -> ExitCode {
    let app = App::parse();
    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> Result<()> {
    if let Some(path) = &app.config {
        if !path.is_file() {
            bail!("config file '{}' does not exist", path.display());
        }
    }
    let config = Config::load(app.config.as_deref())?;
    init_logging(app.verbose, &config.log.level);
    debug!(?config, "configuration loaded");

    let session = Session::new(config);
    let value = dispatch(app.cmd, &session)?;
    let rendered = output::render(app.format, &value)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

fn dispatch(cmd: Commands, session: &Session) -> Result<Value> {
    match cmd {
        Commands::Mime(arg) => arg.run(session),
        Commands::Extract(arg) => arg.run(session),
        Commands::ExtractBase64(arg) => arg.run(session),
        Commands::Sheets(arg) => arg.run(session),
        Commands::ExtractSheet(arg) => arg.run(session),
        Commands::ExportSheet(arg) => arg.run(session),
        Commands::ImportSheet(arg) => arg.run(session),
        Commands::Zip(ZipCommands::List(arg)) => arg.run(session),
        Commands::Zip(ZipCommands::Extract(arg)) => arg.run(session),
        Commands::Zip(ZipCommands::Create(arg)) => arg.run(session),
        Commands::Config(_) => Ok(Value::String(session.config.to_toml()?)),
    }
}

/// `--verbose` wins, then `RUST_LOG`, then the configured level. Logs go to
/// stderr so stdout carries only command output.
fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
