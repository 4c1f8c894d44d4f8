//! `json-nav`: inspect and edit a JSON document from the command line.
//!
//! Usage:
//!   json-nav [--file <doc.json>] [--config <json-nav.toml>] [--compact] <command> ...
//!
//! The document is read from `--file`, or from stdin when no file is given.
//! Mutating commands print the resulting document; nothing is written back.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use json_nav::cli::{run, Command};
use json_nav::{EditorConfig, Error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-nav")]
#[command(about = "Path-addressed reads, edits and search over a JSON document")]
#[command(version)]
struct Cli {
    /// Document to read instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Editor configuration (TOML)
    #[arg(short, long, env = "JSON_NAV_CONFIG")]
    config: Option<PathBuf>,

    /// Print documents on a single line
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("json_nav=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{output}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<String, Error> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    if cli.compact {
        config.pretty = false;
    }

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    tracing::debug!(command = ?cli.command, "running");
    run(&cli.command, input.trim(), &config)
}
