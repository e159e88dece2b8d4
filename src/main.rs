//! `covpkg` prints the statement coverage of every package in a Go coverage
//! profile, e.g. one produced by:
//!
//! ```bash
//! go test -coverprofile cover.out -coverpkg ./... ./...
//! covpkg cover.out
//! ```
//!
//! Only `mode: set` profiles are supported, and only one profile per run.

use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use covpkg_rs::app::{self, Config, MmapProfileReader, OutputFormat};
use tracing_subscriber::{fmt, EnvFilter};

/// Summarize a Go coverage profile per package.
#[derive(Parser, Debug)]
#[command(name = "covpkg", author, version, about, long_about = None)]
struct Args {
    /// Coverage profiles written by `go test -coverprofile`
    #[arg(value_name = "PROFILE")]
    profiles: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "COVPKG_FORMAT")]
    format: OutputFormat,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            profiles: args.profiles,
            format: args.format,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Render into a buffer so a failure never leaves a partial report behind.
    let mut report = Vec::new();
    if let Err(err) = app::run(&args.into(), &MmapProfileReader, &mut report) {
        eprintln!("ERROR: {err}");
        return ExitCode::FAILURE;
    }

    if let Err(err) = io::Write::write_all(&mut io::stdout().lock(), &report) {
        eprintln!("ERROR: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
