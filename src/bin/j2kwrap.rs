// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # j2kwrap CLI
//!
//! Wrap JPEG 2000 codestreams into MXF track files and back.
//!
//! ## Usage
//!
//! ```sh
//! # Wrap a directory of codestreams
//! j2kwrap wrap --in frames/ --out track.mxf --components ycbcr --quantization partial
//!
//! # Wrap a multiplex from standard input, keeping its edit rate
//! j2kwrap wrap --format mjc --out track.mxf < input.mjc
//!
//! # Unwrap into a multiplex on standard output
//! j2kwrap unwrap --in track.mxf --format mjc > output.mjc
//!
//! # Show the descriptor
//! j2kwrap inspect track.mxf
//! ```
//!
//! Log output goes to standard error and is controlled by `RUST_LOG`
//! (default `warn`).

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{InspectCmd, UnwrapCmd, WrapCmd};
use common::Result;
use j2kwrap::WrapError;
use tracing_subscriber::EnvFilter;

/// j2kwrap - JPEG 2000 track file wrapper
#[derive(Parser, Clone)]
#[command(name = "j2kwrap")]
#[command(about = "Wrap JPEG 2000 codestreams into MXF track files and back", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Wrap codestreams (files, a directory, a multiplex, or synthetic) into a track file
    Wrap(WrapCmd),

    /// Unwrap a track file into codestream files or a multiplex
    Unwrap(UnwrapCmd),

    /// Show track file information
    Inspect(InspectCmd),
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Wrap(cmd) => cmd.run(),
        Commands::Unwrap(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported as errors that go to stdout
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging();

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<WrapError>() {
            let fields: Vec<String> = err
                .log_fields()
                .into_iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            tracing::debug!(kind = err.kind(), fields = %fields.join(" "), "Run failed");
        }
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
