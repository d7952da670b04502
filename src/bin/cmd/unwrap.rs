// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Unwrap command - a track file back into codestreams.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::common::{format_bytes, parse_size, ProgressBar, Result};
use j2kwrap::container::TrackFileReader;
use j2kwrap::{pipeline, ContainerReader, StreamFormat, UnwrapConfig, UnwrapTarget};

/// Unwrap an MXF track file into codestreams.
#[derive(Args, Clone, Debug)]
pub struct UnwrapCmd {
    /// Input track file
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output directory (j2c) or file (mjc, standard output when omitted)
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_name = "j2c|mjc")]
    format: Option<StreamFormat>,

    /// Largest frame accepted, e.g. 384MiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    buffer_size: Option<usize>,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "FILE.toml")]
    config: Option<PathBuf>,
}

impl UnwrapCmd {
    pub fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => UnwrapConfig::load(path)?,
            None => UnwrapConfig::default(),
        };
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(size) = self.buffer_size {
            anyhow::ensure!(size > 0, "--buffer-size must be at least 1 byte");
            config.buffer_size = size;
        }

        let reader = TrackFileReader::open_for_read(&self.input)?;

        let target = match (config.format, &self.out) {
            (StreamFormat::J2c, Some(dir)) => UnwrapTarget::FileList(dir.clone()),
            (StreamFormat::J2c, None) => {
                anyhow::bail!("j2c output requires --out <DIR>")
            }
            (StreamFormat::Mjc, Some(path)) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                UnwrapTarget::Multiplex(Box::new(BufWriter::new(file)))
            }
            (StreamFormat::Mjc, None) => {
                UnwrapTarget::Multiplex(Box::new(BufWriter::new(io::stdout())) as Box<dyn Write>)
            }
        };

        let progress = ProgressBar::new(Some(reader.frame_count()), "Unwrapping");
        let stats = pipeline::unwrap_with_progress(
            &reader,
            target,
            config.buffer_size,
            |_, _| progress.inc(),
        )
        .with_context(|| format!("unwrapping {}", self.input.display()))?;

        progress.finish_with_message(format!(
            "{} frames, {}",
            stats.frames,
            format_bytes(stats.bytes)
        ));

        eprintln!(
            "Unwrapped {} frames ({}) from {} [{}, {}]",
            stats.frames,
            format_bytes(stats.bytes),
            self.input.display(),
            stats.component_flag,
            stats.edit_rate
        );
        Ok(())
    }
}
