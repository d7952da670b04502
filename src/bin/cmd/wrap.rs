// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wrap command - codestreams into a track file.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use tracing::info;
use uuid::Uuid;

use crate::common::{format_bytes, parse_size, ProgressBar, Result};
use j2kwrap::container::{IndexStrategy, TrackFileWriter};
use j2kwrap::sequence::{FileListSource, MultiplexedContainerSource, SyntheticSource};
use j2kwrap::{
    pipeline, CodestreamSource, ComponentScheme, EditRate, J2kHeaderParser, Quantization,
    StreamFormat, WrapConfig,
};

/// Wrap a codestream sequence into an MXF track file.
#[derive(Args, Clone, Debug)]
pub struct WrapCmd {
    /// Output track file
    #[arg(short, long, value_name = "FILE")]
    out: PathBuf,

    /// Input codestream files, a directory of codestreams, or a multiplex
    /// (standard input when omitted)
    #[arg(short = 'i', long = "in", value_name = "PATH")]
    inputs: Vec<PathBuf>,

    /// Input format
    #[arg(short, long, value_name = "j2c|mjc")]
    format: Option<StreamFormat>,

    /// Edit rate as N/D (defaults to the multiplex header rate, or 24/1)
    #[arg(long, value_name = "N/D")]
    fps: Option<EditRate>,

    /// Wrap synthetic codestreams instead of reading input
    #[arg(long)]
    fake: bool,

    /// Number of synthetic codestreams
    #[arg(long, value_name = "N")]
    fake_frames: Option<u32>,

    /// Size of each synthetic codestream, e.g. 5MiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    fake_frame_size: Option<usize>,

    /// Colorimetry scheme (Color1..Color7, CinemaMezzanine)
    #[arg(long, value_name = "NAME")]
    colorimetry: Option<String>,

    /// Component scheme
    #[arg(long, value_name = "rgb|ycbcr|xyz")]
    components: Option<ComponentScheme>,

    /// Quantization range
    #[arg(long, value_name = "partial|full")]
    quantization: Option<Quantization>,

    /// Asset UUID as 32 hex digits (random when omitted)
    #[arg(long, value_name = "HEX")]
    assetid: Option<Uuid>,

    /// Index segment placement
    #[arg(long, value_name = "follow|footer")]
    index_strategy: Option<IndexStrategy>,

    /// Frames per index segment
    #[arg(long, value_name = "N")]
    index_interval: Option<u32>,

    /// TOML file with defaults for any of the options above
    #[arg(long, value_name = "FILE.toml")]
    config: Option<PathBuf>,
}

impl WrapCmd {
    pub fn run(self) -> Result<()> {
        let config = self.resolve_config()?;
        let mut source = open_source(&config, &self.inputs)?;

        let options = config.wrap_options(source.edit_rate_hint());
        let writer_options = config.writer_options();
        let writer_info = config.writer_info();

        info!(
            source = source.kind(),
            out = %self.out.display(),
            asset = %writer_info.asset_uuid,
            "Wrapping"
        );

        let progress = ProgressBar::new(source.frame_count_hint(), "Wrapping");
        let out = self.out.clone();
        let stats = pipeline::wrap_with_progress(
            &mut source,
            &J2kHeaderParser::new(),
            &options,
            |descriptor, sub_descriptor, edit_rate| {
                TrackFileWriter::open_for_write(
                    &out,
                    &writer_info,
                    descriptor,
                    sub_descriptor,
                    edit_rate,
                    writer_options,
                )
            },
            |_, _| progress.inc(),
        )
        .with_context(|| format!("wrapping into {}", self.out.display()))?;

        progress.finish_with_message(format!(
            "{} frames, {}",
            stats.frames,
            format_bytes(stats.bytes)
        ));

        eprintln!(
            "Wrapped {} frames ({}) into {} [{} descriptor, {}]",
            stats.frames,
            format_bytes(stats.bytes),
            self.out.display(),
            stats.descriptor.shape,
            options.edit_rate
        );
        Ok(())
    }

    /// File configuration, or defaults, with command-line flags applied.
    fn resolve_config(&self) -> Result<WrapConfig> {
        let mut config = match &self.config {
            Some(path) => WrapConfig::load(path)?,
            None => WrapConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format;
        }
        if self.fps.is_some() {
            config.fps = self.fps;
        }
        if self.fake {
            config.fake = true;
        }
        if let Some(frames) = self.fake_frames {
            config.fake_frames = frames;
        }
        if let Some(size) = self.fake_frame_size {
            config.fake_frame_size = size;
        }
        if let Some(name) = &self.colorimetry {
            config.colorimetry = name.clone();
        }
        if let Some(components) = self.components {
            config.components = components;
        }
        if let Some(quantization) = self.quantization {
            config.quantization = quantization;
        }
        if self.assetid.is_some() {
            config.asset_id = self.assetid;
        }
        if let Some(strategy) = self.index_strategy {
            config.index_strategy = strategy;
        }
        if let Some(interval) = self.index_interval {
            config.index_interval = interval;
        }

        config.validate()?;
        Ok(config)
    }
}

fn open_source(config: &WrapConfig, inputs: &[PathBuf]) -> Result<CodestreamSource> {
    if config.fake {
        return Ok(SyntheticSource::new(config.fake_frames, config.fake_frame_size).into());
    }

    match config.format {
        StreamFormat::Mjc => {
            let reader: Box<dyn Read> = match inputs {
                [] => Box::new(io::stdin().lock()),
                [path] => Box::new(BufReader::new(
                    File::open(path).with_context(|| format!("opening {}", path.display()))?,
                )),
                _ => anyhow::bail!("mjc input takes a single file, got {}", inputs.len()),
            };
            Ok(MultiplexedContainerSource::new(reader)?.into())
        }
        StreamFormat::J2c => {
            let source = match inputs {
                [] => FileListSource::from_reader(io::stdin().lock())?,
                [path] if path.is_dir() => FileListSource::from_directory(path)?,
                paths => FileListSource::from_paths(paths.iter().cloned())?,
            };
            Ok(source.into())
        }
    }
}
