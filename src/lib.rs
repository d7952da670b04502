// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # j2kwrap
//!
//! Wrap JPEG 2000 codestream sequences into MXF track files, and unwrap them
//! back out.
//!
//! The library is organized by stage:
//! - [`sequence`] - codestream sources (file lists, `MJC2` multiplexes,
//!   synthetic frames)
//! - [`codestream`] - main header parsing into an [`ImageGeometry`]
//! - [`metadata`] - colorimetry schemes, profile labels and descriptor
//!   resolution
//! - [`container`] - the MXF track file writer and reader
//! - [`multiplex`] - `MJC2` multiplex and file-list sinks
//! - [`pipeline`] - the wrap and unwrap drivers
//! - [`config`] - TOML run configuration
//!
//! ## Example: Wrapping a directory of codestreams
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use j2kwrap::container::{TrackFileWriter, WriterInfo, WriterOptions};
//! use j2kwrap::sequence::FileListSource;
//! use j2kwrap::{wrap, J2kHeaderParser, WrapOptions};
//!
//! let mut source = FileListSource::from_directory("frames/")?;
//! let stats = wrap(
//!     &mut source,
//!     &J2kHeaderParser::new(),
//!     &WrapOptions::default(),
//!     |descriptor, sub_descriptor, rate| {
//!         TrackFileWriter::open_for_write(
//!             "out.mxf",
//!             &WriterInfo::default(),
//!             descriptor,
//!             sub_descriptor,
//!             rate,
//!             WriterOptions::default(),
//!         )
//!     },
//! )?;
//! println!("{} frames", stats.frames);
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Unwrapping into a multiplex
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use j2kwrap::container::TrackFileReader;
//! use j2kwrap::pipeline::unwrap::DEFAULT_BUFFER_CAPACITY;
//! use j2kwrap::{unwrap, UnwrapTarget};
//!
//! let reader = TrackFileReader::open_for_read("out.mxf")?;
//! let output = std::fs::File::create("out.mjc")?;
//! unwrap(&reader, UnwrapTarget::Multiplex(Box::new(output)), DEFAULT_BUFFER_CAPACITY)?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{ComponentScheme, EditRate, FrameBuffer, Quantization, Result, Ul, WrapError};

// Codestream sources
pub mod sequence;

pub use sequence::{CodestreamSequence, CodestreamSource};

// Header parsing
pub mod codestream;

pub use codestream::{HeaderParser, ImageGeometry, J2kHeaderParser};

// Descriptor resolution
pub mod metadata;

pub use metadata::{ColorimetryRegistry, ColorimetryScheme, DescriptorRecord, ShapeKind};

// Track files
pub mod container;

pub use container::{ContainerReader, ContainerWriter, TrackFileReader, TrackFileWriter};

// Multiplex and file-list output
pub mod multiplex;

// Drivers
pub mod pipeline;

pub use pipeline::{unwrap, wrap, UnwrapStats, UnwrapTarget, WrapOptions, WrapStats};

// Run configuration
pub mod config;

pub use config::{StreamFormat, UnwrapConfig, WrapConfig};
