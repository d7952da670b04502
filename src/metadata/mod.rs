// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Metadata resolution.
//!
//! Turns codestream geometry and user options into the labels and numeric
//! fields of the picture essence descriptor:
//! - [`colorimetry`] - named colorimetry triples
//! - [`profile`] - picture essence coding label from Rsiz and Pcap
//! - [`descriptor`] - the complete [`DescriptorRecord`]

pub mod colorimetry;
pub mod descriptor;
pub mod profile;

pub use colorimetry::{ColorimetryRegistry, ColorimetryScheme};
pub use descriptor::{build as build_descriptor, CdciFields, DescriptorRecord, ShapeKind};
pub use profile::{ProfileLabelEntry, HT_CAPABILITY_FLAG};
