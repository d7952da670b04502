// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JPEG 2000 codestream header access.
//!
//! Only the main header is read: the image geometry needed to describe the
//! essence comes from the SIZ and CAP marker segments. Tile data is never
//! touched.

pub mod parser;

pub use parser::J2kHeaderParser;

use serde::Serialize;

use crate::core::Result;

/// Geometry and capability fields of a codestream main header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageGeometry {
    /// Image width (Xsiz - XOsiz)
    pub width: u32,
    /// Image height (Ysiz - YOsiz)
    pub height: u32,
    /// Reference grid size (Xsiz, Ysiz)
    pub reference_grid: (u32, u32),
    /// Number of components (Csiz)
    pub component_count: usize,
    /// Per-component Ssiz bytes as stored, sign bit included
    pub ssiz: Vec<u8>,
    /// Per-component Ssiz precision field with the sign bit masked off.
    /// The sample precision in bits is this value plus one.
    pub bit_depth: Vec<u8>,
    /// Per-component (XRsiz, YRsiz) subsampling factors
    pub subsampling: Vec<(u8, u8)>,
    /// Pcap word of the CAP marker, zero when absent
    pub capability_flags: u32,
    /// Rsiz profile identifier
    pub profile_id: u16,
}

/// Extracts [`ImageGeometry`] from the bytes of one codestream.
pub trait HeaderParser {
    /// Parse the main header of `codestream`.
    fn parse(&self, codestream: &[u8]) -> Result<ImageGeometry>;
}
