// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Main header parser.
//!
//! Walks the marker segments after SOC, decoding SIZ and CAP, and stops at
//! the first SOT, SOD or EOC marker.

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use super::{HeaderParser, ImageGeometry};
use crate::core::{Result, WrapError};

/// Start of codestream.
pub const MARKER_SOC: u16 = 0xFF4F;
/// Image and tile size.
pub const MARKER_SIZ: u16 = 0xFF51;
/// Extended capabilities.
pub const MARKER_CAP: u16 = 0xFF50;
/// Start of tile-part.
pub const MARKER_SOT: u16 = 0xFF90;
/// Start of data.
pub const MARKER_SOD: u16 = 0xFF93;
/// End of codestream.
pub const MARKER_EOC: u16 = 0xFFD9;

/// Fixed part of the SIZ segment after the length field.
const SIZ_FIXED_LEN: usize = 36;

/// Parser for raw JPEG 2000 codestreams (not JP2 files).
#[derive(Debug, Default, Clone, Copy)]
pub struct J2kHeaderParser;

impl J2kHeaderParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl HeaderParser for J2kHeaderParser {
    fn parse(&self, data: &[u8]) -> Result<ImageGeometry> {
        if data.len() < 2 || BigEndian::read_u16(&data[0..2]) != MARKER_SOC {
            return Err(WrapError::malformed_codestream("missing SOC marker"));
        }

        let mut geometry: Option<ImageGeometry> = None;
        let mut capability_flags = 0u32;
        let mut pos = 2;

        while pos + 2 <= data.len() {
            let marker = BigEndian::read_u16(&data[pos..pos + 2]);
            if matches!(marker, MARKER_SOT | MARKER_SOD | MARKER_EOC) {
                break;
            }
            if marker >> 8 != 0xFF {
                return Err(WrapError::malformed_codestream(format!(
                    "expected a marker at offset {pos}, found 0x{marker:04x}"
                )));
            }
            pos += 2;

            // Markers 0xFF30..=0xFF3F carry no segment
            if (0xFF30..=0xFF3F).contains(&marker) {
                continue;
            }

            if pos + 2 > data.len() {
                return Err(WrapError::malformed_codestream(format!(
                    "marker 0x{marker:04x} is missing its segment length"
                )));
            }
            let length = BigEndian::read_u16(&data[pos..pos + 2]) as usize;
            if length < 2 || pos + length > data.len() {
                return Err(WrapError::malformed_codestream(format!(
                    "marker 0x{marker:04x} segment length {length} runs past the data"
                )));
            }
            let segment = &data[pos + 2..pos + length];

            match marker {
                MARKER_SIZ => geometry = Some(parse_siz(segment)?),
                MARKER_CAP => capability_flags = parse_cap(segment)?,
                _ => {}
            }
            pos += length;
        }

        let mut geometry =
            geometry.ok_or_else(|| WrapError::malformed_codestream("missing SIZ marker"))?;
        geometry.capability_flags = capability_flags;

        debug!(
            width = geometry.width,
            height = geometry.height,
            components = geometry.component_count,
            rsiz = format_args!("0x{:04x}", geometry.profile_id),
            pcap = format_args!("0x{:08x}", geometry.capability_flags),
            "Parsed codestream header"
        );

        Ok(geometry)
    }
}

fn parse_siz(segment: &[u8]) -> Result<ImageGeometry> {
    if segment.len() < SIZ_FIXED_LEN {
        return Err(WrapError::malformed_codestream(format!(
            "SIZ segment too short: {} bytes",
            segment.len()
        )));
    }

    let profile_id = BigEndian::read_u16(&segment[0..2]);
    let xsiz = BigEndian::read_u32(&segment[2..6]);
    let ysiz = BigEndian::read_u32(&segment[6..10]);
    let xosiz = BigEndian::read_u32(&segment[10..14]);
    let yosiz = BigEndian::read_u32(&segment[14..18]);
    let component_count = BigEndian::read_u16(&segment[34..36]) as usize;

    if xosiz > xsiz || yosiz > ysiz {
        return Err(WrapError::malformed_codestream(
            "SIZ image offset exceeds the reference grid",
        ));
    }

    let components = &segment[SIZ_FIXED_LEN..];
    if components.len() < component_count * 3 {
        return Err(WrapError::malformed_codestream(format!(
            "SIZ declares {component_count} components but carries {} bytes of component data",
            components.len()
        )));
    }

    let mut ssiz = Vec::with_capacity(component_count);
    let mut subsampling = Vec::with_capacity(component_count);
    for chunk in components.chunks_exact(3).take(component_count) {
        ssiz.push(chunk[0]);
        subsampling.push((chunk[1], chunk[2]));
    }

    Ok(ImageGeometry {
        width: xsiz - xosiz,
        height: ysiz - yosiz,
        reference_grid: (xsiz, ysiz),
        component_count,
        bit_depth: ssiz.iter().map(|s| s & 0x7F).collect(),
        ssiz,
        subsampling,
        capability_flags: 0,
        profile_id,
    })
}

fn parse_cap(segment: &[u8]) -> Result<u32> {
    if segment.len() < 4 {
        return Err(WrapError::malformed_codestream("CAP segment too short"));
    }
    Ok(BigEndian::read_u32(&segment[0..4]))
}
