// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Picture essence descriptor resolution.
//!
//! [`build`] turns the geometry of the first codestream plus the user's
//! colorimetry, component scheme and quantization choices into the complete
//! set of descriptor fields the container writes. It is pure: the same
//! inputs always produce the same record.
//!
//! Reference levels follow ST 2067-21. For a pixel depth `p`:
//!
//! | quantity | partial range | full range |
//! |---|---|---|
//! | max / white | `2^p - 21 * 2^(p-8)` | `2^p - 1` |
//! | min / black | `2^(p-4)` | `0` |
//! | color range (CDCI) | `2^p - 2^(p-3) + 1` | n/a |

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::colorimetry::ColorimetryScheme;
use super::profile;
use crate::codestream::ImageGeometry;
use crate::core::{ComponentScheme, Quantization, Result, Ul, WrapError};

/// Layout codes of the RGBA pixel layout property.
pub mod layout_codes {
    /// Luma
    pub const Y: u8 = 0x59;
    /// Blue-difference chroma
    pub const CB: u8 = 0x55;
    /// Red-difference chroma
    pub const CR: u8 = 0x56;
    /// Red
    pub const R: u8 = 0x52;
    /// Green
    pub const G: u8 = 0x47;
    /// Blue
    pub const B: u8 = 0x42;
    /// CIE X
    pub const X: u8 = 0xd8;
    /// CIE Y
    pub const CIE_Y: u8 = 0xd9;
    /// CIE Z
    pub const Z: u8 = 0xda;
}

/// Which descriptor set carries the picture description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    /// RGBA picture essence descriptor (RGB and XYZ)
    Rgba,
    /// CDCI picture essence descriptor (YCbCr)
    Cdci,
}

impl ShapeKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rgba => "RGBA",
            ShapeKind::Cdci => "CDCI",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields only present on CDCI descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CdciFields {
    /// Coding equations label
    pub coding_equations: Ul,
    /// Horizontal chroma subsampling factor
    pub horizontal_subsampling: u32,
    /// Vertical chroma subsampling factor
    pub vertical_subsampling: u32,
    /// Number of code values between black and the chroma extremes
    pub color_range: u32,
}

/// Resolved descriptor fields for a picture track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorRecord {
    /// Descriptor set kind
    pub shape: ShapeKind,
    /// Stored width in pixels
    pub stored_width: u32,
    /// Stored height in pixels
    pub stored_height: u32,
    /// Bits per component sample
    pub component_depth: u32,
    /// Maximum reference level (white level for CDCI)
    pub component_max_ref: u32,
    /// Minimum reference level (black level for CDCI)
    pub component_min_ref: u32,
    /// Three (code, depth) pairs followed by a zero terminator
    pub layout: [u8; 7],
    /// Picture essence coding label
    pub picture_essence_coding: Ul,
    /// Transfer characteristic label
    pub transfer_characteristic: Ul,
    /// Color primaries label
    pub color_primaries: Ul,
    /// Present iff `shape == Cdci`
    pub cdci: Option<CdciFields>,
}

impl DescriptorRecord {
    /// Component scheme implied by the layout codes.
    pub fn component_scheme(&self) -> ComponentScheme {
        match self.layout[0] {
            layout_codes::Y => ComponentScheme::YCbCr,
            layout_codes::X => ComponentScheme::Xyz,
            _ => ComponentScheme::Rgb,
        }
    }
}

/// Smallest pixel depth the partial-range formulas are defined for.
const MIN_PARTIAL_DEPTH: u32 = 8;
/// Largest supported pixel depth.
const MAX_PIXEL_DEPTH: u32 = 16;

fn partial_max(p: u32) -> u32 {
    (1 << p) - 21 * (1 << (p - 8))
}

fn partial_min(p: u32) -> u32 {
    1 << (p - 4)
}

fn layout(codes: [u8; 3], depth: u32) -> [u8; 7] {
    let d = depth as u8;
    [codes[0], d, codes[1], d, codes[2], d, 0]
}

/// Resolve the descriptor for a codestream geometry.
pub fn build(
    geometry: &ImageGeometry,
    color_scheme: &ColorimetryScheme,
    component_scheme: ComponentScheme,
    quantization: Quantization,
) -> Result<DescriptorRecord> {
    if geometry.component_count != 3
        || geometry.bit_depth.len() != 3
        || geometry.subsampling.len() != 3
    {
        return Err(WrapError::UnsupportedComponentCount {
            count: geometry.component_count,
        });
    }

    let depths = &geometry.bit_depth;
    if depths[1] != depths[0] || depths[2] != depths[0] {
        return Err(WrapError::UnequalComponentDepth {
            depths: depths.clone(),
        });
    }

    let pixel_depth = u32::from(depths[0]) + 1;
    let partial = quantization == Quantization::Partial;
    let min_depth = if partial { MIN_PARTIAL_DEPTH } else { 1 };
    if !(min_depth..=MAX_PIXEL_DEPTH).contains(&pixel_depth) {
        return Err(WrapError::UnsupportedBitDepth { pixel_depth });
    }

    let (shape, max_ref, min_ref, codes, cdci) = match component_scheme {
        ComponentScheme::YCbCr => {
            if !partial {
                return Err(WrapError::InvalidQuantizationForScheme {
                    scheme: component_scheme,
                    quantization,
                });
            }

            let cb = geometry.subsampling[1];
            let cr = geometry.subsampling[2];
            if cb != cr {
                return Err(WrapError::UnequalSubsampling { cb, cr });
            }

            let cdci = CdciFields {
                coding_equations: color_scheme.coding_equations,
                horizontal_subsampling: u32::from(cb.0),
                vertical_subsampling: 1,
                color_range: (1 << pixel_depth) - (1 << (pixel_depth - 3)) + 1,
            };
            (
                ShapeKind::Cdci,
                partial_max(pixel_depth),
                partial_min(pixel_depth),
                [layout_codes::Y, layout_codes::CB, layout_codes::CR],
                Some(cdci),
            )
        }
        ComponentScheme::Rgb | ComponentScheme::Xyz => {
            for component in 1..=2 {
                let (dx, dy) = geometry.subsampling[component];
                if dx != 1 || dy != 1 {
                    return Err(WrapError::SubsampledComponentsInRgbMode { component, dx, dy });
                }
            }

            let (max_ref, min_ref) = if partial {
                (partial_max(pixel_depth), partial_min(pixel_depth))
            } else {
                ((1u32 << pixel_depth) - 1, 0)
            };

            let codes = if component_scheme == ComponentScheme::Rgb {
                [layout_codes::R, layout_codes::G, layout_codes::B]
            } else {
                [layout_codes::X, layout_codes::CIE_Y, layout_codes::Z]
            };
            (ShapeKind::Rgba, max_ref, min_ref, codes, None)
        }
    };

    let record = DescriptorRecord {
        shape,
        stored_width: geometry.width,
        stored_height: geometry.height,
        component_depth: pixel_depth,
        component_max_ref: max_ref,
        component_min_ref: min_ref,
        layout: layout(codes, pixel_depth),
        picture_essence_coding: profile::resolve(geometry.capability_flags, geometry.profile_id)?,
        transfer_characteristic: color_scheme.transfer_characteristic,
        color_primaries: color_scheme.color_primaries,
        cdci,
    };

    debug!(
        shape = %record.shape,
        pixel_depth,
        scheme = %component_scheme,
        colorimetry = %color_scheme.name,
        "Resolved essence descriptor"
    );

    Ok(record)
}
