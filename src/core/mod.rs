// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout j2kwrap.
//!
//! This module provides the foundational types for the library:
//! - [`WrapError`] - Closed error enumeration
//! - [`Ul`] - SMPTE Universal Labels and the label table
//! - [`FrameBuffer`] - Owned codestream bytes handed between pipeline steps
//! - [`EditRate`], [`ComponentScheme`], [`Quantization`] - Run options

pub mod error;
pub mod frame;
pub mod ul;

pub use error::{Result, WrapError};
pub use frame::FrameBuffer;
pub use ul::Ul;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Edit rate of a picture track, e.g. 24/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EditRate {
    /// Frames per `denominator` seconds
    pub numerator: u32,
    /// Time base
    pub denominator: u32,
}

impl EditRate {
    /// 24 frames per second.
    pub const FPS_24: EditRate = EditRate {
        numerator: 24,
        denominator: 1,
    };

    /// Create an edit rate. Both parts must be non-zero.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(WrapError::config(format!(
                "edit rate {numerator}/{denominator} must have a non-zero numerator and denominator"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }
}

impl Default for EditRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for EditRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for EditRate {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        let parse_part = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| WrapError::config(format!("cannot read edit rate '{s}'")))
        };

        match s.split_once('/') {
            Some((num, den)) => Self::new(parse_part(num)?, parse_part(den)?),
            None => Self::new(parse_part(s)?, 1),
        }
    }
}

impl TryFrom<String> for EditRate {
    type Error = WrapError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EditRate> for String {
    fn from(rate: EditRate) -> Self {
        rate.to_string()
    }
}

/// How the three codestream components map to color components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentScheme {
    /// R, G, B components (RGBA descriptor)
    Rgb,
    /// Y, Cb, Cr components (CDCI descriptor)
    #[serde(alias = "ycc")]
    YCbCr,
    /// CIE X, Y, Z components (RGBA descriptor)
    Xyz,
}

impl ComponentScheme {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentScheme::Rgb => "rgb",
            ComponentScheme::YCbCr => "ycbcr",
            ComponentScheme::Xyz => "xyz",
        }
    }
}

impl fmt::Display for ComponentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentScheme {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rgb" => Ok(ComponentScheme::Rgb),
            "ycbcr" | "ycc" => Ok(ComponentScheme::YCbCr),
            "xyz" => Ok(ComponentScheme::Xyz),
            _ => Err(WrapError::config(format!(
                "invalid component scheme '{s}', expected 'rgb', 'ycbcr', or 'xyz'"
            ))),
        }
    }
}

/// Quantization range of the component samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// Narrow ("video") range
    Partial,
    /// Full code range
    Full,
}

impl Quantization {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quantization::Partial => "partial",
            Quantization::Full => "full",
        }
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantization {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "partial" => Ok(Quantization::Partial),
            "full" => Ok(Quantization::Full),
            _ => Err(WrapError::config(format!(
                "invalid quantization '{s}', expected 'partial' or 'full'"
            ))),
        }
    }
}
