// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `MJC2` multiplex framing.
//!
//! A multiplex is a 16-byte header followed by length-prefixed codestreams:
//!
//! ```text
//! 0..4    "MJC2"
//! 4..8    edit rate numerator   (u32 BE)
//! 8..12   edit rate denominator (u32 BE)
//! 12..16  flags                 (u32 BE)
//!           0x3 mask: 1 = YCbCr components, 2 = RGB components
//!           0x4:      constant bitrate
//! then    [u32 BE length][codestream] ...
//! ```
//!
//! In constant-bitrate mode only the first codestream carries a length; every
//! later codestream has the same size.

pub mod writer;

pub use writer::{FileListWriter, FrameSink, MultiplexWriter};

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use tracing::warn;

use crate::core::{EditRate, Result, WrapError};
use crate::metadata::ShapeKind;

/// Magic bytes at the start of every multiplex.
pub const MAGIC: [u8; 4] = *b"MJC2";

/// Size of the multiplex header.
pub const HEADER_LEN: usize = 16;

/// Size of the per-frame length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Flags bit marking a constant-bitrate multiplex.
pub const FLAG_CBR: u32 = 0x0000_0004;

/// Flags bits carrying the component flag.
pub const COMPONENT_FLAG_MASK: u32 = 0x0000_0003;

/// Color components signalled in the flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ComponentFlag {
    /// Y, Cb, Cr
    Ycc = 1,
    /// R, G, B (also used for X, Y, Z)
    Rgb = 2,
}

impl ComponentFlag {
    /// Decode from the low bits of the flags word.
    pub fn from_flags(flags: u32) -> Option<Self> {
        match flags & COMPONENT_FLAG_MASK {
            1 => Some(ComponentFlag::Ycc),
            2 => Some(ComponentFlag::Rgb),
            _ => None,
        }
    }

    /// Flag matching the descriptor shape of a track file.
    pub fn from_shape(shape: ShapeKind) -> Self {
        match shape {
            ShapeKind::Rgba => ComponentFlag::Rgb,
            ShapeKind::Cdci => ComponentFlag::Ycc,
        }
    }
}

impl fmt::Display for ComponentFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentFlag::Ycc => f.write_str("YCC"),
            ComponentFlag::Rgb => f.write_str("RGB"),
        }
    }
}

/// Parsed or constructed multiplex header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiplexHeader {
    /// Edit rate of the codestreams
    pub edit_rate: EditRate,
    /// Component flag, `None` when the flags word does not carry one
    pub component_flag: Option<ComponentFlag>,
    /// True when only the first codestream carries a length
    pub constant_bitrate: bool,
}

impl MultiplexHeader {
    /// Parse the first [`HEADER_LEN`] bytes of a multiplex.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WrapError::malformed_header(format!(
                "expected {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0..4] != MAGIC {
            return Err(WrapError::malformed_header(format!(
                "bad magic {:02x?}, expected \"MJC2\"",
                &bytes[0..4]
            )));
        }

        let numerator = BigEndian::read_u32(&bytes[4..8]);
        let denominator = BigEndian::read_u32(&bytes[8..12]);
        let flags = BigEndian::read_u32(&bytes[12..16]);

        let edit_rate = EditRate::new(numerator, denominator).map_err(|_| {
            WrapError::malformed_header(format!("invalid edit rate {numerator}/{denominator}"))
        })?;

        let component_flag = ComponentFlag::from_flags(flags);
        if component_flag.is_none() && flags & COMPONENT_FLAG_MASK != 0 {
            warn!(
                flags = format_args!("0x{flags:08x}"),
                "Multiplex header carries an unknown component flag"
            );
        }

        Ok(Self {
            edit_rate,
            component_flag,
            constant_bitrate: flags & FLAG_CBR != 0,
        })
    }

    /// Flags word of this header.
    pub fn flags(&self) -> u32 {
        let mut flags = self.component_flag.map_or(0, |f| f as u32);
        if self.constant_bitrate {
            flags |= FLAG_CBR;
        }
        flags
    }

    /// Serialize to the 16-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&MAGIC);
        BigEndian::write_u32(&mut bytes[4..8], self.edit_rate.numerator);
        BigEndian::write_u32(&mut bytes[8..12], self.edit_rate.denominator);
        BigEndian::write_u32(&mut bytes[12..16], self.flags());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CBR_24: [u8; 16] = [
        0x4D, 0x4A, 0x43, 0x32, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x04,
    ];

    #[test]
    fn test_parse_cbr_header() {
        let header = MultiplexHeader::parse(&CBR_24).unwrap();
        assert_eq!(header.edit_rate, EditRate::FPS_24);
        assert!(header.constant_bitrate);
        assert_eq!(header.component_flag, None);
        assert_eq!(header.encode(), CBR_24);
    }

    #[test]
    fn test_component_flag_bits() {
        let header = MultiplexHeader {
            edit_rate: EditRate::new(30000, 1001).unwrap(),
            component_flag: Some(ComponentFlag::Rgb),
            constant_bitrate: false,
        };
        let bytes = header.encode();
        assert_eq!(&bytes[12..16], &[0, 0, 0, 2]);
        assert_eq!(MultiplexHeader::parse(&bytes).unwrap(), header);

        assert_eq!(ComponentFlag::from_flags(0x5), Some(ComponentFlag::Ycc));
        assert_eq!(ComponentFlag::from_flags(0x3), None);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = CBR_24;
        bytes[3] = b'1';
        let err = MultiplexHeader::parse(&bytes).unwrap_err();
        assert!(matches!(err, WrapError::MalformedContainerHeader { .. }));
    }

    #[test]
    fn test_short_header() {
        let err = MultiplexHeader::parse(&CBR_24[..10]).unwrap_err();
        assert!(matches!(err, WrapError::MalformedContainerHeader { .. }));
    }

    #[test]
    fn test_zero_edit_rate() {
        let mut bytes = CBR_24;
        bytes[7] = 0;
        assert!(MultiplexHeader::parse(&bytes).is_err());
    }

    #[test]
    fn test_flag_from_shape() {
        assert_eq!(ComponentFlag::from_shape(ShapeKind::Rgba), ComponentFlag::Rgb);
        assert_eq!(ComponentFlag::from_shape(ShapeKind::Cdci), ComponentFlag::Ycc);
    }
}
