// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generated codestreams for throughput testing.
//!
//! Every frame is the same fixed main header (3840x2160, three unsubsampled
//! 16-bit components, HT block coder) padded with zeros to the frame size.

use tracing::debug;

use super::CodestreamSequence;
use crate::core::Result;

/// Frames produced when no count is given.
pub const DEFAULT_FRAME_COUNT: u32 = 360;

/// Frame size used when none is given (5 MiB).
pub const DEFAULT_FRAME_SIZE: usize = 5 * 1024 * 1024;

/// Main header shared by every synthetic frame: SOC, SIZ, CAP, COD, QCD,
/// two COM segments, then the SOT and SOD of the single tile-part.
pub const CODESTREAM_HEADER: [u8; 236] = [
    0xFF, 0x4F, 0xFF, 0x51, 0x00, 0x2F, 0x40, 0x00, 0x00, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x08, 0x70,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0F, 0x00, 0x00, 0x00, 0x08, 0x70,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x0F, 0x01, 0x01, 0x0F, 0x01, 0x01,
    0x0F, 0x01, 0x01, 0xFF, 0x50, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x0C, 0xFF, 0x52, 0x00,
    0x12, 0x01, 0x02, 0x00, 0x01, 0x01, 0x05, 0x03, 0x03, 0x40, 0x01, 0x77, 0x88, 0x88, 0x88, 0x88,
    0x88, 0xFF, 0x5C, 0x00, 0x13, 0x20, 0x90, 0x98, 0x98, 0xA0, 0x98, 0x98, 0xA0, 0x98, 0x98, 0xA0,
    0x98, 0x98, 0x98, 0x90, 0x90, 0x98, 0xFF, 0x64, 0x00, 0x18, 0x00, 0x01, 0x4B, 0x61, 0x6B, 0x61,
    0x64, 0x75, 0x2D, 0x76, 0x78, 0x74, 0x37, 0x2E, 0x31, 0x31, 0x2D, 0x42, 0x65, 0x74, 0x61, 0x34,
    0xFF, 0x64, 0x00, 0x5C, 0x00, 0x01, 0x4B, 0x64, 0x75, 0x2D, 0x4C, 0x61, 0x79, 0x65, 0x72, 0x2D,
    0x49, 0x6E, 0x66, 0x6F, 0x3A, 0x20, 0x6C, 0x6F, 0x67, 0x5F, 0x32, 0x7B, 0x44, 0x65, 0x6C, 0x74,
    0x61, 0x2D, 0x44, 0x28, 0x73, 0x71, 0x75, 0x61, 0x72, 0x65, 0x64, 0x2D, 0x65, 0x72, 0x72, 0x6F,
    0x72, 0x29, 0x2F, 0x44, 0x65, 0x6C, 0x74, 0x61, 0x2D, 0x4C, 0x28, 0x62, 0x79, 0x74, 0x65, 0x73,
    0x29, 0x7D, 0x2C, 0x20, 0x4C, 0x28, 0x62, 0x79, 0x74, 0x65, 0x73, 0x29, 0x0A, 0x2D, 0x31, 0x39,
    0x32, 0x2E, 0x30, 0x2C, 0x20, 0x20, 0x33, 0x2E, 0x37, 0x65, 0x2B, 0x30, 0x37, 0x0A, 0xFF, 0x90,
    0x00, 0x0A, 0x00, 0x00, 0x02, 0x2D, 0x2F, 0xD0, 0x00, 0x01, 0xFF, 0x93,
];

/// Produces `frame_count` identical frames.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    frame: Vec<u8>,
    frame_count: u32,
    current_index: u32,
}

impl SyntheticSource {
    /// Create a source of `frame_count` frames of `frame_size` bytes.
    ///
    /// Sizes below the header length are raised to the header length.
    pub fn new(frame_count: u32, frame_size: usize) -> Self {
        let size = frame_size.max(CODESTREAM_HEADER.len());
        let mut frame = vec![0u8; size];
        frame[..CODESTREAM_HEADER.len()].copy_from_slice(&CODESTREAM_HEADER);

        debug!(frame_count, frame_size = size, "Created synthetic source");

        Self {
            frame,
            frame_count,
            current_index: 0,
        }
    }

    /// Total number of frames.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Index of the current frame.
    pub fn current_index(&self) -> u32 {
        self.current_index
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_COUNT, DEFAULT_FRAME_SIZE)
    }
}

impl CodestreamSequence for SyntheticSource {
    fn has_more(&self) -> bool {
        self.current_index < self.frame_count
    }

    fn advance(&mut self) -> Result<()> {
        if self.has_more() {
            self.current_index += 1;
        }
        Ok(())
    }

    fn current(&self) -> &[u8] {
        if self.has_more() {
            &self.frame
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        let mut source = SyntheticSource::new(3, 1024);
        let mut seen = 0;
        while source.has_more() {
            assert_eq!(source.current().len(), 1024);
            assert_eq!(&source.current()[..2], &[0xFF, 0x4F]);
            assert!(source.current()[236..].iter().all(|b| *b == 0));
            seen += 1;
            source.advance().unwrap();
        }
        assert_eq!(seen, 3);
        assert_eq!(source.current_index(), 3);
    }

    #[test]
    fn test_small_frame_size_raised_to_header() {
        let source = SyntheticSource::new(1, 10);
        assert_eq!(source.current().len(), CODESTREAM_HEADER.len());
    }

    #[test]
    fn test_zero_frames() {
        let source = SyntheticSource::new(0, 1024);
        assert!(!source.has_more());
        assert!(source.current().is_empty());
    }

    #[test]
    fn test_defaults() {
        let source = SyntheticSource::default();
        assert_eq!(source.frame_count(), 360);
        assert_eq!(source.current().len(), 5 * 1024 * 1024);
    }
}
