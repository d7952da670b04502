// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `MJC2` multiplex source.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use super::{read_full, CodestreamSequence, SequenceCursor};
use crate::core::{Result, WrapError};
use crate::multiplex::{MultiplexHeader, HEADER_LEN, LENGTH_PREFIX_LEN};

/// Reads codestreams from an `MJC2` multiplex.
///
/// A truncated length prefix or payload ends the sequence; it is not an
/// error. In constant-bitrate mode the first length is cached and never read
/// again.
pub struct MultiplexedContainerSource<R: Read> {
    reader: R,
    header: MultiplexHeader,
    cursor: SequenceCursor,
    cbr_length: Option<u32>,
}

impl<R: Read> MultiplexedContainerSource<R> {
    /// Validate the header and position on the first codestream.
    pub fn new(mut reader: R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        let n = read_full(&mut reader, &mut bytes)
            .map_err(|e| WrapError::io("Cannot read multiplex header", e))?;
        let header = MultiplexHeader::parse(&bytes[..n])?;

        debug!(
            edit_rate = %header.edit_rate,
            cbr = header.constant_bitrate,
            "Opened multiplex"
        );

        let mut source = Self {
            reader,
            header,
            cursor: SequenceCursor::default(),
            cbr_length: None,
        };
        source.advance()?;
        Ok(source)
    }

    /// Parsed multiplex header.
    pub fn header(&self) -> &MultiplexHeader {
        &self.header
    }

    fn next_length(&mut self) -> Result<Option<u32>> {
        if let Some(length) = self.cbr_length {
            return Ok(Some(length));
        }

        let mut prefix = [0u8; LENGTH_PREFIX_LEN];
        let n = read_full(&mut self.reader, &mut prefix)
            .map_err(|e| WrapError::io("Cannot read codestream length", e))?;
        if n != LENGTH_PREFIX_LEN {
            return Ok(None);
        }
        let length = BigEndian::read_u32(&prefix);

        if self.header.constant_bitrate {
            if length == 0 {
                return Err(WrapError::ZeroLengthFrame);
            }
            self.cbr_length = Some(length);
        }
        Ok(Some(length))
    }
}

impl<R: Read> CodestreamSequence for MultiplexedContainerSource<R> {
    fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    fn advance(&mut self) -> Result<()> {
        let Some(length) = self.next_length()? else {
            self.cursor.exhaust();
            return Ok(());
        };

        self.cursor.current.clear();
        let read = (&mut self.reader)
            .take(u64::from(length))
            .read_to_end(&mut self.cursor.current)
            .map_err(|e| WrapError::io("Cannot read codestream from multiplex", e))?;

        if read != length as usize {
            debug!(expected = length, read, "Truncated codestream ends multiplex");
            self.cursor.exhaust();
            return Ok(());
        }

        self.cursor.has_more = true;
        Ok(())
    }

    fn current(&self) -> &[u8] {
        &self.cursor.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn multiplex(flags: u8, body: &[u8]) -> Cursor<Vec<u8>> {
        let mut data = vec![b'M', b'J', b'C', b'2', 0, 0, 0, 24, 0, 0, 0, 1, 0, 0, 0, flags];
        data.extend_from_slice(body);
        Cursor::new(data)
    }

    fn collect<R: Read>(mut source: MultiplexedContainerSource<R>) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        while source.has_more() {
            frames.push(source.current().to_vec());
            source.advance().unwrap();
        }
        frames
    }

    #[test]
    fn test_vbr_frames() {
        let body = [0, 0, 0, 2, 0xAA, 0xBB, 0, 0, 0, 1, 0xCC];
        let frames = collect(MultiplexedContainerSource::new(multiplex(0, &body)).unwrap());
        assert_eq!(frames, vec![vec![0xAA, 0xBB], vec![0xCC]]);
    }

    #[test]
    fn test_cbr_frames_share_first_length() {
        let body = [0, 0, 0, 2, 1, 2, 3, 4, 5, 6];
        let frames = collect(MultiplexedContainerSource::new(multiplex(4, &body)).unwrap());
        assert_eq!(frames, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn test_cbr_zero_length_is_fatal() {
        let body = [0, 0, 0, 0];
        let err = MultiplexedContainerSource::new(multiplex(4, &body))
            .err()
            .unwrap();
        assert!(matches!(err, WrapError::ZeroLengthFrame));
    }

    #[test]
    fn test_vbr_zero_length_is_empty_frame() {
        let body = [0, 0, 0, 0, 0, 0, 0, 1, 9];
        let frames = collect(MultiplexedContainerSource::new(multiplex(0, &body)).unwrap());
        assert_eq!(frames, vec![vec![], vec![9]]);
    }

    #[test]
    fn test_truncated_payload_ends_sequence() {
        let body = [0, 0, 0, 1, 7, 0, 0, 0, 5, 1, 2];
        let frames = collect(MultiplexedContainerSource::new(multiplex(0, &body)).unwrap());
        assert_eq!(frames, vec![vec![7]]);
    }

    #[test]
    fn test_truncated_length_ends_sequence() {
        let body = [0, 0, 0, 1, 7, 0, 0];
        let frames = collect(MultiplexedContainerSource::new(multiplex(0, &body)).unwrap());
        assert_eq!(frames, vec![vec![7]]);
    }

    #[test]
    fn test_header_only_is_empty() {
        let source = MultiplexedContainerSource::new(multiplex(4, &[])).unwrap();
        assert!(!source.has_more());
        assert!(source.header().constant_bitrate);
    }

    #[test]
    fn test_short_header_is_malformed() {
        let err = MultiplexedContainerSource::new(Cursor::new(b"MJC2\0\0".to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, WrapError::MalformedContainerHeader { .. }));
    }
}
