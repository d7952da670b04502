// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! KLV (key-length-value) coding.
//!
//! Every item in a track file is a 16-byte key, a BER-coded length and the
//! value. The writer always emits long-form lengths (`0x83` plus three bytes,
//! or `0x87` plus seven for very large values) so that a length can be
//! patched in place without moving the value.

use std::io::{self, Write};

use crate::core::ul::UL_LEN;
use crate::core::{Result, Ul, WrapError};

/// Largest value length that fits the 4-byte BER form.
const BER4_MAX: u64 = 0x00FF_FFFF;

/// Largest value length that fits the 8-byte BER form.
const BER8_MAX: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// Encode a value length.
pub fn encode_ber_length(length: u64) -> Vec<u8> {
    if length <= BER4_MAX {
        let b = length.to_be_bytes();
        vec![0x83, b[5], b[6], b[7]]
    } else {
        let b = length.to_be_bytes();
        let mut out = Vec::with_capacity(8);
        out.push(0x87);
        out.extend_from_slice(&b[1..]);
        out
    }
}

/// Decode a BER length at the start of `data`.
///
/// Returns the length and the number of bytes it occupied. Short form and
/// long forms of up to eight length bytes are accepted.
pub fn decode_ber_length(data: &[u8]) -> Result<(u64, usize)> {
    let first = *data
        .first()
        .ok_or_else(|| WrapError::container("KLV", "missing BER length"))?;

    if first < 0x80 {
        return Ok((u64::from(first), 1));
    }

    let count = usize::from(first & 0x7F);
    if count == 0 {
        return Err(WrapError::container(
            "KLV",
            "indefinite BER length is not supported",
        ));
    }
    if count > 8 {
        return Err(WrapError::container(
            "KLV",
            format!("BER length of {count} bytes is too long"),
        ));
    }
    if data.len() < 1 + count {
        return Err(WrapError::container("KLV", "truncated BER length"));
    }

    let length = data[1..=count]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok((length, 1 + count))
}

/// Write one KLV item. Returns the number of bytes written.
pub fn write_klv<W: Write>(writer: &mut W, key: &Ul, value: &[u8]) -> io::Result<u64> {
    let length = value.len() as u64;
    if length > BER8_MAX {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "KLV value too large",
        ));
    }
    let ber = encode_ber_length(length);
    writer.write_all(key.as_bytes())?;
    writer.write_all(&ber)?;
    writer.write_all(value)?;
    Ok((UL_LEN + ber.len()) as u64 + length)
}

/// One KLV item borrowed from a larger buffer.
#[derive(Debug, Clone, Copy)]
pub struct Klv<'a> {
    /// Item key
    pub key: Ul,
    /// Offset of the key within the buffer
    pub offset: usize,
    /// Item value
    pub value: &'a [u8],
}

/// Iterates the KLV items of a buffer.
pub struct KlvReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> KlvReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True when no bytes remain.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read the next item, or `None` at the end of the buffer.
    pub fn next_klv(&mut self) -> Result<Option<Klv<'a>>> {
        if self.is_at_end() {
            return Ok(None);
        }

        let offset = self.position;
        let rest = &self.data[offset..];
        if rest.len() < UL_LEN {
            return Err(WrapError::container(
                "KLV",
                format!("truncated key at offset {offset}"),
            ));
        }

        let key = Ul::from_slice(&rest[..UL_LEN])
            .ok_or_else(|| WrapError::container("KLV", "invalid key"))?;
        let (length, ber_len) = decode_ber_length(&rest[UL_LEN..])?;

        let value_start = UL_LEN + ber_len;
        let available = (rest.len() - value_start) as u64;
        if length > available {
            return Err(WrapError::container(
                "KLV",
                format!(
                    "value at offset {offset} needs {length} bytes, {available} available"
                ),
            ));
        }

        let value_end = value_start + length as usize;
        self.position = offset + value_end;

        Ok(Some(Klv {
            key,
            offset,
            value: &rest[value_start..value_end],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::constants::FILL_KEY;

    #[test]
    fn test_encode_ber_length() {
        assert_eq!(encode_ber_length(0), vec![0x83, 0, 0, 0]);
        assert_eq!(encode_ber_length(0x1234), vec![0x83, 0x00, 0x12, 0x34]);
        assert_eq!(
            encode_ber_length(0x0100_0000),
            vec![0x87, 0, 0, 0, 0x01, 0, 0, 0]
        );
    }

    #[test]
    fn test_decode_ber_forms() {
        assert_eq!(decode_ber_length(&[0x05]).unwrap(), (5, 1));
        assert_eq!(decode_ber_length(&[0x81, 0xFF]).unwrap(), (255, 2));
        assert_eq!(decode_ber_length(&[0x83, 0x01, 0x00, 0x00]).unwrap(), (65536, 4));
        assert_eq!(
            decode_ber_length(&[0x88, 0, 0, 0, 0, 0, 0, 0x01, 0x00]).unwrap(),
            (256, 9)
        );
    }

    #[test]
    fn test_decode_ber_errors() {
        assert!(decode_ber_length(&[]).is_err());
        assert!(decode_ber_length(&[0x80]).is_err());
        assert!(decode_ber_length(&[0x89, 0, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
        assert!(decode_ber_length(&[0x83, 0x01]).is_err());
    }

    #[test]
    fn test_klv_reader() {
        let mut data = Vec::new();
        write_klv(&mut data, &FILL_KEY, &[1, 2, 3]).unwrap();
        write_klv(&mut data, &FILL_KEY, &[]).unwrap();

        let mut reader = KlvReader::new(&data);
        let first = reader.next_klv().unwrap().unwrap();
        assert_eq!(first.key, FILL_KEY);
        assert_eq!(first.offset, 0);
        assert_eq!(first.value, &[1, 2, 3]);

        let second = reader.next_klv().unwrap().unwrap();
        assert_eq!(second.offset, 23);
        assert!(second.value.is_empty());
        assert!(reader.next_klv().unwrap().is_none());
    }

    #[test]
    fn test_klv_reader_truncated_value() {
        let mut data = Vec::new();
        write_klv(&mut data, &FILL_KEY, &[1, 2, 3]).unwrap();
        data.truncate(data.len() - 1);
        let mut reader = KlvReader::new(&data);
        let err = reader.next_klv().unwrap_err();
        assert!(matches!(err, WrapError::ContainerLibraryError { .. }));
    }
}
