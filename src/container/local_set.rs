// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Local sets: 2-byte tag, 2-byte length, value, repeated.

use byteorder::{BigEndian, ByteOrder};

use crate::core::{EditRate, Result, Ul, WrapError};

/// Builds the value of a local set.
#[derive(Debug, Default)]
pub struct LocalSetBuilder {
    data: Vec<u8>,
    oversize: Option<(u16, usize)>,
}

impl LocalSetBuilder {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes under `tag`.
    pub fn bytes(&mut self, tag: u16, value: &[u8]) -> &mut Self {
        let Ok(length) = u16::try_from(value.len()) else {
            self.oversize.get_or_insert((tag, value.len()));
            return self;
        };
        self.data.extend_from_slice(&tag.to_be_bytes());
        self.data.extend_from_slice(&length.to_be_bytes());
        self.data.extend_from_slice(value);
        self
    }

    /// Append a big-endian u16.
    pub fn u16(&mut self, tag: u16, value: u16) -> &mut Self {
        self.bytes(tag, &value.to_be_bytes())
    }

    /// Append a big-endian u32.
    pub fn u32(&mut self, tag: u16, value: u32) -> &mut Self {
        self.bytes(tag, &value.to_be_bytes())
    }

    /// Append a big-endian u64.
    pub fn u64(&mut self, tag: u16, value: u64) -> &mut Self {
        self.bytes(tag, &value.to_be_bytes())
    }

    /// Append a label.
    pub fn ul(&mut self, tag: u16, value: &Ul) -> &mut Self {
        self.bytes(tag, value.as_bytes())
    }

    /// Append a rational as numerator then denominator.
    pub fn rational(&mut self, tag: u16, value: EditRate) -> &mut Self {
        let mut buf = [0u8; 8];
        BigEndian::write_u32(&mut buf[0..4], value.numerator);
        BigEndian::write_u32(&mut buf[4..8], value.denominator);
        self.bytes(tag, &buf)
    }

    /// Append a string as UTF-16BE.
    pub fn utf16(&mut self, tag: u16, value: &str) -> &mut Self {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        self.bytes(tag, &encoded)
    }

    /// Finish the set. Fails if any value did not fit a 2-byte length.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if let Some((tag, length)) = self.oversize {
            return Err(WrapError::container(
                "LocalSet",
                format!("value of tag 0x{tag:04x} is {length} bytes, more than a local set allows"),
            ));
        }
        Ok(std::mem::take(&mut self.data))
    }
}

/// A parsed local set borrowing from the file.
#[derive(Debug)]
pub struct LocalSet<'a> {
    /// Name used in error messages
    context: &'static str,
    items: Vec<(u16, &'a [u8])>,
}

impl<'a> LocalSet<'a> {
    /// Split a set value into its items.
    pub fn parse(context: &'static str, mut data: &'a [u8]) -> Result<Self> {
        let mut items = Vec::new();
        while !data.is_empty() {
            if data.len() < 4 {
                return Err(WrapError::container(context, "truncated local tag"));
            }
            let tag = BigEndian::read_u16(&data[0..2]);
            let length = usize::from(BigEndian::read_u16(&data[2..4]));
            if data.len() < 4 + length {
                return Err(WrapError::container(
                    context,
                    format!("value of tag 0x{tag:04x} runs past the end of the set"),
                ));
            }
            items.push((tag, &data[4..4 + length]));
            data = &data[4 + length..];
        }
        Ok(Self { context, items })
    }

    /// Raw value of `tag`, if present.
    pub fn get(&self, tag: u16) -> Option<&'a [u8]> {
        self.items.iter().find(|(t, _)| *t == tag).map(|(_, v)| *v)
    }

    /// Raw value of a required tag.
    pub fn require(&self, tag: u16) -> Result<&'a [u8]> {
        self.get(tag).ok_or_else(|| {
            WrapError::container(self.context, format!("missing tag 0x{tag:04x}"))
        })
    }

    fn fixed<const N: usize>(&self, tag: u16) -> Result<[u8; N]> {
        let value = self.require(tag)?;
        <[u8; N]>::try_from(value).map_err(|_| {
            WrapError::container(
                self.context,
                format!("tag 0x{tag:04x} has {} bytes, expected {N}", value.len()),
            )
        })
    }

    /// Required big-endian u16.
    pub fn u16(&self, tag: u16) -> Result<u16> {
        Ok(u16::from_be_bytes(self.fixed(tag)?))
    }

    /// Required big-endian u32.
    pub fn u32(&self, tag: u16) -> Result<u32> {
        Ok(u32::from_be_bytes(self.fixed(tag)?))
    }

    /// Required big-endian u64.
    pub fn u64(&self, tag: u16) -> Result<u64> {
        Ok(u64::from_be_bytes(self.fixed(tag)?))
    }

    /// Required label.
    pub fn ul(&self, tag: u16) -> Result<Ul> {
        Ok(Ul::new(self.fixed(tag)?))
    }

    /// Required rational.
    pub fn rational(&self, tag: u16) -> Result<EditRate> {
        let value: [u8; 8] = self.fixed(tag)?;
        EditRate::new(
            BigEndian::read_u32(&value[0..4]),
            BigEndian::read_u32(&value[4..8]),
        )
        .map_err(|e| WrapError::container(self.context, e.to_string()))
    }

    /// Required UTF-16BE string.
    pub fn utf16(&self, tag: u16) -> Result<String> {
        let value = self.require(tag)?;
        if value.len() % 2 != 0 {
            return Err(WrapError::container(
                self.context,
                format!("tag 0x{tag:04x} is not UTF-16"),
            ));
        }
        let units: Vec<u16> = value.chunks_exact(2).map(BigEndian::read_u16).collect();
        String::from_utf16(&units).map_err(|e| WrapError::container(self.context, e.to_string()))
    }
}
