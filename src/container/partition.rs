// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Partition packs.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use super::constants::{
    JPEG2000_CONTAINER_LABEL, OP1A_LABEL, PARTITION_MAJOR_VERSION, PARTITION_MINOR_VERSION,
};
use crate::core::ul::UL_LEN;
use crate::core::{Result, Ul, WrapError};

/// Encoded size of a partition pack value with one essence container.
pub const PARTITION_PACK_LEN: usize = 104;

/// Fields of a header or footer partition pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPack {
    /// Offset of this partition pack
    pub this_partition: u64,
    /// Offset of the previous partition pack
    pub previous_partition: u64,
    /// Offset of the footer partition pack
    pub footer_partition: u64,
    /// Bytes of header metadata following the pack
    pub header_byte_count: u64,
    /// Bytes of index segments in this partition
    pub index_byte_count: u64,
    /// Index stream id, 0 when the partition has no index
    pub index_sid: u32,
    /// Stream offset of the partition's essence
    pub body_offset: u64,
    /// Essence stream id, 0 when the partition has no essence
    pub body_sid: u32,
    /// Operational pattern label
    pub operational_pattern: Ul,
    /// Essence container label
    pub essence_container: Ul,
}

impl Default for PartitionPack {
    fn default() -> Self {
        Self {
            this_partition: 0,
            previous_partition: 0,
            footer_partition: 0,
            header_byte_count: 0,
            index_byte_count: 0,
            index_sid: 0,
            body_offset: 0,
            body_sid: 0,
            operational_pattern: OP1A_LABEL,
            essence_container: JPEG2000_CONTAINER_LABEL,
        }
    }
}

impl PartitionPack {
    /// Serialize the pack value.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PARTITION_PACK_LEN);
        // Writes into a Vec cannot fail
        let _ = self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut Vec<u8>) -> std::io::Result<()> {
        out.write_u16::<BigEndian>(PARTITION_MAJOR_VERSION)?;
        out.write_u16::<BigEndian>(PARTITION_MINOR_VERSION)?;
        out.write_u32::<BigEndian>(1)?; // KAG size
        out.write_u64::<BigEndian>(self.this_partition)?;
        out.write_u64::<BigEndian>(self.previous_partition)?;
        out.write_u64::<BigEndian>(self.footer_partition)?;
        out.write_u64::<BigEndian>(self.header_byte_count)?;
        out.write_u64::<BigEndian>(self.index_byte_count)?;
        out.write_u32::<BigEndian>(self.index_sid)?;
        out.write_u64::<BigEndian>(self.body_offset)?;
        out.write_u32::<BigEndian>(self.body_sid)?;
        out.extend_from_slice(self.operational_pattern.as_bytes());
        out.write_u32::<BigEndian>(1)?; // batch count
        out.write_u32::<BigEndian>(UL_LEN as u32)?; // batch item length
        out.extend_from_slice(self.essence_container.as_bytes());
        Ok(())
    }

    /// Parse a pack value.
    pub fn parse(value: &[u8]) -> Result<Self> {
        let malformed = |_| WrapError::container("PartitionPack", "truncated partition pack");

        let mut cursor = Cursor::new(value);
        let major = cursor.read_u16::<BigEndian>().map_err(malformed)?;
        let _minor = cursor.read_u16::<BigEndian>().map_err(malformed)?;
        if major != PARTITION_MAJOR_VERSION {
            return Err(WrapError::container(
                "PartitionPack",
                format!("unsupported partition pack version {major}"),
            ));
        }
        let _kag = cursor.read_u32::<BigEndian>().map_err(malformed)?;
        let this_partition = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let previous_partition = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let footer_partition = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let header_byte_count = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let index_byte_count = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let index_sid = cursor.read_u32::<BigEndian>().map_err(malformed)?;
        let body_offset = cursor.read_u64::<BigEndian>().map_err(malformed)?;
        let body_sid = cursor.read_u32::<BigEndian>().map_err(malformed)?;

        let pos = cursor.position() as usize;
        let operational_pattern = value
            .get(pos..pos + UL_LEN)
            .and_then(Ul::from_slice)
            .ok_or_else(|| WrapError::container("PartitionPack", "truncated partition pack"))?;
        cursor.set_position((pos + UL_LEN) as u64);

        let count = cursor.read_u32::<BigEndian>().map_err(malformed)?;
        let item_len = cursor.read_u32::<BigEndian>().map_err(malformed)?;
        let pos = cursor.position() as usize;
        if count == 0 || item_len as usize != UL_LEN {
            return Err(WrapError::container(
                "PartitionPack",
                "partition pack lists no essence container",
            ));
        }
        let essence_container = value
            .get(pos..pos + UL_LEN)
            .and_then(Ul::from_slice)
            .ok_or_else(|| WrapError::container("PartitionPack", "truncated essence container batch"))?;

        Ok(Self {
            this_partition,
            previous_partition,
            footer_partition,
            header_byte_count,
            index_byte_count,
            index_sid,
            body_offset,
            body_sid,
            operational_pattern,
            essence_container,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::constants::PARTITION_FOOTER_FIELD;

    #[test]
    fn test_encoded_length() {
        assert_eq!(PartitionPack::default().encode().len(), PARTITION_PACK_LEN);
    }

    #[test]
    fn test_footer_field_offset() {
        let pack = PartitionPack {
            footer_partition: 0x0102_0304_0506_0708,
            ..Default::default()
        };
        let bytes = pack.encode();
        assert_eq!(
            &bytes[PARTITION_FOOTER_FIELD..PARTITION_FOOTER_FIELD + 8],
            &[1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_parse_encoded() {
        let pack = PartitionPack {
            this_partition: 500,
            footer_partition: 500,
            index_byte_count: 77,
            index_sid: 129,
            ..Default::default()
        };
        assert_eq!(PartitionPack::parse(&pack.encode()).unwrap(), pack);
    }

    #[test]
    fn test_parse_truncated() {
        let bytes = PartitionPack::default().encode();
        let err = PartitionPack::parse(&bytes[..50]).unwrap_err();
        assert!(matches!(err, WrapError::ContainerLibraryError { .. }));
    }
}
