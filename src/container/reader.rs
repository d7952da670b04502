// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Track file reader.
//!
//! The file is memory-mapped and walked once on open. Frames are served as
//! slices of the map; nothing is copied until [`ContainerReader::read_frame`]
//! fills the caller's buffer.

use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder};
use memmap2::Mmap;
use tracing::{debug, info};
use uuid::Uuid;

use super::constants::*;
use super::klv::KlvReader;
use super::local_set::LocalSet;
use super::partition::PartitionPack;
use super::{ComponentSizing, ContainerReader, SubDescriptor, WriterInfo};
use crate::core::{EditRate, FrameBuffer, Result, WrapError};
use crate::metadata::{CdciFields, DescriptorRecord, ShapeKind};

/// Location of one essence element in the file.
#[derive(Debug, Clone, Copy)]
struct FrameLocation {
    /// Offset of the element key
    key_offset: usize,
    /// Offset of the codestream bytes
    value_offset: usize,
    /// Codestream length
    length: usize,
}

/// Everything learned from one pass over the file.
#[derive(Debug)]
struct Layout {
    header: PartitionPack,
    footer: PartitionPack,
    writer_info: WriterInfo,
    descriptor: DescriptorRecord,
    edit_rate: EditRate,
    sub_descriptor: Option<SubDescriptor>,
    frames: Vec<FrameLocation>,
    index_segments: usize,
}

/// Reads a track file written by [`super::TrackFileWriter`].
#[derive(Debug)]
pub struct TrackFileReader {
    mmap: Mmap,
    path: PathBuf,
    layout: Layout,
}

impl TrackFileReader {
    /// Map the file and validate its structure.
    pub fn open_for_read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            WrapError::io(format!("Cannot open track file: {}", path.display()), e)
        })?;

        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| {
            WrapError::container("TrackFileReader", format!("Failed to mmap file: {e}"))
        })?;

        let layout = scan(&mmap)?;

        info!(
            path = %path.display(),
            frames = layout.frames.len(),
            shape = %layout.descriptor.shape,
            edit_rate = %layout.edit_rate,
            "Opened track file for reading"
        );

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            layout,
        })
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file in bytes.
    pub fn file_size(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Identification and asset UUID.
    pub fn writer_info(&self) -> &WriterInfo {
        &self.layout.writer_info
    }

    /// The picture descriptor, whatever its shape.
    pub fn descriptor(&self) -> &DescriptorRecord {
        &self.layout.descriptor
    }

    /// JPEG 2000 sub-descriptor, if present.
    pub fn sub_descriptor(&self) -> Option<&SubDescriptor> {
        self.layout.sub_descriptor.as_ref()
    }

    /// Number of index table segments in the file.
    pub fn index_segment_count(&self) -> usize {
        self.layout.index_segments
    }

    /// Offset of the footer partition pack.
    pub fn footer_offset(&self) -> u64 {
        self.layout.footer.this_partition
    }

    /// True when the index lives in the footer partition.
    pub fn index_in_footer(&self) -> bool {
        self.layout.footer.index_byte_count > 0
    }

    /// Header partition pack.
    pub fn header_partition(&self) -> &PartitionPack {
        &self.layout.header
    }

    /// Borrow frame `index` straight from the map.
    pub fn frame(&self, index: u64) -> Option<&[u8]> {
        let location = self.layout.frames.get(usize::try_from(index).ok()?)?;
        self.mmap
            .get(location.value_offset..location.value_offset + location.length)
    }
}

impl ContainerReader for TrackFileReader {
    fn frame_count(&self) -> u64 {
        self.layout.frames.len() as u64
    }

    fn read_frame(&self, index: u64, buffer: &mut FrameBuffer) -> Result<()> {
        let frame = self.frame(index).ok_or_else(|| {
            WrapError::container(
                "TrackFileReader",
                format!(
                    "frame {index} is out of range, the file has {} frames",
                    self.layout.frames.len()
                ),
            )
        })?;
        buffer.set_data(frame)
    }

    fn descriptor_by_shape(&self, shape: ShapeKind) -> Option<&DescriptorRecord> {
        (self.layout.descriptor.shape == shape).then_some(&self.layout.descriptor)
    }

    fn edit_rate(&self) -> EditRate {
        self.layout.edit_rate
    }
}

fn container_error(message: impl Into<String>) -> WrapError {
    WrapError::container("TrackFileReader", message)
}

fn scan(data: &[u8]) -> Result<Layout> {
    let mut reader = KlvReader::new(data);

    let first = reader
        .next_klv()?
        .ok_or_else(|| container_error("file is empty"))?;
    if first.key != HEADER_PARTITION_KEY {
        return Err(container_error(
            "file does not start with a header partition pack",
        ));
    }
    let header = PartitionPack::parse(first.value)?;

    let mut footer: Option<PartitionPack> = None;
    let mut writer_info: Option<WriterInfo> = None;
    let mut asset_uuid: Option<Uuid> = None;
    let mut descriptor: Option<(DescriptorRecord, EditRate)> = None;
    let mut sub_descriptor = None;
    let mut frames = Vec::new();
    let mut index_offsets: Vec<u64> = Vec::new();
    let mut index_segments = 0;

    while let Some(klv) = reader.next_klv()? {
        let value_offset = reader.position() - klv.value.len();

        if footer.is_some() && klv.key != INDEX_SEGMENT_KEY && klv.key != FILL_KEY {
            return Err(container_error(format!(
                "unexpected item at offset {} after the footer partition",
                klv.offset
            )));
        }

        match klv.key {
            IDENTIFICATION_KEY => writer_info = Some(parse_identification(klv.value)?),
            SOURCE_PACKAGE_KEY => asset_uuid = Some(parse_package(klv.value)?),
            RGBA_DESCRIPTOR_KEY | CDCI_DESCRIPTOR_KEY => {
                if descriptor.is_some() {
                    return Err(container_error("file has more than one picture descriptor"));
                }
                let shape = if klv.key == RGBA_DESCRIPTOR_KEY {
                    ShapeKind::Rgba
                } else {
                    ShapeKind::Cdci
                };
                descriptor = Some(parse_descriptor(shape, klv.value)?);
            }
            JPEG2000_SUB_DESCRIPTOR_KEY => sub_descriptor = Some(parse_sub_descriptor(klv.value)?),
            JPEG2000_FRAME_KEY => frames.push(FrameLocation {
                key_offset: klv.offset,
                value_offset,
                length: klv.value.len(),
            }),
            INDEX_SEGMENT_KEY => {
                let (start, entries) = parse_index_segment(klv.value)?;
                if start != index_offsets.len() as u64 {
                    return Err(container_error(format!(
                        "index segment starts at frame {start}, expected {}",
                        index_offsets.len()
                    )));
                }
                index_offsets.extend(entries);
                index_segments += 1;
            }
            FOOTER_PARTITION_KEY => {
                let pack = PartitionPack::parse(klv.value)?;
                if pack.this_partition != klv.offset as u64
                    || header.footer_partition != klv.offset as u64
                {
                    return Err(container_error(format!(
                        "footer partition at offset {} does not match the recorded offset {}",
                        klv.offset, header.footer_partition
                    )));
                }
                footer = Some(pack);
            }
            FILL_KEY => {}
            other => debug!(key = %other, offset = klv.offset, "Skipping unknown item"),
        }
    }

    let footer = footer.ok_or_else(|| container_error("missing footer partition"))?;
    let (descriptor, edit_rate) =
        descriptor.ok_or_else(|| container_error("missing picture descriptor"))?;
    let mut writer_info =
        writer_info.ok_or_else(|| container_error("missing identification set"))?;
    writer_info.asset_uuid =
        asset_uuid.ok_or_else(|| container_error("missing source package"))?;

    if index_offsets.len() != frames.len() {
        return Err(container_error(format!(
            "index has {} entries but the file has {} frames",
            index_offsets.len(),
            frames.len()
        )));
    }
    if let Some(i) = frames
        .iter()
        .zip(&index_offsets)
        .position(|(frame, offset)| frame.key_offset as u64 != *offset)
    {
        return Err(container_error(format!(
            "index entry {i} does not point at frame {i}"
        )));
    }

    Ok(Layout {
        header,
        footer,
        writer_info,
        descriptor,
        edit_rate,
        sub_descriptor,
        frames,
        index_segments,
    })
}

fn parse_identification(value: &[u8]) -> Result<WriterInfo> {
    let set = LocalSet::parse("Identification", value)?;
    let product_uuid = Uuid::from_slice(set.require(TAG_PRODUCT_UID)?)
        .map_err(|e| WrapError::container("Identification", e.to_string()))?;
    Ok(WriterInfo {
        product_uuid,
        company_name: set.utf16(TAG_COMPANY_NAME)?,
        product_name: set.utf16(TAG_PRODUCT_NAME)?,
        product_version: set.utf16(TAG_VERSION_STRING)?,
        asset_uuid: Uuid::nil(),
    })
}

fn parse_package(value: &[u8]) -> Result<Uuid> {
    let set = LocalSet::parse("SourcePackage", value)?;
    let umid = set.require(TAG_PACKAGE_UID)?;
    if umid.len() != 32 || umid[..16] != UMID_PREFIX {
        return Err(WrapError::container("SourcePackage", "malformed package UMID"));
    }
    Uuid::from_slice(&umid[16..]).map_err(|e| WrapError::container("SourcePackage", e.to_string()))
}

fn parse_descriptor(shape: ShapeKind, value: &[u8]) -> Result<(DescriptorRecord, EditRate)> {
    let context = match shape {
        ShapeKind::Rgba => "RGBADescriptor",
        ShapeKind::Cdci => "CDCIDescriptor",
    };
    let set = LocalSet::parse(context, value)?;

    let layout_bytes = set.require(TAG_PIXEL_LAYOUT)?;
    let layout = <[u8; 7]>::try_from(layout_bytes)
        .map_err(|_| WrapError::container(context, "pixel layout must be 7 bytes"))?;

    let (max_ref, min_ref, cdci) = match shape {
        ShapeKind::Rgba => (
            set.u32(TAG_COMPONENT_MAX_REF)?,
            set.u32(TAG_COMPONENT_MIN_REF)?,
            None,
        ),
        ShapeKind::Cdci => (
            set.u32(TAG_WHITE_REF_LEVEL)?,
            set.u32(TAG_BLACK_REF_LEVEL)?,
            Some(CdciFields {
                coding_equations: set.ul(TAG_CODING_EQUATIONS)?,
                horizontal_subsampling: set.u32(TAG_HORIZONTAL_SUBSAMPLING)?,
                vertical_subsampling: set.u32(TAG_VERTICAL_SUBSAMPLING)?,
                color_range: set.u32(TAG_COLOR_RANGE)?,
            }),
        ),
    };

    let record = DescriptorRecord {
        shape,
        stored_width: set.u32(TAG_STORED_WIDTH)?,
        stored_height: set.u32(TAG_STORED_HEIGHT)?,
        component_depth: set.u32(TAG_COMPONENT_DEPTH)?,
        component_max_ref: max_ref,
        component_min_ref: min_ref,
        layout,
        picture_essence_coding: set.ul(TAG_PICTURE_ESSENCE_CODING)?,
        transfer_characteristic: set.ul(TAG_TRANSFER_CHARACTERISTIC)?,
        color_primaries: set.ul(TAG_COLOR_PRIMARIES)?,
        cdci,
    };

    Ok((record, set.rational(TAG_SAMPLE_RATE)?))
}

fn parse_sub_descriptor(value: &[u8]) -> Result<SubDescriptor> {
    let set = LocalSet::parse("JPEG2000SubDescriptor", value)?;
    let count = usize::from(set.u16(TAG_J2K_CSIZ)?);
    let sizing = set.require(TAG_J2K_COMPONENT_SIZING)?;
    if sizing.len() != count * 3 {
        return Err(WrapError::container(
            "JPEG2000SubDescriptor",
            format!("{count} components but {} bytes of sizing", sizing.len()),
        ));
    }

    Ok(SubDescriptor {
        xsiz: set.u32(TAG_J2K_XSIZ)?,
        ysiz: set.u32(TAG_J2K_YSIZ)?,
        components: sizing
            .chunks_exact(3)
            .map(|c| ComponentSizing {
                ssiz: c[0],
                xrsiz: c[1],
                yrsiz: c[2],
            })
            .collect(),
    })
}

fn parse_index_segment(value: &[u8]) -> Result<(u64, Vec<u64>)> {
    let set = LocalSet::parse("IndexTableSegment", value)?;
    let start = set.u64(TAG_INDEX_START_POSITION)?;
    let duration = set.u64(TAG_INDEX_DURATION)?;
    let array = set.require(TAG_INDEX_ENTRY_ARRAY)?;

    if array.len() < 8 {
        return Err(WrapError::container(
            "IndexTableSegment",
            "truncated index entry array",
        ));
    }
    let count = BigEndian::read_u32(&array[0..4]) as usize;
    let entry_len = BigEndian::read_u32(&array[4..8]) as usize;
    let entries = &array[8..];

    if entry_len != INDEX_ENTRY_LEN || entries.len() != count * entry_len {
        return Err(WrapError::container(
            "IndexTableSegment",
            format!("entry array of {count} x {entry_len} bytes does not match its length"),
        ));
    }
    if count as u64 != duration {
        return Err(WrapError::container(
            "IndexTableSegment",
            format!("duration {duration} does not match {count} entries"),
        ));
    }

    let offsets = entries
        .chunks_exact(INDEX_ENTRY_LEN)
        .map(|entry| BigEndian::read_u64(&entry[3..11]))
        .collect();
    Ok((start, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::klv::write_klv;

    #[test]
    fn test_scan_rejects_empty() {
        let err = scan(&[]).unwrap_err();
        assert!(err.to_string().contains("file is empty"));
    }

    #[test]
    fn test_scan_requires_header_partition() {
        let mut data = Vec::new();
        write_klv(&mut data, &FILL_KEY, &[0; 4]).unwrap();
        let err = scan(&data).unwrap_err();
        assert!(err.to_string().contains("header partition"));
    }

    #[test]
    fn test_scan_requires_footer() {
        let mut data = Vec::new();
        write_klv(&mut data, &HEADER_PARTITION_KEY, &PartitionPack::default().encode()).unwrap();
        let err = scan(&data).unwrap_err();
        assert!(err.to_string().contains("missing footer"));
    }

    #[test]
    fn test_index_segment_entry_array_checked() {
        use crate::container::local_set::LocalSetBuilder;
        let value = LocalSetBuilder::new()
            .u64(TAG_INDEX_START_POSITION, 0)
            .u64(TAG_INDEX_DURATION, 2)
            .bytes(TAG_INDEX_ENTRY_ARRAY, &[0, 0, 0, 2, 0, 0, 0, 11])
            .finish()
            .unwrap();
        assert!(parse_index_segment(&value).is_err());
    }
}
