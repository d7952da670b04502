// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Track file writer.
//!
//! Header metadata is written when the file is opened. Frames are appended
//! as frame-wrapped essence elements; index table segments either follow
//! the essence every `index_interval` frames or are collected into the
//! footer partition. On finalize the footer partition offset is patched
//! into the header partition pack.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> j2kwrap::Result<()> {
//! use j2kwrap::container::{
//!     ContainerWriter, SubDescriptor, TrackFileWriter, WriterInfo, WriterOptions,
//! };
//! use j2kwrap::{EditRate, DescriptorRecord};
//! # fn descriptor() -> DescriptorRecord { unimplemented!() }
//! # fn sub_descriptor() -> SubDescriptor { unimplemented!() }
//!
//! let mut writer = TrackFileWriter::open_for_write(
//!     "picture.mxf",
//!     &WriterInfo::with_random_asset(),
//!     &descriptor(),
//!     &sub_descriptor(),
//!     EditRate::FPS_24,
//!     WriterOptions::default(),
//! )?;
//! writer.write_frame(&[0xFF, 0x4F])?;
//! writer.finalize()?;
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::{debug, info};

use super::constants::*;
use super::klv::{encode_ber_length, write_klv};
use super::local_set::LocalSetBuilder;
use super::partition::{PartitionPack, PARTITION_PACK_LEN};
use super::{ContainerWriter, IndexStrategy, SubDescriptor, WriterInfo, WriterOptions};
use crate::core::ul::UL_LEN;
use crate::core::{EditRate, Result, Ul, WrapError};
use crate::metadata::{DescriptorRecord, ShapeKind};

/// Most index entries written into one segment.
pub const MAX_SEGMENT_ENTRIES: usize = 4096;

/// Size of a KLV with a 4-byte BER length and an empty value.
const EMPTY_KLV_LEN: u64 = (UL_LEN + 4) as u64;

/// Writes a single-track JPEG 2000 track file.
pub struct TrackFileWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    edit_rate: EditRate,
    options: WriterOptions,
    /// Bytes written so far
    position: u64,
    /// Offset of the header partition pack value
    header_pack_value_offset: u64,
    /// Offsets of essence elements not yet indexed
    pending_index: Vec<u64>,
    /// Position of the first frame in `pending_index`
    pending_start: u64,
    frames: u64,
    finalized: bool,
}

impl TrackFileWriter {
    /// Create the file and write the header partition.
    ///
    /// `sub_descriptor` carries the codestream sizing fields; it must come
    /// from the same codestream header as `descriptor`.
    pub fn open_for_write<P: AsRef<Path>>(
        path: P,
        info: &WriterInfo,
        descriptor: &DescriptorRecord,
        sub_descriptor: &SubDescriptor,
        edit_rate: EditRate,
        options: WriterOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if options.index_interval == 0 {
            return Err(WrapError::config("index interval must be at least 1"));
        }

        let mut metadata = Vec::new();
        append_set(&mut metadata, &IDENTIFICATION_KEY, identification_set(info)?)?;
        append_set(&mut metadata, &SOURCE_PACKAGE_KEY, package_set(info)?)?;
        let (descriptor_key, descriptor_value) = descriptor_set(descriptor, edit_rate)?;
        append_set(&mut metadata, &descriptor_key, descriptor_value)?;
        append_set(
            &mut metadata,
            &JPEG2000_SUB_DESCRIPTOR_KEY,
            sub_descriptor_set(sub_descriptor)?,
        )?;

        let pack_klv_len = EMPTY_KLV_LEN + PARTITION_PACK_LEN as u64;
        let used = pack_klv_len + metadata.len() as u64;
        let fill_value_len = u64::from(options.header_size)
            .saturating_sub(used)
            .saturating_sub(EMPTY_KLV_LEN);
        append_set(&mut metadata, &FILL_KEY, vec![0u8; fill_value_len as usize])?;

        let header_pack = PartitionPack {
            header_byte_count: metadata.len() as u64,
            body_sid: BODY_SID,
            ..Default::default()
        };

        let file = File::create(path).map_err(|e| {
            WrapError::io(format!("Cannot create track file: {}", path.display()), e)
        })?;
        let mut writer = Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            edit_rate,
            options,
            position: 0,
            header_pack_value_offset: EMPTY_KLV_LEN,
            pending_index: Vec::new(),
            pending_start: 0,
            frames: 0,
            finalized: false,
        };

        writer.write_item(&HEADER_PARTITION_KEY, &header_pack.encode())?;
        writer
            .writer
            .write_all(&metadata)
            .map_err(|e| writer.io_error(e))?;
        writer.position += metadata.len() as u64;

        info!(
            path = %path.display(),
            shape = %descriptor.shape,
            width = descriptor.stored_width,
            height = descriptor.stored_height,
            edit_rate = %edit_rate,
            asset = %info.asset_uuid,
            "Opened track file for writing"
        );

        Ok(writer)
    }

    /// Path of the file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> WrapError {
        WrapError::io(format!("Cannot write track file: {}", self.path.display()), e)
    }

    fn write_item(&mut self, key: &Ul, value: &[u8]) -> Result<u64> {
        let written = write_klv(&mut self.writer, key, value).map_err(|e| self.io_error(e))?;
        self.position += written;
        Ok(written)
    }

    /// Write index segments for every pending entry. Returns bytes written.
    fn flush_index(&mut self) -> Result<u64> {
        let pending = std::mem::take(&mut self.pending_index);
        let mut written = 0;
        let mut start = self.pending_start;

        for entries in pending.chunks(MAX_SEGMENT_ENTRIES) {
            let value = index_segment(self.edit_rate, start, entries)?;
            written += self.write_item(&INDEX_SEGMENT_KEY, &value)?;
            debug!(start, duration = entries.len(), "Wrote index segment");
            start += entries.len() as u64;
        }

        self.pending_start = start;
        Ok(written)
    }
}

impl ContainerWriter for TrackFileWriter {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(WrapError::container(
                "TrackFileWriter",
                "cannot write a frame after finalize",
            ));
        }

        self.pending_index.push(self.position);
        self.write_item(&JPEG2000_FRAME_KEY, frame)?;
        self.frames += 1;

        debug!(frame = self.frames - 1, bytes = frame.len(), "Wrote frame");

        if self.options.index_strategy == IndexStrategy::Follow
            && self.pending_index.len() >= self.options.index_interval as usize
        {
            self.flush_index()?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Ok(());
        }

        if self.options.index_strategy == IndexStrategy::Follow {
            self.flush_index()?;
        }

        let footer_offset = self.position;
        let footer_in_index = self.options.index_strategy == IndexStrategy::Footer;
        let index_bytes: u64 = if footer_in_index {
            self.pending_index
                .chunks(MAX_SEGMENT_ENTRIES)
                .map(|c| {
                    let value_len = index_segment_len(c.len()) as u64;
                    (UL_LEN + encode_ber_length(value_len).len()) as u64 + value_len
                })
                .sum()
        } else {
            0
        };

        let footer_pack = PartitionPack {
            this_partition: footer_offset,
            footer_partition: footer_offset,
            index_byte_count: index_bytes,
            index_sid: if footer_in_index { INDEX_SID } else { 0 },
            ..Default::default()
        };
        self.write_item(&FOOTER_PARTITION_KEY, &footer_pack.encode())?;

        if footer_in_index {
            self.flush_index()?;
        }

        let patch_at = self.header_pack_value_offset + PARTITION_FOOTER_FIELD as u64;
        self.writer
            .seek(SeekFrom::Start(patch_at))
            .and_then(|_| self.writer.write_u64::<BigEndian>(footer_offset))
            .and_then(|_| self.writer.seek(SeekFrom::End(0)).map(|_| ()))
            .and_then(|_| self.writer.flush())
            .map_err(|e| WrapError::io(format!("Cannot finalize track file: {}", self.path.display()), e))?;

        self.finalized = true;

        info!(
            path = %self.path.display(),
            frames = self.frames,
            bytes = self.position,
            "Finalized track file"
        );
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }
}

fn append_set(out: &mut Vec<u8>, key: &Ul, value: Vec<u8>) -> Result<()> {
    write_klv(out, key, &value).map_err(|e| WrapError::io("Cannot encode header metadata", e))?;
    Ok(())
}

fn identification_set(info: &WriterInfo) -> Result<Vec<u8>> {
    LocalSetBuilder::new()
        .utf16(TAG_COMPANY_NAME, &info.company_name)
        .utf16(TAG_PRODUCT_NAME, &info.product_name)
        .utf16(TAG_VERSION_STRING, &info.product_version)
        .bytes(TAG_PRODUCT_UID, info.product_uuid.as_bytes())
        .finish()
}

fn package_set(info: &WriterInfo) -> Result<Vec<u8>> {
    let mut umid = Vec::with_capacity(32);
    umid.extend_from_slice(&UMID_PREFIX);
    umid.extend_from_slice(info.asset_uuid.as_bytes());
    LocalSetBuilder::new().bytes(TAG_PACKAGE_UID, &umid).finish()
}

fn descriptor_set(descriptor: &DescriptorRecord, edit_rate: EditRate) -> Result<(Ul, Vec<u8>)> {
    let mut set = LocalSetBuilder::new();
    set.rational(TAG_SAMPLE_RATE, edit_rate)
        .ul(TAG_ESSENCE_CONTAINER, &JPEG2000_CONTAINER_LABEL)
        .ul(TAG_PICTURE_ESSENCE_CODING, &descriptor.picture_essence_coding)
        .u32(TAG_STORED_WIDTH, descriptor.stored_width)
        .u32(TAG_STORED_HEIGHT, descriptor.stored_height)
        .ul(TAG_TRANSFER_CHARACTERISTIC, &descriptor.transfer_characteristic)
        .ul(TAG_COLOR_PRIMARIES, &descriptor.color_primaries)
        .u32(TAG_COMPONENT_DEPTH, descriptor.component_depth)
        .bytes(TAG_PIXEL_LAYOUT, &descriptor.layout);

    let key = match (descriptor.shape, &descriptor.cdci) {
        (ShapeKind::Cdci, Some(cdci)) => {
            set.ul(TAG_CODING_EQUATIONS, &cdci.coding_equations)
                .u32(TAG_HORIZONTAL_SUBSAMPLING, cdci.horizontal_subsampling)
                .u32(TAG_VERTICAL_SUBSAMPLING, cdci.vertical_subsampling)
                .u32(TAG_WHITE_REF_LEVEL, descriptor.component_max_ref)
                .u32(TAG_BLACK_REF_LEVEL, descriptor.component_min_ref)
                .u32(TAG_COLOR_RANGE, cdci.color_range);
            CDCI_DESCRIPTOR_KEY
        }
        (ShapeKind::Rgba, None) => {
            set.u32(TAG_COMPONENT_MAX_REF, descriptor.component_max_ref)
                .u32(TAG_COMPONENT_MIN_REF, descriptor.component_min_ref);
            RGBA_DESCRIPTOR_KEY
        }
        (shape, _) => {
            return Err(WrapError::container(
                "TrackFileWriter",
                format!("{shape} descriptor has inconsistent CDCI fields"),
            ));
        }
    };

    Ok((key, set.finish()?))
}

fn sub_descriptor_set(sub: &SubDescriptor) -> Result<Vec<u8>> {
    let sizing: Vec<u8> = sub
        .components
        .iter()
        .flat_map(|c| [c.ssiz, c.xrsiz, c.yrsiz])
        .collect();
    LocalSetBuilder::new()
        .u32(TAG_J2K_XSIZ, sub.xsiz)
        .u32(TAG_J2K_YSIZ, sub.ysiz)
        .u16(TAG_J2K_CSIZ, sub.components.len() as u16)
        .bytes(TAG_J2K_COMPONENT_SIZING, &sizing)
        .finish()
}

/// Encoded length of an index segment value with `entries` entries.
fn index_segment_len(entries: usize) -> usize {
    // Five scalar items plus the entry array, each with a 4-byte tag header
    (4 + 8) + (4 + 8) + (4 + 8) + (4 + 4) + (4 + 4) + (4 + 8 + entries * INDEX_ENTRY_LEN)
}

fn index_segment(edit_rate: EditRate, start: u64, offsets: &[u64]) -> Result<Vec<u8>> {
    let mut array = Vec::with_capacity(8 + offsets.len() * INDEX_ENTRY_LEN);
    array.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
    array.extend_from_slice(&(INDEX_ENTRY_LEN as u32).to_be_bytes());
    for offset in offsets {
        // temporal offset, key-frame offset, flags, stream offset
        array.extend_from_slice(&[0, 0, INDEX_ENTRY_RANDOM_ACCESS]);
        array.extend_from_slice(&offset.to_be_bytes());
    }

    LocalSetBuilder::new()
        .rational(TAG_INDEX_EDIT_RATE, edit_rate)
        .u64(TAG_INDEX_START_POSITION, start)
        .u64(TAG_INDEX_DURATION, offsets.len() as u64)
        .u32(TAG_INDEX_SID, INDEX_SID)
        .u32(TAG_BODY_SID, BODY_SID)
        .bytes(TAG_INDEX_ENTRY_ARRAY, &array)
        .finish()
}
