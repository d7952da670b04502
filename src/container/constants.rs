// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Track file keys and local tags.
//!
//! Shared by [`super::TrackFileWriter`] and [`super::TrackFileReader`] so
//! both sides agree on every byte.

use crate::core::Ul;

// Partition packs

/// Closed and complete header partition pack.
pub const HEADER_PARTITION_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x02, 0x04, 0x00,
]);
/// Closed and complete footer partition pack.
pub const FOOTER_PARTITION_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x05, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x04, 0x04, 0x00,
]);

// Metadata sets

/// Identification set.
pub const IDENTIFICATION_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, 0x30, 0x00,
]);
/// Source package set.
pub const SOURCE_PACKAGE_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, 0x37, 0x00,
]);
/// CDCI picture essence descriptor set.
pub const CDCI_DESCRIPTOR_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, 0x28, 0x00,
]);
/// RGBA picture essence descriptor set.
pub const RGBA_DESCRIPTOR_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, 0x29, 0x00,
]);
/// JPEG 2000 picture sub-descriptor set.
pub const JPEG2000_SUB_DESCRIPTOR_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x01, 0x01, 0x01, 0x01, 0x5a, 0x00,
]);
/// Index table segment.
pub const INDEX_SEGMENT_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x02, 0x53, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x10, 0x01, 0x00,
]);
/// KLV fill item.
pub const FILL_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x02, 0x03, 0x01, 0x02, 0x10, 0x01, 0x00, 0x00, 0x00,
]);

// Essence

/// Frame-wrapped JPEG 2000 picture element, track 1.
pub const JPEG2000_FRAME_KEY: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x01, 0x02, 0x01, 0x01, 0x0d, 0x01, 0x03, 0x01, 0x15, 0x01, 0x08, 0x01,
]);
/// OP1a operational pattern.
pub const OP1A_LABEL: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x0d, 0x01, 0x02, 0x01, 0x01, 0x01, 0x09, 0x00,
]);
/// Frame-wrapped JPEG 2000 essence container.
pub const JPEG2000_CONTAINER_LABEL: Ul = Ul([
    0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x07, 0x0d, 0x01, 0x03, 0x01, 0x02, 0x0c, 0x01, 0x00,
]);

/// First 16 bytes of a basic SMPTE UMID; the asset UUID fills the rest.
pub const UMID_PREFIX: [u8; 16] = [
    0x06, 0x0a, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x05, 0x01, 0x01, 0x0f, 0x20, 0x13, 0x00, 0x00, 0x00,
];

// Partition pack layout

/// Partition pack major version.
pub const PARTITION_MAJOR_VERSION: u16 = 1;
/// Partition pack minor version.
pub const PARTITION_MINOR_VERSION: u16 = 3;
/// Offset of the FooterPartition field within a partition pack value.
pub const PARTITION_FOOTER_FIELD: usize = 24;
/// Body stream identifier of the picture track.
pub const BODY_SID: u32 = 1;
/// Index stream identifier.
pub const INDEX_SID: u32 = 129;

// Local tags

/// Identification: company name (UTF-16BE)
pub const TAG_COMPANY_NAME: u16 = 0x3c01;
/// Identification: product name (UTF-16BE)
pub const TAG_PRODUCT_NAME: u16 = 0x3c02;
/// Identification: version string (UTF-16BE)
pub const TAG_VERSION_STRING: u16 = 0x3c04;
/// Identification: product UID
pub const TAG_PRODUCT_UID: u16 = 0x3c05;
/// Package: UMID
pub const TAG_PACKAGE_UID: u16 = 0x4401;
/// Descriptor: sample rate (two u32)
pub const TAG_SAMPLE_RATE: u16 = 0x3001;
/// Descriptor: essence container label
pub const TAG_ESSENCE_CONTAINER: u16 = 0x3004;
/// Descriptor: picture essence coding label
pub const TAG_PICTURE_ESSENCE_CODING: u16 = 0x3201;
/// Descriptor: stored height
pub const TAG_STORED_HEIGHT: u16 = 0x3202;
/// Descriptor: stored width
pub const TAG_STORED_WIDTH: u16 = 0x3203;
/// Descriptor: transfer characteristic label
pub const TAG_TRANSFER_CHARACTERISTIC: u16 = 0x3210;
/// Descriptor: color primaries label
pub const TAG_COLOR_PRIMARIES: u16 = 0x3219;
/// Descriptor: coding equations label (CDCI)
pub const TAG_CODING_EQUATIONS: u16 = 0x321a;
/// Descriptor: component depth
pub const TAG_COMPONENT_DEPTH: u16 = 0x3301;
/// Descriptor: horizontal subsampling (CDCI)
pub const TAG_HORIZONTAL_SUBSAMPLING: u16 = 0x3302;
/// Descriptor: black reference level (CDCI)
pub const TAG_BLACK_REF_LEVEL: u16 = 0x3304;
/// Descriptor: white reference level (CDCI)
pub const TAG_WHITE_REF_LEVEL: u16 = 0x3305;
/// Descriptor: color range (CDCI)
pub const TAG_COLOR_RANGE: u16 = 0x3306;
/// Descriptor: vertical subsampling (CDCI)
pub const TAG_VERTICAL_SUBSAMPLING: u16 = 0x3308;
/// Descriptor: pixel layout
pub const TAG_PIXEL_LAYOUT: u16 = 0x3401;
/// Descriptor: component max ref (RGBA)
pub const TAG_COMPONENT_MAX_REF: u16 = 0x3406;
/// Descriptor: component min ref (RGBA)
pub const TAG_COMPONENT_MIN_REF: u16 = 0x3407;
/// Sub-descriptor: Xsiz
pub const TAG_J2K_XSIZ: u16 = 0x8001;
/// Sub-descriptor: Ysiz
pub const TAG_J2K_YSIZ: u16 = 0x8002;
/// Sub-descriptor: Csiz
pub const TAG_J2K_CSIZ: u16 = 0x8003;
/// Sub-descriptor: per-component (Ssiz, XRsiz, YRsiz)
pub const TAG_J2K_COMPONENT_SIZING: u16 = 0x8004;
/// Index: edit rate
pub const TAG_INDEX_EDIT_RATE: u16 = 0x3f0b;
/// Index: start position
pub const TAG_INDEX_START_POSITION: u16 = 0x3f0c;
/// Index: duration
pub const TAG_INDEX_DURATION: u16 = 0x3f0d;
/// Index: stream identifier
pub const TAG_INDEX_SID: u16 = 0x3f06;
/// Index: body stream identifier
pub const TAG_BODY_SID: u16 = 0x3f07;
/// Index: entry array
pub const TAG_INDEX_ENTRY_ARRAY: u16 = 0x3f0a;

/// Bytes per index entry: temporal offset, key-frame offset, flags, stream offset.
pub const INDEX_ENTRY_LEN: usize = 11;
/// Index entry flags of a random-access frame.
pub const INDEX_ENTRY_RANDOM_ACCESS: u8 = 0x80;
