// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Track file container.
//!
//! The pipeline talks to the container through two narrow traits,
//! [`ContainerWriter`] and [`ContainerReader`]. [`TrackFileWriter`] and
//! [`TrackFileReader`] implement them over a KLV track file:
//!
//! ```text
//! header partition pack
//! identification set
//! source package set        (asset UUID)
//! RGBA or CDCI descriptor
//! JPEG 2000 sub-descriptor
//! fill item                 (pads the header to `header_size`)
//! essence element           (one per frame)
//! index table segment       (after every `index_interval` frames, or at the end)
//! ...
//! footer partition pack
//! ```

pub mod constants;
pub mod klv;
pub mod local_set;
pub mod partition;
pub mod reader;
pub mod writer;

pub use reader::TrackFileReader;
pub use writer::TrackFileWriter;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codestream::ImageGeometry;
use crate::core::{EditRate, FrameBuffer, Result, WrapError};
use crate::metadata::{DescriptorRecord, ShapeKind};

/// Product UUID written into the identification set.
pub const DEFAULT_PRODUCT_UUID: Uuid = Uuid::from_bytes([
    0x92, 0x7f, 0xc4, 0xd1, 0x89, 0xa3, 0x4f, 0x88, 0x88, 0xbb, 0xd3, 0x63, 0xed, 0x33, 0x08, 0x4a,
]);

/// Default bytes reserved for the header partition.
pub const DEFAULT_HEADER_SIZE: u32 = 16384;

/// Default number of frames covered by each index segment.
pub const DEFAULT_INDEX_INTERVAL: u32 = 60;

/// Writes frames into a container.
pub trait ContainerWriter {
    /// Append one frame.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Write trailing structures and close the file.
    fn finalize(&mut self) -> Result<()>;

    /// Number of frames written so far.
    fn frames_written(&self) -> u64;
}

/// Reads frames and metadata from a container.
pub trait ContainerReader {
    /// Number of frames in the container.
    fn frame_count(&self) -> u64;

    /// Copy frame `index` into `buffer`.
    fn read_frame(&self, index: u64, buffer: &mut FrameBuffer) -> Result<()>;

    /// Picture descriptor with the given shape, if the container has one.
    fn descriptor_by_shape(&self, shape: ShapeKind) -> Option<&DescriptorRecord>;

    /// Edit rate of the picture track.
    fn edit_rate(&self) -> EditRate;
}

/// Where index table segments are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStrategy {
    /// A segment follows every `index_interval` frames
    #[default]
    Follow,
    /// All segments are written at finalize
    Footer,
}

impl IndexStrategy {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexStrategy::Follow => "follow",
            IndexStrategy::Footer => "footer",
        }
    }
}

impl fmt::Display for IndexStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexStrategy {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "follow" => Ok(IndexStrategy::Follow),
            "footer" => Ok(IndexStrategy::Footer),
            _ => Err(WrapError::config(format!(
                "invalid index strategy '{s}', expected 'follow' or 'footer'"
            ))),
        }
    }
}

/// Track file layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Minimum size of the header partition in bytes
    pub header_size: u32,
    /// Index segment placement
    pub index_strategy: IndexStrategy,
    /// Frames per index segment when following the essence
    pub index_interval: u32,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
            index_strategy: IndexStrategy::Follow,
            index_interval: DEFAULT_INDEX_INTERVAL,
        }
    }
}

/// Identification of the writing application and the asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriterInfo {
    /// Product UUID
    pub product_uuid: Uuid,
    /// Company name
    pub company_name: String,
    /// Product name
    pub product_name: String,
    /// Product version
    pub product_version: String,
    /// Asset UUID
    pub asset_uuid: Uuid,
}

impl WriterInfo {
    /// Identification of this crate with the given asset UUID.
    pub fn new(asset_uuid: Uuid) -> Self {
        Self {
            product_uuid: DEFAULT_PRODUCT_UUID,
            company_name: env!("CARGO_PKG_AUTHORS").to_string(),
            product_name: env!("CARGO_PKG_NAME").to_string(),
            product_version: env!("CARGO_PKG_VERSION").to_string(),
            asset_uuid,
        }
    }

    /// Identification with a random (v4) asset UUID.
    pub fn with_random_asset() -> Self {
        Self::new(Uuid::new_v4())
    }
}

impl Default for WriterInfo {
    fn default() -> Self {
        Self::with_random_asset()
    }
}

/// Per-component sizing carried by the JPEG 2000 sub-descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentSizing {
    /// Ssiz field: sign bit and depth minus one
    pub ssiz: u8,
    /// Horizontal separation
    pub xrsiz: u8,
    /// Vertical separation
    pub yrsiz: u8,
}

/// JPEG 2000 sub-descriptor fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubDescriptor {
    /// Reference grid width
    pub xsiz: u32,
    /// Reference grid height
    pub ysiz: u32,
    /// Component sizing
    pub components: Vec<ComponentSizing>,
}

impl SubDescriptor {
    /// Copy the sizing fields of a parsed codestream header as they are.
    pub fn from_geometry(geometry: &ImageGeometry) -> Self {
        let (xsiz, ysiz) = geometry.reference_grid;
        Self {
            xsiz,
            ysiz,
            components: geometry
                .ssiz
                .iter()
                .zip(&geometry.subsampling)
                .map(|(&ssiz, &(xrsiz, yrsiz))| ComponentSizing { ssiz, xrsiz, yrsiz })
                .collect(),
        }
    }
}
