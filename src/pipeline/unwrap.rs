// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Container frames back into codestreams.

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

use crate::container::ContainerReader;
use crate::core::{EditRate, FrameBuffer, Result};
use crate::metadata::ShapeKind;
use crate::multiplex::{ComponentFlag, FileListWriter, FrameSink, MultiplexHeader, MultiplexWriter};

/// Default largest frame accepted when unwrapping (8192 x 8192 x 3 x 2 bytes).
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192 * 8192 * 3 * 2;

/// Where unwrapped codestreams go.
pub enum UnwrapTarget {
    /// One `<index:06>.j2c` file per frame in an existing directory
    FileList(PathBuf),
    /// An `MJC2` multiplex with variable-bitrate framing
    Multiplex(Box<dyn Write>),
}

/// Result of an unwrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwrapStats {
    /// Frames written
    pub frames: u64,
    /// Codestream bytes written
    pub bytes: u64,
    /// Edit rate read from the container
    pub edit_rate: EditRate,
    /// Component flag derived from the descriptor shape
    pub component_flag: ComponentFlag,
}

/// Header describing the contents of `reader` as a multiplex.
///
/// The component flag is RGB when the container has an RGBA descriptor and
/// YCC otherwise. The constant-bitrate bit is always clear.
pub fn multiplex_header_for<R: ContainerReader + ?Sized>(reader: &R) -> MultiplexHeader {
    MultiplexHeader {
        edit_rate: reader.edit_rate(),
        component_flag: Some(component_flag_for(reader)),
        constant_bitrate: false,
    }
}

fn component_flag_for<R: ContainerReader + ?Sized>(reader: &R) -> ComponentFlag {
    if reader.descriptor_by_shape(ShapeKind::Rgba).is_some() {
        ComponentFlag::Rgb
    } else {
        ComponentFlag::Ycc
    }
}

/// Write every frame of `reader`, in index order, to `target`.
///
/// Frames larger than `buffer_capacity` bytes fail the run.
pub fn unwrap<R: ContainerReader + ?Sized>(
    reader: &R,
    target: UnwrapTarget,
    buffer_capacity: usize,
) -> Result<UnwrapStats> {
    unwrap_with_progress(reader, target, buffer_capacity, |_, _| {})
}

/// [`unwrap()`] with a callback invoked after each frame with the frame
/// index and its size.
pub fn unwrap_with_progress<R, C>(
    reader: &R,
    target: UnwrapTarget,
    buffer_capacity: usize,
    mut on_frame: C,
) -> Result<UnwrapStats>
where
    R: ContainerReader + ?Sized,
    C: FnMut(u64, usize),
{
    let header = multiplex_header_for(reader);

    let mut sink: Box<dyn FrameSink> = match target {
        UnwrapTarget::FileList(dir) => Box::new(FileListWriter::new(dir)?),
        UnwrapTarget::Multiplex(output) => Box::new(MultiplexWriter::new(output, header)?),
    };

    let mut buffer = FrameBuffer::with_capacity_limit(buffer_capacity);
    let mut bytes = 0u64;
    for index in 0..reader.frame_count() {
        reader.read_frame(index, &mut buffer)?;
        sink.write_frame(buffer.data())?;
        bytes += buffer.len() as u64;
        on_frame(index, buffer.len());
    }
    sink.finish()?;

    let stats = UnwrapStats {
        frames: sink.frames_written(),
        bytes,
        edit_rate: header.edit_rate,
        component_flag: component_flag_for(reader),
    };

    info!(
        frames = stats.frames,
        bytes = stats.bytes,
        edit_rate = %stats.edit_rate,
        components = %stats.component_flag,
        "Unwrap complete"
    );

    Ok(stats)
}
