// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codestreams into a container.

use tracing::{debug, info};

use crate::codestream::HeaderParser;
use crate::container::{ContainerWriter, SubDescriptor};
use crate::core::{ComponentScheme, EditRate, FrameBuffer, Quantization, Result, WrapError};
use crate::metadata::colorimetry::{ColorimetryRegistry, DEFAULT_SCHEME};
use crate::metadata::{build_descriptor, DescriptorRecord};
use crate::sequence::CodestreamSequence;

/// User choices for a wrap run.
#[derive(Debug, Clone)]
pub struct WrapOptions {
    /// Colorimetry scheme name
    pub colorimetry: String,
    /// How components map to colors
    pub component_scheme: ComponentScheme,
    /// Sample range
    pub quantization: Quantization,
    /// Edit rate of the track
    pub edit_rate: EditRate,
    /// Schemes `colorimetry` is looked up in
    pub registry: ColorimetryRegistry,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            colorimetry: DEFAULT_SCHEME.to_string(),
            component_scheme: ComponentScheme::Xyz,
            quantization: Quantization::Full,
            edit_rate: EditRate::FPS_24,
            registry: ColorimetryRegistry::standard(),
        }
    }
}

/// Result of a wrap run.
#[derive(Debug, Clone)]
pub struct WrapStats {
    /// Frames written
    pub frames: u64,
    /// Codestream bytes written
    pub bytes: u64,
    /// Descriptor resolved from the first frame
    pub descriptor: DescriptorRecord,
    /// Codestream sizing of the first frame
    pub sub_descriptor: SubDescriptor,
}

/// Wrap every codestream of `source` into the writer returned by
/// `open_writer`.
///
/// The writer is opened once the first codestream has been parsed, with the
/// resolved descriptor, the sub-descriptor copied from the codestream header
/// and the edit rate. Later frames are written as they
/// are, without re-validation.
pub fn wrap<S, P, W, F>(
    source: &mut S,
    parser: &P,
    options: &WrapOptions,
    open_writer: F,
) -> Result<WrapStats>
where
    S: CodestreamSequence + ?Sized,
    P: HeaderParser + ?Sized,
    W: ContainerWriter,
    F: FnOnce(&DescriptorRecord, &SubDescriptor, EditRate) -> Result<W>,
{
    wrap_with_progress(source, parser, options, open_writer, |_, _| {})
}

/// [`wrap()`] with a callback invoked after each frame with the frame index
/// and its size.
pub fn wrap_with_progress<S, P, W, F, C>(
    source: &mut S,
    parser: &P,
    options: &WrapOptions,
    open_writer: F,
    mut on_frame: C,
) -> Result<WrapStats>
where
    S: CodestreamSequence + ?Sized,
    P: HeaderParser + ?Sized,
    W: ContainerWriter,
    F: FnOnce(&DescriptorRecord, &SubDescriptor, EditRate) -> Result<W>,
    C: FnMut(u64, usize),
{
    let scheme = options.registry.from_name(&options.colorimetry)?;

    if !source.has_more() {
        return Err(WrapError::EmptySequence);
    }

    let mut buffer = FrameBuffer::new();
    source.materialize_into(&mut buffer)?;

    let geometry = parser.parse(buffer.data())?;
    let descriptor = build_descriptor(
        &geometry,
        scheme,
        options.component_scheme,
        options.quantization,
    )?;
    let sub_descriptor = SubDescriptor::from_geometry(&geometry);
    let mut writer = open_writer(&descriptor, &sub_descriptor, options.edit_rate)?;

    let mut frames = 0u64;
    let mut bytes = 0u64;
    loop {
        writer.write_frame(buffer.data())?;
        on_frame(frames, buffer.len());
        frames += 1;
        bytes += buffer.len() as u64;

        source.advance()?;
        if !source.has_more() {
            break;
        }
        source.materialize_into(&mut buffer)?;
    }

    writer.finalize()?;
    debug!(frames = writer.frames_written(), "Container finalized");

    info!(
        frames,
        bytes,
        shape = %descriptor.shape,
        colorimetry = %scheme.name,
        "Wrap complete"
    );

    Ok(WrapStats {
        frames,
        bytes,
        descriptor,
        sub_descriptor,
    })
}
