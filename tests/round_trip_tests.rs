// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wrap then unwrap round-trip tests.
//!
//! Codestreams go through the full pipeline into a track file and back out,
//! and must come back byte for byte, in order, with the edit rate and a
//! component flag matching the chosen component scheme.

mod common;

use std::cell::RefCell;
use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;
use std::rc::Rc;

use common::{
    codestream_frames, multiplex_bytes, split_multiplex, temp_dir, write_frames,
    CodestreamBuilder,
};
use j2kwrap::container::{IndexStrategy, WriterInfo, WriterOptions};
use j2kwrap::multiplex::ComponentFlag;
use j2kwrap::pipeline::unwrap::DEFAULT_BUFFER_CAPACITY;
use j2kwrap::sequence::{FileListSource, MultiplexedContainerSource, SyntheticSource};
use j2kwrap::{
    unwrap, wrap, CodestreamSequence, CodestreamSource, ComponentScheme, ContainerReader,
    EditRate, J2kHeaderParser, Quantization, ShapeKind, TrackFileReader, TrackFileWriter,
    UnwrapTarget, WrapError, WrapOptions, WrapStats,
};

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn wrap_into<S: CodestreamSequence>(
    source: &mut S,
    options: &WrapOptions,
    writer_options: WriterOptions,
    path: &Path,
) -> j2kwrap::Result<WrapStats> {
    wrap(
        source,
        &J2kHeaderParser::new(),
        options,
        |descriptor, sub_descriptor, rate| {
            TrackFileWriter::open_for_write(
                path,
                &WriterInfo::default(),
                descriptor,
                sub_descriptor,
                rate,
                writer_options,
            )
        },
    )
}

fn unwrap_to_multiplex(path: &Path) -> (Vec<u8>, j2kwrap::UnwrapStats) {
    let reader = TrackFileReader::open_for_read(path).unwrap();
    let output = SharedBuffer::default();
    let stats = unwrap(
        &reader,
        UnwrapTarget::Multiplex(Box::new(output.clone())),
        DEFAULT_BUFFER_CAPACITY,
    )
    .unwrap();
    let bytes = output.0.borrow().clone();
    (bytes, stats)
}

fn ycc_options() -> WrapOptions {
    WrapOptions {
        colorimetry: "Color3".to_string(),
        component_scheme: ComponentScheme::YCbCr,
        quantization: Quantization::Partial,
        edit_rate: EditRate::new(25, 1).unwrap(),
        ..WrapOptions::default()
    }
}

#[test]
fn test_file_list_round_trip() {
    let (dir, _guard) = temp_dir("rt_files");
    let frames = codestream_frames(&CodestreamBuilder::new(), 9);
    let paths = write_frames(&dir.join("in"), &frames);
    let track = dir.join("track.mxf");

    let mut source = FileListSource::from_paths(paths).unwrap();
    let stats = wrap_into(
        &mut source,
        &WrapOptions::default(),
        WriterOptions::default(),
        &track,
    )
    .unwrap();
    assert_eq!(stats.frames, 9);
    assert_eq!(
        stats.bytes,
        frames.iter().map(|f| f.len() as u64).sum::<u64>()
    );
    assert_eq!(stats.descriptor.shape, ShapeKind::Rgba);

    let out = dir.join("out");
    fs::create_dir(&out).unwrap();
    let reader = TrackFileReader::open_for_read(&track).unwrap();
    let unwrapped = unwrap(
        &reader,
        UnwrapTarget::FileList(out.clone()),
        DEFAULT_BUFFER_CAPACITY,
    )
    .unwrap();
    assert_eq!(unwrapped.frames, 9);
    assert_eq!(unwrapped.edit_rate, EditRate::FPS_24);
    assert_eq!(unwrapped.component_flag, ComponentFlag::Rgb);

    for (i, frame) in frames.iter().enumerate() {
        let written = fs::read(out.join(format!("{i:06}.j2c"))).unwrap();
        assert_eq!(&written, frame, "frame {i}");
    }
    assert!(!out.join("000009.j2c").exists());
}

#[test]
fn test_multiplex_round_trip_ycc() {
    let (dir, _guard) = temp_dir("rt_mjc");
    let builder = CodestreamBuilder::ht().depth_and_chroma(10, 2);
    let frames = codestream_frames(&builder, 6);
    let input = multiplex_bytes(25, 1, 1, &frames);
    let track = dir.join("track.mxf");

    let mut source: CodestreamSource =
        MultiplexedContainerSource::new(Box::new(Cursor::new(input)) as Box<dyn Read>)
            .unwrap()
            .into();
    let mut options = ycc_options();
    options.edit_rate = source.edit_rate_hint().unwrap();
    let stats = wrap_into(&mut source, &options, WriterOptions::default(), &track).unwrap();
    assert_eq!(stats.descriptor.shape, ShapeKind::Cdci);

    let (bytes, unwrapped) = unwrap_to_multiplex(&track);
    assert_eq!(unwrapped.component_flag, ComponentFlag::Ycc);

    let ((num, den, flags), out_frames) = split_multiplex(&bytes);
    assert_eq!((num, den), (25, 1));
    assert_eq!(flags, 1);
    assert_eq!(out_frames, frames);
}

#[test]
fn test_ycc_420_keeps_codestream_sizing() {
    let (dir, _guard) = temp_dir("rt_420");
    let builder = CodestreamBuilder::ht().components(vec![(9, 1, 1), (9, 2, 2), (9, 2, 2)]);
    let frames = codestream_frames(&builder, 3);
    let track = dir.join("track.mxf");

    let mut source = FileListSource::from_paths(write_frames(&dir.join("in"), &frames)).unwrap();
    let stats = wrap_into(&mut source, &ycc_options(), WriterOptions::default(), &track).unwrap();
    assert_eq!(stats.descriptor.shape, ShapeKind::Cdci);
    assert_eq!(stats.sub_descriptor.components[1].yrsiz, 2);

    let reader = TrackFileReader::open_for_read(&track).unwrap();
    let sub = reader.sub_descriptor().unwrap();
    assert_eq!(sub, &stats.sub_descriptor);
    assert_eq!((sub.xsiz, sub.ysiz), (1920, 1080));
    let sizing: Vec<(u8, u8, u8)> = sub
        .components
        .iter()
        .map(|c| (c.ssiz, c.xrsiz, c.yrsiz))
        .collect();
    assert_eq!(sizing, vec![(9, 1, 1), (9, 2, 2), (9, 2, 2)]);

    let (_, out_frames) = split_multiplex(&unwrap_to_multiplex(&track).0);
    assert_eq!(out_frames, frames);
}

#[test]
fn test_cbr_multiplex_becomes_vbr() {
    let (dir, _guard) = temp_dir("rt_cbr");
    let frame = CodestreamBuilder::new().build();
    let frames = vec![frame; 4];
    let input = multiplex_bytes(24, 1, 4 | 2, &frames);
    let track = dir.join("track.mxf");

    let mut source =
        MultiplexedContainerSource::new(Box::new(Cursor::new(input)) as Box<dyn Read>).unwrap();
    wrap_into(
        &mut source,
        &WrapOptions::default(),
        WriterOptions::default(),
        &track,
    )
    .unwrap();

    let (bytes, _) = unwrap_to_multiplex(&track);
    let ((_, _, flags), out_frames) = split_multiplex(&bytes);
    assert_eq!(flags & 0x4, 0);
    assert_eq!(flags & 0x3, 2);
    assert_eq!(out_frames, frames);
}

#[test]
fn test_round_trip_both_index_strategies() {
    let (dir, _guard) = temp_dir("rt_index");
    let frames = codestream_frames(&CodestreamBuilder::ht(), 25);

    for strategy in [IndexStrategy::Follow, IndexStrategy::Footer] {
        let track = dir.join(format!("{strategy}.mxf"));
        let writer_options = WriterOptions {
            index_strategy: strategy,
            index_interval: 7,
            ..WriterOptions::default()
        };
        let mut source =
            FileListSource::from_paths(write_frames(&dir.join(strategy.as_str()), &frames))
                .unwrap();
        wrap_into(&mut source, &WrapOptions::default(), writer_options, &track).unwrap();

        let reader = TrackFileReader::open_for_read(&track).unwrap();
        assert_eq!(reader.frame_count(), 25);
        assert_eq!(reader.index_in_footer(), strategy == IndexStrategy::Footer);

        let (bytes, _) = unwrap_to_multiplex(&track);
        let (_, out_frames) = split_multiplex(&bytes);
        assert_eq!(out_frames, frames, "{strategy}");
    }
}

#[test]
fn test_synthetic_wrap() {
    let (dir, _guard) = temp_dir("rt_fake");
    let track = dir.join("fake.mxf");
    let mut source = SyntheticSource::new(5, 2048);
    let options = WrapOptions {
        component_scheme: ComponentScheme::Rgb,
        ..WrapOptions::default()
    };
    let stats = wrap_into(&mut source, &options, WriterOptions::default(), &track).unwrap();
    assert_eq!(stats.frames, 5);
    assert_eq!(stats.bytes, 5 * 2048);
    assert_eq!(stats.descriptor.stored_width, 3840);
    assert_eq!(stats.descriptor.component_depth, 16);

    let reader = TrackFileReader::open_for_read(&track).unwrap();
    assert_eq!(reader.frame(4).unwrap().len(), 2048);
}

#[test]
fn test_empty_source_fails() {
    let (dir, _guard) = temp_dir("rt_empty");
    let track = dir.join("empty.mxf");
    let mut source = FileListSource::from_paths(Vec::<std::path::PathBuf>::new()).unwrap();
    let err = wrap_into(
        &mut source,
        &WrapOptions::default(),
        WriterOptions::default(),
        &track,
    )
    .unwrap_err();
    assert!(matches!(err, WrapError::EmptySequence));
    assert!(!track.exists());
}

#[test]
fn test_unknown_colorimetry_fails_before_reading() {
    let (dir, _guard) = temp_dir("rt_colorimetry");
    let track = dir.join("never.mxf");
    let mut source = SyntheticSource::new(1, 1024);
    let options = WrapOptions {
        colorimetry: "NoSuchScheme".to_string(),
        ..WrapOptions::default()
    };
    let err = wrap_into(&mut source, &options, WriterOptions::default(), &track).unwrap_err();
    assert!(matches!(err, WrapError::UnknownColorimetryScheme { .. }));
    assert!(!track.exists());
}

#[test]
fn test_invalid_first_frame_leaves_no_file() {
    let (dir, _guard) = temp_dir("rt_invalid");
    let track = dir.join("never.mxf");
    let mut source = FileListSource::from_reader(Cursor::new(vec![0u8; 64])).unwrap();
    let err = wrap_into(
        &mut source,
        &WrapOptions::default(),
        WriterOptions::default(),
        &track,
    )
    .unwrap_err();
    assert!(matches!(err, WrapError::MalformedCodestream { .. }));
    assert!(!track.exists());
}
