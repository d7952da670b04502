// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codestream output sinks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use super::MultiplexHeader;
use crate::core::{Result, WrapError};

/// Destination for unwrapped codestreams.
pub trait FrameSink {
    /// Write one codestream.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Flush buffered output.
    fn finish(&mut self) -> Result<()>;

    /// Number of codestreams written so far.
    fn frames_written(&self) -> u64;
}

/// Writes a variable-bitrate `MJC2` multiplex.
///
/// The header is written on construction. Every codestream gets its own
/// length prefix.
pub struct MultiplexWriter<W: Write> {
    writer: W,
    header: MultiplexHeader,
    frames: u64,
}

impl<W: Write> MultiplexWriter<W> {
    /// Write `header` and return a writer positioned on the first frame.
    pub fn new(mut writer: W, header: MultiplexHeader) -> Result<Self> {
        if header.constant_bitrate {
            return Err(WrapError::config("multiplex output is always variable bitrate"));
        }
        writer
            .write_all(&header.encode())
            .map_err(|e| WrapError::io("Cannot write multiplex header", e))?;

        Ok(Self {
            writer,
            header,
            frames: 0,
        })
    }

    /// Header written at the start of the multiplex.
    pub fn header(&self) -> &MultiplexHeader {
        &self.header
    }

    /// Return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_length(&mut self, length: u32) -> Result<()> {
        self.writer
            .write_u32::<BigEndian>(length)
            .map_err(|e| WrapError::io("Cannot write codestream length", e))
    }
}

impl<W: Write> FrameSink for MultiplexWriter<W> {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let length = u32::try_from(frame.len()).map_err(|_| {
            WrapError::container(
                "MultiplexWriter",
                format!("frame of {} bytes does not fit a 32-bit length", frame.len()),
            )
        })?;

        self.write_length(length)?;
        self.writer
            .write_all(frame)
            .map_err(|e| WrapError::io("Cannot write codestream to multiplex", e))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| WrapError::io("Cannot flush multiplex output", e))
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }
}

/// Writes each codestream to `<dir>/<index:06>.j2c`, starting at `000000`.
#[derive(Debug)]
pub struct FileListWriter {
    dir: PathBuf,
    frames: u64,
}

impl FileListWriter {
    /// Target an existing directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(WrapError::io(
                format!("Output directory does not exist: {}", dir.display()),
                io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            frames: 0,
        })
    }

    /// Path the frame with `index` is written to.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("{index:06}.j2c"))
    }
}

impl FrameSink for FileListWriter {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        let path = self.frame_path(self.frames);
        let file = File::create(&path)
            .map_err(|e| WrapError::io(format!("Cannot create file: {}", path.display()), e))?;

        let mut writer = BufWriter::new(file);
        writer
            .write_all(frame)
            .and_then(|_| writer.flush())
            .map_err(|e| WrapError::io(format!("Cannot write file: {}", path.display()), e))?;

        debug!(path = %path.display(), bytes = frame.len(), "Wrote codestream file");
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EditRate;
    use crate::multiplex::ComponentFlag;

    fn header(cbr: bool) -> MultiplexHeader {
        MultiplexHeader {
            edit_rate: EditRate::FPS_24,
            component_flag: Some(ComponentFlag::Ycc),
            constant_bitrate: cbr,
        }
    }

    #[test]
    fn test_vbr_framing() {
        let mut writer = MultiplexWriter::new(Vec::new(), header(false)).unwrap();
        writer.write_frame(&[1, 2, 3]).unwrap();
        writer.write_frame(&[4]).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.frames_written(), 2);

        let bytes = writer.into_inner();
        assert_eq!(&bytes[..4], b"MJC2");
        assert_eq!(&bytes[12..16], &[0, 0, 0, 1]);
        assert_eq!(&bytes[16..], &[0, 0, 0, 3, 1, 2, 3, 0, 0, 0, 1, 4]);
    }

    #[test]
    fn test_cbr_header_rejected() {
        let result = MultiplexWriter::new(Vec::new(), header(true));
        assert!(matches!(result, Err(WrapError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_file_list_writer_requires_directory() {
        let err = FileListWriter::new("/nonexistent/j2kwrap/out").unwrap_err();
        assert!(matches!(err, WrapError::Io { .. }));
    }

    #[test]
    fn test_frame_path_format() {
        let writer = FileListWriter {
            dir: PathBuf::from("out"),
            frames: 0,
        };
        assert_eq!(writer.frame_path(0), PathBuf::from("out/000000.j2c"));
        assert_eq!(writer.frame_path(1234), PathBuf::from("out/001234.j2c"));
    }
}
