// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Sequential codestream sources.
//!
//! A source yields codestreams one at a time. It starts positioned on the
//! first frame (or already exhausted when the input is empty); the caller
//! copies the current frame out with [`CodestreamSequence::materialize_into`]
//! and moves on with [`CodestreamSequence::advance`].
//!
//! ```text
//! INIT --first fill--> READY --advance--> READY ... --advance--> EXHAUSTED
//! ```
//!
//! Three sources are provided:
//! - [`FileListSource`] - one codestream per file, or one per stream
//! - [`MultiplexedContainerSource`] - an `MJC2` multiplex
//! - [`SyntheticSource`] - generated frames for throughput testing

pub mod file_list;
pub mod multiplex;
pub mod synthetic;

pub use file_list::FileListSource;
pub use multiplex::MultiplexedContainerSource;
pub use synthetic::SyntheticSource;

use std::io::Read;

use crate::core::{EditRate, FrameBuffer, Result};

/// Protocol shared by every codestream source.
pub trait CodestreamSequence {
    /// True while a current frame is available.
    fn has_more(&self) -> bool;

    /// Move to the next frame. Calling this on an exhausted source is a no-op.
    fn advance(&mut self) -> Result<()>;

    /// Bytes of the current frame. Empty once exhausted.
    fn current(&self) -> &[u8];

    /// Copy the current frame into `buffer`.
    fn materialize_into(&self, buffer: &mut FrameBuffer) -> Result<()> {
        buffer.set_data(self.current())
    }
}

/// Position of a source within its input.
#[derive(Debug, Clone, Default)]
pub struct SequenceCursor {
    /// True while `current` holds a frame
    pub has_more: bool,
    /// Bytes of the current frame
    pub current: Vec<u8>,
}

impl SequenceCursor {
    /// Mark the sequence as finished and drop the last frame.
    pub fn exhaust(&mut self) {
        self.has_more = false;
        self.current.clear();
    }
}

/// Any of the supported sources.
pub enum CodestreamSource {
    /// Raw codestream files or a single stream
    FileList(FileListSource),
    /// `MJC2` multiplex
    Multiplex(MultiplexedContainerSource<Box<dyn Read>>),
    /// Generated frames
    Synthetic(SyntheticSource),
}

impl CodestreamSource {
    /// Edit rate carried by the input, if the format has one.
    pub fn edit_rate_hint(&self) -> Option<EditRate> {
        match self {
            CodestreamSource::Multiplex(source) => Some(source.header().edit_rate),
            CodestreamSource::FileList(_) | CodestreamSource::Synthetic(_) => None,
        }
    }

    /// Short name of the source kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            CodestreamSource::FileList(_) => "file-list",
            CodestreamSource::Multiplex(_) => "multiplex",
            CodestreamSource::Synthetic(_) => "synthetic",
        }
    }

    /// Number of frames, when known up front.
    pub fn frame_count_hint(&self) -> Option<u64> {
        match self {
            CodestreamSource::FileList(source) => Some(source.remaining() as u64),
            CodestreamSource::Synthetic(source) => Some(u64::from(source.frame_count())),
            CodestreamSource::Multiplex(_) => None,
        }
    }
}

impl CodestreamSequence for CodestreamSource {
    fn has_more(&self) -> bool {
        match self {
            CodestreamSource::FileList(s) => s.has_more(),
            CodestreamSource::Multiplex(s) => s.has_more(),
            CodestreamSource::Synthetic(s) => s.has_more(),
        }
    }

    fn advance(&mut self) -> Result<()> {
        match self {
            CodestreamSource::FileList(s) => s.advance(),
            CodestreamSource::Multiplex(s) => s.advance(),
            CodestreamSource::Synthetic(s) => s.advance(),
        }
    }

    fn current(&self) -> &[u8] {
        match self {
            CodestreamSource::FileList(s) => s.current(),
            CodestreamSource::Multiplex(s) => s.current(),
            CodestreamSource::Synthetic(s) => s.current(),
        }
    }
}

impl From<FileListSource> for CodestreamSource {
    fn from(source: FileListSource) -> Self {
        CodestreamSource::FileList(source)
    }
}

impl From<MultiplexedContainerSource<Box<dyn Read>>> for CodestreamSource {
    fn from(source: MultiplexedContainerSource<Box<dyn Read>>) -> Self {
        CodestreamSource::Multiplex(source)
    }
}

impl From<SyntheticSource> for CodestreamSource {
    fn from(source: SyntheticSource) -> Self {
        CodestreamSource::Synthetic(source)
    }
}

/// Read until `buf` is full or the reader reports end of stream.
///
/// Returns the number of bytes read. Interrupted reads are retried.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
