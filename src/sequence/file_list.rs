// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Raw codestream files.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CodestreamSequence, SequenceCursor};
use crate::core::{Result, WrapError};

/// One codestream per file, or a single codestream read from a stream.
///
/// Files are consumed in the order given. The frame buffer is reused from
/// one file to the next.
#[derive(Debug)]
pub struct FileListSource {
    cursor: SequenceCursor,
    /// Remaining paths, last element is the next file
    pending: Vec<PathBuf>,
}

impl FileListSource {
    /// Read one codestream from `reader`, up to end of stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut cursor = SequenceCursor::default();
        reader
            .read_to_end(&mut cursor.current)
            .map_err(|e| WrapError::io("Cannot read codestream from stream", e))?;
        cursor.has_more = true;

        debug!(bytes = cursor.current.len(), "Read codestream from stream");

        Ok(Self {
            cursor,
            pending: Vec::new(),
        })
    }

    /// One codestream per path, produced in the order given.
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut pending: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        pending.reverse();

        let mut source = Self {
            cursor: SequenceCursor::default(),
            pending,
        };
        source.advance()?;
        Ok(source)
    }

    /// One codestream per regular file in `dir`, sorted by file name.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_paths(list_directory(dir.as_ref())?)
    }

    /// Frames not yet consumed, including the current one.
    pub fn remaining(&self) -> usize {
        self.pending.len() + usize::from(self.cursor.has_more)
    }
}

impl CodestreamSequence for FileListSource {
    fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    fn advance(&mut self) -> Result<()> {
        let Some(path) = self.pending.pop() else {
            self.cursor.exhaust();
            return Ok(());
        };

        let mut file = File::open(&path).map_err(|e| {
            WrapError::io(format!("Cannot open file: {}", path.display()), e)
        })?;

        self.cursor.current.clear();
        file.read_to_end(&mut self.cursor.current).map_err(|e| {
            WrapError::io(format!("Cannot read file: {}", path.display()), e)
        })?;
        self.cursor.has_more = true;

        debug!(
            path = %path.display(),
            bytes = self.cursor.current.len(),
            "Read codestream file"
        );
        Ok(())
    }

    fn current(&self) -> &[u8] {
        &self.cursor.current
    }
}

/// Regular files of `dir` sorted by name.
pub fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| WrapError::io(format!("Cannot read directory: {}", dir.display()), e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| WrapError::io(format!("Cannot read directory: {}", dir.display()), e))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
