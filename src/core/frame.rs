// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Frame buffer shared between sources, the container and output sinks.

use super::error::{Result, WrapError};

/// Owned bytes of one codestream.
///
/// The buffer is reused across frames: [`FrameBuffer::set_data`] replaces the
/// contents without giving up the allocation. An optional capacity limit
/// bounds the largest frame the buffer accepts.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl FrameBuffer {
    /// Create an unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that rejects frames larger than `limit` bytes.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Replace the contents with `bytes`.
    pub fn set_data(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(limit) = self.limit {
            if bytes.len() > limit {
                return Err(WrapError::container(
                    "FrameBuffer",
                    format!(
                        "frame of {} bytes exceeds buffer capacity of {limit} bytes",
                        bytes.len()
                    ),
                ));
            }
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Frame bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Frame length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Capacity limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
