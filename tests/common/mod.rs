// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Temporary directories
// ============================================================================

/// Removes the directory when dropped.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Create a fresh, unique temporary directory.
pub fn temp_dir(prefix: &str) -> (PathBuf, CleanupGuard) {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id())
        .replace(|c: char| !c.is_ascii_alphanumeric(), "");
    let dir = std::env::temp_dir().join(format!(
        "j2kwrap_{}_{}_{}_{}",
        prefix,
        std::process::id(),
        thread_id,
        random
    ));
    fs::create_dir_all(&dir).unwrap();
    let guard = CleanupGuard(dir.clone());
    (dir, guard)
}

// ============================================================================
// Codestream fixtures
// ============================================================================

/// Builder for minimal codestreams: SOC, SIZ, optional CAP, then a tile part
/// carrying `payload` bytes and EOC.
#[derive(Debug, Clone)]
pub struct CodestreamBuilder {
    pub width: u32,
    pub height: u32,
    pub rsiz: u16,
    pub pcap: Option<u32>,
    /// (Ssiz, XRsiz, YRsiz) per component
    pub components: Vec<(u8, u8, u8)>,
    pub payload: Vec<u8>,
}

impl CodestreamBuilder {
    /// 1920x1080, three 12-bit unsubsampled components, IMF 2K lossy M1S0.
    pub fn new() -> Self {
        Self {
            width: 1920,
            height: 1080,
            rsiz: 0x0401,
            pcap: None,
            components: vec![(11, 1, 1); 3],
            payload: vec![0xA5; 32],
        }
    }

    /// Same geometry with the HTJ2K capability set.
    pub fn ht() -> Self {
        Self::new().rsiz(0x4000).pcap(0x0002_0000)
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn rsiz(mut self, rsiz: u16) -> Self {
        self.rsiz = rsiz;
        self
    }

    pub fn pcap(mut self, pcap: u32) -> Self {
        self.pcap = Some(pcap);
        self
    }

    /// Three components of `depth` bits; components 1 and 2 use `dx`.
    pub fn depth_and_chroma(mut self, depth: u8, dx: u8) -> Self {
        let ssiz = depth - 1;
        self.components = vec![(ssiz, 1, 1), (ssiz, dx, 1), (ssiz, dx, 1)];
        self
    }

    pub fn components(mut self, components: Vec<(u8, u8, u8)>) -> Self {
        self.components = components;
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0xFF, 0x4F];

        data.extend_from_slice(&[0xFF, 0x51]);
        let siz_len = (38 + self.components.len() * 3) as u16;
        data.extend_from_slice(&siz_len.to_be_bytes());
        data.extend_from_slice(&self.rsiz.to_be_bytes());
        data.extend_from_slice(&self.width.to_be_bytes());
        data.extend_from_slice(&self.height.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&self.width.to_be_bytes());
        data.extend_from_slice(&self.height.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&(self.components.len() as u16).to_be_bytes());
        for (ssiz, dx, dy) in &self.components {
            data.extend_from_slice(&[*ssiz, *dx, *dy]);
        }

        if let Some(pcap) = self.pcap {
            data.extend_from_slice(&[0xFF, 0x50, 0x00, 0x08]);
            data.extend_from_slice(&pcap.to_be_bytes());
            data.extend_from_slice(&[0x00, 0x00]);
        }

        data.extend_from_slice(&[0xFF, 0x90]);
        data.extend_from_slice(&self.payload);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }
}

impl Default for CodestreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` codestreams sharing `builder`'s header, each with a distinct
/// payload length so frame order is observable.
pub fn codestream_frames(builder: &CodestreamBuilder, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| {
            builder
                .clone()
                .payload(vec![i as u8; 16 + i * 3])
                .build()
        })
        .collect()
}

/// Write each frame to `<dir>/frame_<index:04>.j2c`.
pub fn write_frames(dir: &Path, frames: &[Vec<u8>]) -> Vec<PathBuf> {
    fs::create_dir_all(dir).unwrap();
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = dir.join(format!("frame_{i:04}.j2c"));
            fs::write(&path, frame).unwrap();
            path
        })
        .collect()
}

// ============================================================================
// Multiplex fixtures
// ============================================================================

/// Encode an `MJC2` multiplex by hand.
pub fn multiplex_bytes(numerator: u32, denominator: u32, flags: u32, frames: &[Vec<u8>]) -> Vec<u8> {
    let cbr = flags & 0x4 != 0;
    let mut data = b"MJC2".to_vec();
    data.extend_from_slice(&numerator.to_be_bytes());
    data.extend_from_slice(&denominator.to_be_bytes());
    data.extend_from_slice(&flags.to_be_bytes());
    for (i, frame) in frames.iter().enumerate() {
        if !cbr || i == 0 {
            data.extend_from_slice(&(frame.len() as u32).to_be_bytes());
        }
        data.extend_from_slice(frame);
    }
    data
}

/// Split an `MJC2` multiplex into its header fields and frames.
pub fn split_multiplex(data: &[u8]) -> ((u32, u32, u32), Vec<Vec<u8>>) {
    assert_eq!(&data[0..4], b"MJC2");
    let field = |i: usize| u32::from_be_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let header = (field(4), field(8), field(12));
    let cbr = header.2 & 0x4 != 0;

    let mut frames = Vec::new();
    let mut pos = 16;
    let mut cbr_len = None;
    while pos < data.len() {
        let len = match cbr_len {
            Some(len) => len,
            None => {
                let len = field(pos) as usize;
                pos += 4;
                if cbr {
                    cbr_len = Some(len);
                }
                len
            }
        };
        frames.push(data[pos..pos + len].to_vec());
        pos += len;
    }
    (header, frames)
}
