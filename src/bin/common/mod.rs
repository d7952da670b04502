// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;

use human_size::{Byte, Size};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Parse a byte count such as `5242880`, `5 MiB` or `4MB`.
pub fn parse_size(s: &str) -> CliResult<usize> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<usize>() {
        return Ok(n);
    }

    let size: Size = trimmed
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size: {s}"))?;
    let bytes = size.into::<Byte>().value();
    if !bytes.is_finite() || bytes < 0.0 || bytes > usize::MAX as f64 {
        return Err(anyhow::anyhow!("Size out of range: {s}"));
    }
    Ok(bytes.round() as usize)
}

/// Format a byte count for display.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Progress bar shown only when standard error is a terminal.
pub struct ProgressBar {
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a progress bar; `total` of `None` shows a spinner.
    pub fn new(total: Option<u64>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let inner = if std::io::stderr().is_terminal() {
            let (pb, template) = match total {
                Some(total) => (
                    indicatif::ProgressBar::new(total),
                    "{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
                ),
                None => (
                    indicatif::ProgressBar::new_spinner(),
                    "{spinner:.green} {prefix} [{elapsed_precise}] {pos} frames {msg}",
                ),
            };
            if let Ok(style) = indicatif::ProgressStyle::default_bar().template(template) {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb.set_prefix(prefix);
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    /// Advance by one frame.
    pub fn inc(&self) {
        if let Some(pb) = &self.inner {
            pb.inc(1);
        }
    }

    /// Finish the progress bar with a message.
    pub fn finish_with_message(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("5 MiB").unwrap(), 5 * 1024 * 1024);
        assert_eq!(parse_size("4 kB").unwrap(), 4000);
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
