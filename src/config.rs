// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Run configuration.
//!
//! [`WrapConfig`] and [`UnwrapConfig`] hold every option of a run. They load
//! from TOML files; missing keys take the values of the `Default` impls, and
//! command-line flags are applied on top by the binary.
//!
//! ```toml
//! format = "mjc"
//! fps = "24000/1001"
//! colorimetry = "Color3"
//! components = "ycbcr"
//! quantization = "partial"
//! index_strategy = "footer"
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::{IndexStrategy, WriterInfo, WriterOptions};
use crate::core::{ComponentScheme, EditRate, Quantization, Result, WrapError};
use crate::metadata::colorimetry::{ColorimetryRegistry, DEFAULT_SCHEME};
use crate::pipeline::unwrap::DEFAULT_BUFFER_CAPACITY;
use crate::pipeline::WrapOptions;
use crate::sequence::synthetic::{DEFAULT_FRAME_COUNT, DEFAULT_FRAME_SIZE};

/// Codestream sequence representation on the non-container side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamFormat {
    /// One raw codestream per file
    #[default]
    J2c,
    /// Length-prefixed `MJC2` multiplex
    Mjc,
}

impl StreamFormat {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamFormat::J2c => "j2c",
            StreamFormat::Mjc => "mjc",
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamFormat {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "j2c" => Ok(StreamFormat::J2c),
            "mjc" => Ok(StreamFormat::Mjc),
            _ => Err(WrapError::config(format!(
                "invalid format '{s}', expected 'j2c' or 'mjc'"
            ))),
        }
    }
}

/// Options of a wrap run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapConfig {
    /// Input representation
    pub format: StreamFormat,
    /// Edit rate; taken from the multiplex header, or 24/1, when absent
    pub fps: Option<EditRate>,
    /// Colorimetry scheme name
    pub colorimetry: String,
    /// Component scheme
    pub components: ComponentScheme,
    /// Quantization range
    pub quantization: Quantization,
    /// Wrap synthetic codestreams instead of reading input
    pub fake: bool,
    /// Number of synthetic codestreams
    pub fake_frames: u32,
    /// Size of each synthetic codestream in bytes
    pub fake_frame_size: usize,
    /// Asset UUID; a random one is generated when absent
    #[serde(rename = "assetid")]
    pub asset_id: Option<Uuid>,
    /// Index segment placement
    pub index_strategy: IndexStrategy,
    /// Frames per index segment
    pub index_interval: u32,
    /// Minimum header partition size in bytes
    pub header_size: u32,
}

impl Default for WrapConfig {
    fn default() -> Self {
        let writer = WriterOptions::default();
        Self {
            format: StreamFormat::J2c,
            fps: None,
            colorimetry: DEFAULT_SCHEME.to_string(),
            components: ComponentScheme::Xyz,
            quantization: Quantization::Full,
            fake: false,
            fake_frames: DEFAULT_FRAME_COUNT,
            fake_frame_size: DEFAULT_FRAME_SIZE,
            asset_id: None,
            index_strategy: writer.index_strategy,
            index_interval: writer.index_interval,
            header_size: writer.header_size,
        }
    }
}

impl WrapConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| WrapError::io(format!("reading config {}", path.display()), e))?;
        Self::from_toml_str(&text)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| WrapError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.index_interval == 0 {
            return Err(WrapError::config("index_interval must be at least 1"));
        }
        if self.fake && self.fake_frames == 0 {
            return Err(WrapError::config("fake_frames must be at least 1"));
        }
        ColorimetryRegistry::standard().from_name(&self.colorimetry)?;
        Ok(())
    }

    /// Edit rate to use given the rate announced by the source, if any.
    pub fn edit_rate(&self, source_hint: Option<EditRate>) -> EditRate {
        self.fps.or(source_hint).unwrap_or(EditRate::FPS_24)
    }

    /// Pipeline options for this run.
    pub fn wrap_options(&self, source_hint: Option<EditRate>) -> WrapOptions {
        WrapOptions {
            colorimetry: self.colorimetry.clone(),
            component_scheme: self.components,
            quantization: self.quantization,
            edit_rate: self.edit_rate(source_hint),
            ..WrapOptions::default()
        }
    }

    /// Track file layout options.
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            header_size: self.header_size,
            index_strategy: self.index_strategy,
            index_interval: self.index_interval,
        }
    }

    /// Identification for the track file.
    pub fn writer_info(&self) -> WriterInfo {
        match self.asset_id {
            Some(uuid) => WriterInfo::new(uuid),
            None => WriterInfo::with_random_asset(),
        }
    }
}

/// Options of an unwrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnwrapConfig {
    /// Output representation
    pub format: StreamFormat,
    /// Largest frame accepted, in bytes
    pub buffer_size: usize,
}

impl Default for UnwrapConfig {
    fn default() -> Self {
        Self {
            format: StreamFormat::J2c,
            buffer_size: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl UnwrapConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| WrapError::io(format!("reading config {}", path.display()), e))?;
        Self::from_toml_str(&text)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| WrapError::config(e.to_string()))?;
        if config.buffer_size == 0 {
            return Err(WrapError::config("buffer_size must be at least 1"));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_defaults() {
        let config = WrapConfig::default();
        assert_eq!(config.format, StreamFormat::J2c);
        assert_eq!(config.colorimetry, "CinemaMezzanine");
        assert_eq!(config.components, ComponentScheme::Xyz);
        assert_eq!(config.quantization, Quantization::Full);
        assert_eq!(config.edit_rate(None), EditRate::FPS_24);
        assert_eq!(config.writer_options(), WriterOptions::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(WrapConfig::from_toml_str("").unwrap(), WrapConfig::default());
        assert_eq!(
            UnwrapConfig::from_toml_str("").unwrap(),
            UnwrapConfig::default()
        );
    }

    #[test]
    fn test_parse_wrap_document() {
        let config = WrapConfig::from_toml_str(
            r#"
            format = "mjc"
            fps = "24000/1001"
            colorimetry = "color3"
            components = "ycbcr"
            quantization = "partial"
            assetid = "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0"
            index_strategy = "footer"
            index_interval = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.format, StreamFormat::Mjc);
        assert_eq!(config.fps, Some(EditRate::new(24000, 1001).unwrap()));
        assert_eq!(config.components, ComponentScheme::YCbCr);
        assert_eq!(config.quantization, Quantization::Partial);
        assert_eq!(config.index_strategy, IndexStrategy::Footer);
        assert_eq!(config.index_interval, 10);

        let info = config.writer_info();
        assert_eq!(
            info.asset_uuid.to_string(),
            "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0"
        );

        let options = config.wrap_options(Some(EditRate::new(50, 1).unwrap()));
        assert_eq!(options.edit_rate, EditRate::new(24000, 1001).unwrap());
        assert_eq!(options.colorimetry, "color3");
    }

    #[test]
    fn test_source_rate_used_without_fps() {
        let config = WrapConfig::default();
        let hint = EditRate::new(30, 1).unwrap();
        assert_eq!(config.edit_rate(Some(hint)), hint);
    }

    #[test]
    fn test_invalid_values() {
        for text in [
            "format = \"mov\"",
            "fps = \"0/1\"",
            "index_interval = 0",
            "fake = true\nfake_frames = 0",
            "unknown_key = 1",
        ] {
            let err = WrapConfig::from_toml_str(text).unwrap_err();
            assert!(
                matches!(err, WrapError::InvalidConfiguration { .. }),
                "{text}: {err:?}"
            );
        }
        assert!(UnwrapConfig::from_toml_str("buffer_size = 0").is_err());
    }

    #[test]
    fn test_unknown_colorimetry_rejected() {
        let err = WrapConfig::from_toml_str("colorimetry = \"Color9\"").unwrap_err();
        assert!(matches!(err, WrapError::UnknownColorimetryScheme { .. }));

        let config = WrapConfig {
            colorimetry: "cinemamezzanine".to_string(),
            ..WrapConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = WrapConfig::load("/nonexistent/j2kwrap.toml").unwrap_err();
        assert!(matches!(err, WrapError::Io { .. }));
    }

    #[test]
    fn test_stream_format_from_str() {
        assert_eq!("MJC".parse::<StreamFormat>().unwrap(), StreamFormat::Mjc);
        assert_eq!("j2c".parse::<StreamFormat>().unwrap(), StreamFormat::J2c);
        assert!("jp2".parse::<StreamFormat>().is_err());
    }
}
