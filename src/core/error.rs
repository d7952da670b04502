// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for j2kwrap.
//!
//! Every failure in the wrap and unwrap pipelines is one of the variants of
//! [`WrapError`]. Nothing is retried: the first error aborts the run and is
//! reported by the caller.
//!
//! Errors fall into four groups:
//! - Input framing (multiplex header, zero-length CBR frames, codestream header)
//! - Metadata resolution (colorimetry, profile, geometry checks)
//! - Container collaborator failures
//! - I/O and configuration

use std::io;

use thiserror::Error;

use super::{ComponentScheme, Quantization};

/// Errors that can occur while wrapping or unwrapping codestreams.
#[derive(Debug, Error)]
pub enum WrapError {
    /// The 16-byte multiplex header is short or carries the wrong magic
    #[error("Malformed multiplex header: {reason}")]
    MalformedContainerHeader {
        /// What was wrong with the header
        reason: String,
    },

    /// A constant-bitrate multiplex declared a frame length of zero
    #[error("Zero-length frame in constant-bitrate multiplex")]
    ZeroLengthFrame,

    /// The codestream main header could not be parsed
    #[error("Malformed codestream: {reason}")]
    MalformedCodestream {
        /// Parser diagnostic
        reason: String,
    },

    /// Colorimetry scheme name is not in the registry
    #[error("Unknown colorimetry scheme: '{name}'")]
    UnknownColorimetryScheme {
        /// Requested scheme name
        name: String,
    },

    /// Two registry entries share a name
    #[error("Duplicate colorimetry scheme: '{name}'")]
    DuplicateColorimetryScheme {
        /// Offending scheme name
        name: String,
    },

    /// Codestream is neither an IMF profile nor HTJ2K
    #[error("Unsupported codestream profile: Rsiz 0x{profile_id:04x} is not an IMF profile and the HTJ2K capability is not set")]
    UnsupportedProfile {
        /// Rsiz value from the SIZ marker
        profile_id: u16,
    },

    /// Geometry does not have exactly three components
    #[error("Unsupported component count: {count} (expected 3)")]
    UnsupportedComponentCount {
        /// Component count found in the geometry
        count: usize,
    },

    /// The three components do not share one bit depth
    #[error("Components have unequal bit depths: {depths:?}")]
    UnequalComponentDepth {
        /// Per-component Ssiz precision values
        depths: Vec<u8>,
    },

    /// Pixel depth is outside what the reference-level formulas support
    #[error("Unsupported pixel depth: {pixel_depth} bits")]
    UnsupportedBitDepth {
        /// Bits per component sample
        pixel_depth: u32,
    },

    /// Chroma components are subsampled differently
    #[error("Chroma components have unequal subsampling: Cb {cb:?}, Cr {cr:?}")]
    UnequalSubsampling {
        /// (dx, dy) of component 1
        cb: (u8, u8),
        /// (dx, dy) of component 2
        cr: (u8, u8),
    },

    /// RGB or XYZ wrapping was requested for a subsampled codestream
    #[error("Component {component} is subsampled ({dx}x{dy}), which RGB and XYZ schemes do not allow")]
    SubsampledComponentsInRgbMode {
        /// Index of the offending component
        component: usize,
        /// Horizontal subsampling factor
        dx: u8,
        /// Vertical subsampling factor
        dy: u8,
    },

    /// Quantization range is not valid for the component scheme
    #[error("{quantization} quantization is not valid for the {scheme} component scheme")]
    InvalidQuantizationForScheme {
        /// Requested component scheme
        scheme: ComponentScheme,
        /// Requested quantization
        quantization: Quantization,
    },

    /// The source produced no frames
    #[error("Input sequence contains no codestreams")]
    EmptySequence,

    /// Open/create/read/write failure
    #[error("{context}: {source}")]
    Io {
        /// What was being done
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failure reported by the container collaborator
    #[error("Container error in {context}: {message}")]
    ContainerLibraryError {
        /// Operation that failed
        context: String,
        /// Collaborator diagnostic
        message: String,
    },

    /// Configuration file or option value could not be used
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong
        message: String,
    },
}

impl WrapError {
    /// Create a malformed multiplex header error.
    pub fn malformed_header(reason: impl Into<String>) -> Self {
        WrapError::MalformedContainerHeader {
            reason: reason.into(),
        }
    }

    /// Create a malformed codestream error.
    pub fn malformed_codestream(reason: impl Into<String>) -> Self {
        WrapError::MalformedCodestream {
            reason: reason.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        WrapError::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a container collaborator error.
    pub fn container(context: impl Into<String>, message: impl Into<String>) -> Self {
        WrapError::ContainerLibraryError {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        WrapError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Short, stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WrapError::MalformedContainerHeader { .. } => "MalformedContainerHeader",
            WrapError::ZeroLengthFrame => "ZeroLengthFrame",
            WrapError::MalformedCodestream { .. } => "MalformedCodestream",
            WrapError::UnknownColorimetryScheme { .. } => "UnknownColorimetryScheme",
            WrapError::DuplicateColorimetryScheme { .. } => "DuplicateColorimetryScheme",
            WrapError::UnsupportedProfile { .. } => "UnsupportedProfile",
            WrapError::UnsupportedComponentCount { .. } => "UnsupportedComponentCount",
            WrapError::UnequalComponentDepth { .. } => "UnequalComponentDepth",
            WrapError::UnsupportedBitDepth { .. } => "UnsupportedBitDepth",
            WrapError::UnequalSubsampling { .. } => "UnequalSubsampling",
            WrapError::SubsampledComponentsInRgbMode { .. } => "SubsampledComponentsInRGBMode",
            WrapError::InvalidQuantizationForScheme { .. } => "InvalidQuantizationForScheme",
            WrapError::EmptySequence => "EmptySequence",
            WrapError::Io { .. } => "IOError",
            WrapError::ContainerLibraryError { .. } => "ContainerLibraryError",
            WrapError::InvalidConfiguration { .. } => "InvalidConfiguration",
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            WrapError::MalformedContainerHeader { reason }
            | WrapError::MalformedCodestream { reason } => vec![("reason", reason.clone())],
            WrapError::ZeroLengthFrame | WrapError::EmptySequence => Vec::new(),
            WrapError::UnknownColorimetryScheme { name }
            | WrapError::DuplicateColorimetryScheme { name } => vec![("scheme", name.clone())],
            WrapError::UnsupportedProfile { profile_id } => {
                vec![("rsiz", format!("0x{profile_id:04x}"))]
            }
            WrapError::UnsupportedComponentCount { count } => vec![("count", count.to_string())],
            WrapError::UnequalComponentDepth { depths } => {
                vec![("depths", format!("{depths:?}"))]
            }
            WrapError::UnsupportedBitDepth { pixel_depth } => {
                vec![("pixel_depth", pixel_depth.to_string())]
            }
            WrapError::UnequalSubsampling { cb, cr } => vec![
                ("cb", format!("{}x{}", cb.0, cb.1)),
                ("cr", format!("{}x{}", cr.0, cr.1)),
            ],
            WrapError::SubsampledComponentsInRgbMode { component, dx, dy } => vec![
                ("component", component.to_string()),
                ("dx", dx.to_string()),
                ("dy", dy.to_string()),
            ],
            WrapError::InvalidQuantizationForScheme {
                scheme,
                quantization,
            } => vec![
                ("scheme", scheme.to_string()),
                ("quantization", quantization.to_string()),
            ],
            WrapError::Io { context, source } => {
                vec![("context", context.clone()), ("cause", source.to_string())]
            }
            WrapError::ContainerLibraryError { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            WrapError::InvalidConfiguration { message } => vec![("message", message.clone())],
        }
    }
}

impl From<io::Error> for WrapError {
    fn from(err: io::Error) -> Self {
        WrapError::Io {
            context: "I/O".to_string(),
            source: err,
        }
    }
}

/// Result type for j2kwrap operations.
pub type Result<T> = std::result::Result<T, WrapError>;
