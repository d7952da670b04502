// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Colorimetry schemes.
//!
//! A scheme names a (transfer characteristic, color primaries, coding
//! equations) triple. The standard registry holds the ST 2067-21 COLOR.1 to
//! COLOR.7 schemes and the ST 2067-50 cinema mezzanine scheme.

use std::collections::HashSet;

use serde::Serialize;

use crate::core::ul::labels::*;
use crate::core::{Result, Ul, WrapError};

/// Name of the scheme used when none is requested.
pub const DEFAULT_SCHEME: &str = "CinemaMezzanine";

/// A named colorimetry triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorimetryScheme {
    /// Scheme name, matched case-insensitively
    pub name: String,
    /// Transfer characteristic label
    pub transfer_characteristic: Ul,
    /// Color primaries label
    pub color_primaries: Ul,
    /// Coding equations label (used by CDCI descriptors only)
    pub coding_equations: Ul,
}

impl ColorimetryScheme {
    /// Create a scheme.
    pub fn new(
        name: impl Into<String>,
        transfer_characteristic: Ul,
        color_primaries: Ul,
        coding_equations: Ul,
    ) -> Self {
        Self {
            name: name.into(),
            transfer_characteristic,
            color_primaries,
            coding_equations,
        }
    }
}

// (name, primaries, transfer, coding)
const STANDARD_SCHEMES: &[(&str, Ul, Ul, Ul)] = &[
    ("Color1", PRIMARIES_BT470, TRANSFER_BT709, CODING_BT601),
    ("Color2", PRIMARIES_SMPTE170M, TRANSFER_BT709, CODING_BT601),
    ("Color3", PRIMARIES_BT709, TRANSFER_BT709, CODING_BT709),
    ("Color4", PRIMARIES_BT709, TRANSFER_IEC61966_2_4, CODING_BT709),
    ("Color5", PRIMARIES_BT2020, TRANSFER_BT2020, CODING_BT2020_NCL),
    ("Color6", PRIMARIES_P3D65, TRANSFER_ST2084, CODING_GBR),
    ("Color7", PRIMARIES_BT2020, TRANSFER_ST2084, CODING_BT2020_NCL),
    (
        "CinemaMezzanine",
        PRIMARIES_CINEMA_MEZZANINE,
        TRANSFER_CINEMA_MEZZANINE_DCDM,
        CODING_GBR,
    ),
];

/// Lookup table of colorimetry schemes keyed by name.
#[derive(Debug, Clone)]
pub struct ColorimetryRegistry {
    schemes: Vec<ColorimetryScheme>,
}

impl ColorimetryRegistry {
    /// The fixed table of standard schemes.
    pub fn standard() -> Self {
        let schemes = STANDARD_SCHEMES
            .iter()
            .map(|(name, primaries, transfer, coding)| {
                ColorimetryScheme::new(*name, *transfer, *primaries, *coding)
            })
            .collect();
        Self { schemes }
    }

    /// Build a registry from custom schemes. Names must be unique,
    /// ignoring ASCII case.
    pub fn from_schemes(schemes: Vec<ColorimetryScheme>) -> Result<Self> {
        let mut seen = HashSet::new();
        for scheme in &schemes {
            if !seen.insert(scheme.name.to_ascii_lowercase()) {
                return Err(WrapError::DuplicateColorimetryScheme {
                    name: scheme.name.clone(),
                });
            }
        }
        Ok(Self { schemes })
    }

    /// Find a scheme by name, ignoring ASCII case.
    pub fn from_name(&self, name: &str) -> Result<&ColorimetryScheme> {
        self.schemes
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| WrapError::UnknownColorimetryScheme {
                name: name.to_string(),
            })
    }

    /// Registered scheme names in table order.
    pub fn names(&self) -> Vec<&str> {
        self.schemes.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of registered schemes.
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// True when the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

impl Default for ColorimetryRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_contents() {
        let registry = ColorimetryRegistry::standard();
        assert_eq!(
            registry.names(),
            vec![
                "Color1",
                "Color2",
                "Color3",
                "Color4",
                "Color5",
                "Color6",
                "Color7",
                "CinemaMezzanine"
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ColorimetryRegistry::standard();
        let a = registry.from_name("color3").unwrap();
        let b = registry.from_name("COLOR3").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.color_primaries, PRIMARIES_BT709);
        assert_eq!(a.transfer_characteristic, TRANSFER_BT709);
        assert_eq!(a.coding_equations, CODING_BT709);
    }

    #[test]
    fn test_cinema_mezzanine() {
        let registry = ColorimetryRegistry::standard();
        let scheme = registry.from_name(DEFAULT_SCHEME).unwrap();
        assert_eq!(scheme.color_primaries, PRIMARIES_CINEMA_MEZZANINE);
        assert_eq!(
            scheme.transfer_characteristic,
            TRANSFER_CINEMA_MEZZANINE_DCDM
        );
        assert_eq!(scheme.coding_equations, CODING_GBR);
    }

    #[test]
    fn test_pq_schemes() {
        let registry = ColorimetryRegistry::standard();
        let color6 = registry.from_name("Color6").unwrap();
        assert_eq!(color6.color_primaries, PRIMARIES_P3D65);
        assert_eq!(color6.transfer_characteristic, TRANSFER_ST2084);
        let color7 = registry.from_name("Color7").unwrap();
        assert_eq!(color7.color_primaries, PRIMARIES_BT2020);
        assert_eq!(color7.coding_equations, CODING_BT2020_NCL);
    }

    #[test]
    fn test_unknown_name() {
        let registry = ColorimetryRegistry::standard();
        let err = registry.from_name("Color9").unwrap_err();
        match err {
            WrapError::UnknownColorimetryScheme { name } => assert_eq!(name, "Color9"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(registry.from_name("").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let scheme = ColorimetryScheme::new("Mine", TRANSFER_BT709, PRIMARIES_BT709, CODING_BT709);
        let mut other = scheme.clone();
        other.name = "MINE".to_string();
        let err = ColorimetryRegistry::from_schemes(vec![scheme.clone(), other]).unwrap_err();
        assert!(matches!(err, WrapError::DuplicateColorimetryScheme { .. }));

        let registry = ColorimetryRegistry::from_schemes(vec![scheme]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.from_name("mine").is_ok());
    }
}
