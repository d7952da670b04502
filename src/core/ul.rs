// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! SMPTE Universal Labels.
//!
//! A [`Ul`] is the 16-byte identifier MXF uses for every coding scheme,
//! colorimetry property and metadata class. All labels used to describe
//! picture essence live in [`labels`] so the colorimetry registry, the
//! profile resolver and the container agree on a single set of byte values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::WrapError;

/// Byte length of a Universal Label.
pub const UL_LEN: usize = 16;

/// A 16-byte SMPTE Universal Label.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ul(pub [u8; UL_LEN]);

impl Ul {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; UL_LEN]) -> Self {
        Ul(bytes)
    }

    /// Build a label from a 14-byte prefix and a 2-byte suffix.
    pub const fn from_parts(prefix: &[u8; 14], suffix: [u8; 2]) -> Self {
        let mut bytes = [0u8; UL_LEN];
        let mut i = 0;
        while i < 14 {
            bytes[i] = prefix[i];
            i += 1;
        }
        bytes[14] = suffix[0];
        bytes[15] = suffix[1];
        Ul(bytes)
    }

    /// Create from a slice, which must be exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; UL_LEN]>::try_from(bytes).ok().map(Ul)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; UL_LEN] {
        &self.0
    }

    /// Check if this is a SMPTE-registered label (starts with 06 0E 2B 34).
    pub fn is_smpte(&self) -> bool {
        self.0[..4] == [0x06, 0x0e, 0x2b, 0x34]
    }

    /// Symbolic name from the label table, if this label is known.
    pub fn name(&self) -> Option<&'static str> {
        labels::lookup_name(self)
    }

    /// SMPTE URN form, e.g. `urn:smpte:ul:060e2b34.04010101.04010101.01020000`.
    pub fn to_urn(&self) -> String {
        format!(
            "urn:smpte:ul:{}.{}.{}.{}",
            hex::encode(&self.0[0..4]),
            hex::encode(&self.0[4..8]),
            hex::encode(&self.0[8..12]),
            hex::encode(&self.0[12..16])
        )
    }
}

impl fmt::Debug for Ul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Ul({name})"),
            None => write!(f, "Ul({})", self.to_urn()),
        }
    }
}

impl fmt::Display for Ul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_urn())
    }
}

impl FromStr for Ul {
    type Err = WrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim_start_matches("urn:smpte:ul:")
            .chars()
            .filter(|c| *c != '.')
            .collect();
        let bytes = hex::decode(&digits)
            .map_err(|e| WrapError::config(format!("invalid UL '{s}': {e}")))?;
        Ul::from_slice(&bytes)
            .ok_or_else(|| WrapError::config(format!("invalid UL '{s}': expected 16 bytes")))
    }
}

impl Serialize for Ul {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_urn())
    }
}

impl<'de> Deserialize<'de> for Ul {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Labels describing picture essence.
///
/// Values follow SMPTE RP 224 as used by ST 2067-21 and ST 2067-50.
pub mod labels {
    use super::Ul;

    // Transfer characteristics (04.01.01.01.01.xx)

    /// ITU-R BT.470 (PAL) transfer characteristic.
    pub const TRANSFER_BT470: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x04, 0x01, 0x01, 0x01, 0x01, 0x01, 0x00,
        0x00,
    ]);
    /// ITU-R BT.709 transfer characteristic.
    pub const TRANSFER_BT709: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x04, 0x01, 0x01, 0x01, 0x01, 0x02, 0x00,
        0x00,
    ]);
    /// SMPTE 240M transfer characteristic.
    pub const TRANSFER_SMPTE240M: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x04, 0x01, 0x01, 0x01, 0x01, 0x03, 0x00,
        0x00,
    ]);
    /// Linear transfer characteristic.
    pub const TRANSFER_LINEAR: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x06, 0x04, 0x01, 0x01, 0x01, 0x01, 0x06, 0x00,
        0x00,
    ]);
    /// SMPTE ST 428-1 (DCDM) transfer characteristic.
    pub const TRANSFER_SMPTE_DCDM: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x08, 0x04, 0x01, 0x01, 0x01, 0x01, 0x07, 0x00,
        0x00,
    ]);
    /// IEC 61966-2-4 (xvYCC) transfer characteristic.
    pub const TRANSFER_IEC61966_2_4: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x01, 0x08, 0x00,
        0x00,
    ]);
    /// ITU-R BT.2020 transfer characteristic.
    pub const TRANSFER_BT2020: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0e, 0x04, 0x01, 0x01, 0x01, 0x01, 0x09, 0x00,
        0x00,
    ]);
    /// SMPTE ST 2084 (PQ) transfer characteristic.
    pub const TRANSFER_ST2084: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x01, 0x0a, 0x00,
        0x00,
    ]);
    /// ITU-R BT.2100 HLG transfer characteristic.
    pub const TRANSFER_HLG: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x01, 0x0b, 0x00,
        0x00,
    ]);
    /// ST 2067-50 Cinema Mezzanine DCDM transfer characteristic.
    pub const TRANSFER_CINEMA_MEZZANINE_DCDM: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0e, 0x04, 0x01, 0x01, 0x01, 0x01, 0x13, 0x00,
        0x00,
    ]);

    // Color primaries (04.01.01.01.03.xx)

    /// SMPTE 170M (BT.601 525-line) color primaries.
    pub const PRIMARIES_SMPTE170M: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x06, 0x04, 0x01, 0x01, 0x01, 0x03, 0x01, 0x00,
        0x00,
    ]);
    /// ITU-R BT.470 (BT.601 625-line) color primaries.
    pub const PRIMARIES_BT470: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x06, 0x04, 0x01, 0x01, 0x01, 0x03, 0x02, 0x00,
        0x00,
    ]);
    /// ITU-R BT.709 color primaries.
    pub const PRIMARIES_BT709: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x06, 0x04, 0x01, 0x01, 0x01, 0x03, 0x03, 0x00,
        0x00,
    ]);
    /// ITU-R BT.2020 color primaries.
    pub const PRIMARIES_BT2020: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x03, 0x04, 0x00,
        0x00,
    ]);
    /// SMPTE ST 428-1 (DCDM XYZ) color primaries.
    pub const PRIMARIES_SMPTE_DCDM: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x03, 0x05, 0x00,
        0x00,
    ]);
    /// P3 primaries with a D65 white point.
    pub const PRIMARIES_P3D65: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x03, 0x06, 0x00,
        0x00,
    ]);
    /// ST 2067-50 Cinema Mezzanine color primaries.
    pub const PRIMARIES_CINEMA_MEZZANINE: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x03, 0x08, 0x00,
        0x00,
    ]);

    // Coding equations (04.01.01.01.02.xx)

    /// ITU-R BT.601 coding equations.
    pub const CODING_BT601: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x04, 0x01, 0x01, 0x01, 0x02, 0x01, 0x00,
        0x00,
    ]);
    /// ITU-R BT.709 coding equations.
    pub const CODING_BT709: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x01, 0x04, 0x01, 0x01, 0x01, 0x02, 0x02, 0x00,
        0x00,
    ]);
    /// SMPTE 240M coding equations.
    pub const CODING_SMPTE240M: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x06, 0x04, 0x01, 0x01, 0x01, 0x02, 0x03, 0x00,
        0x00,
    ]);
    /// GBR (identity) coding equations.
    pub const CODING_GBR: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x02, 0x05, 0x00,
        0x00,
    ]);
    /// ITU-R BT.2020 non-constant luminance coding equations.
    pub const CODING_BT2020_NCL: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x01, 0x01, 0x02, 0x06, 0x00,
        0x00,
    ]);

    // Picture essence coding (04.01.02.02.03.01.xx.xx)

    /// Prefix shared by every JPEG 2000 profile picture coding label.
    pub const J2K_PROFILE_PREFIX: [u8; 14] = [
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x02, 0x02, 0x03, 0x01,
    ];
    /// ISO/IEC 15444-1 generic picture coding scheme.
    pub const JPEG2000_GENERIC: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x07, 0x04, 0x01, 0x02, 0x02, 0x03, 0x01, 0x01,
        0x00,
    ]);
    /// ISO/IEC 15444-15 (HTJ2K) generic picture coding scheme.
    pub const HTJ2K_GENERIC: Ul = Ul([
        0x06, 0x0e, 0x2b, 0x34, 0x04, 0x01, 0x01, 0x0d, 0x04, 0x01, 0x02, 0x02, 0x03, 0x01, 0x08,
        0x01,
    ]);

    /// Symbolic name of every label above.
    pub const LABELS: &[(&str, Ul)] = &[
        ("TransferCharacteristic_ITU470_PAL", TRANSFER_BT470),
        ("TransferCharacteristic_ITU709", TRANSFER_BT709),
        ("TransferCharacteristic_SMPTE240M", TRANSFER_SMPTE240M),
        ("TransferCharacteristic_linear", TRANSFER_LINEAR),
        ("TransferCharacteristic_SMPTE_DCDM", TRANSFER_SMPTE_DCDM),
        ("TransferCharacteristic_IEC6196624_xvYCC", TRANSFER_IEC61966_2_4),
        ("TransferCharacteristic_ITU2020", TRANSFER_BT2020),
        ("TransferCharacteristic_SMPTEST2084", TRANSFER_ST2084),
        ("TransferCharacteristic_HLG", TRANSFER_HLG),
        (
            "TransferCharacteristic_CinemaMezzanineDCDM",
            TRANSFER_CINEMA_MEZZANINE_DCDM,
        ),
        ("ColorPrimaries_SMPTE170M", PRIMARIES_SMPTE170M),
        ("ColorPrimaries_ITU470_PAL", PRIMARIES_BT470),
        ("ColorPrimaries_ITU709", PRIMARIES_BT709),
        ("ColorPrimaries_ITU2020", PRIMARIES_BT2020),
        ("ColorPrimaries_SMPTE_DCDM", PRIMARIES_SMPTE_DCDM),
        ("ColorPrimaries_P3D65", PRIMARIES_P3D65),
        ("ColorPrimaries_CinemaMezzanine", PRIMARIES_CINEMA_MEZZANINE),
        ("CodingEquations_ITU601", CODING_BT601),
        ("CodingEquations_ITU709", CODING_BT709),
        ("CodingEquations_SMPTE240M", CODING_SMPTE240M),
        ("CodingEquations_GBR", CODING_GBR),
        ("CodingEquations_ITU2020_NCL", CODING_BT2020_NCL),
        ("JPEG2000PictureCodingScheme_Generic", JPEG2000_GENERIC),
        ("HTJ2KPictureCodingScheme_Generic", HTJ2K_GENERIC),
    ];

    /// Look up the symbolic name of a label.
    pub fn lookup_name(ul: &Ul) -> Option<&'static str> {
        LABELS
            .iter()
            .find(|(_, label)| label == ul)
            .map(|(name, _)| *name)
    }

    /// Look up a label by symbolic name.
    pub fn by_name(name: &str) -> Option<Ul> {
        LABELS
            .iter()
            .find(|(label_name, _)| *label_name == name)
            .map(|(_, ul)| *ul)
    }
}
