// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Picture essence coding label resolution.
//!
//! A codestream that signals the Part-15 (HTJ2K) capability is labelled with
//! the generic HTJ2K coding scheme. Anything else must carry one of the IMF
//! Rsiz values of ISO/IEC 15444-1 Annex A; those map onto the broadcast and
//! IMF profile labels of SMPTE ST 2067-21.
//!
//! Rsiz layout for IMF profiles is `family << 8 | sublevel << 4 | mainlevel`.

use crate::core::ul::labels::{HTJ2K_GENERIC, J2K_PROFILE_PREFIX};
use crate::core::{Result, Ul, WrapError};

/// Pcap bit signalling that the codestream uses the HT block coder.
pub const HT_CAPABILITY_FLAG: u32 = 0x0002_0000;

/// One row of the IMF profile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLabelEntry {
    /// Rsiz value from the SIZ marker
    pub profile_id: u16,
    /// Human-readable profile name
    pub name: &'static str,
    /// Last two bytes of the picture essence coding label
    pub suffix: [u8; 2],
}

impl ProfileLabelEntry {
    /// Full 16-byte picture essence coding label.
    pub fn label(&self) -> Ul {
        Ul::from_parts(&J2K_PROFILE_PREFIX, self.suffix)
    }
}

const fn entry(profile_id: u16, name: &'static str, suffix: [u8; 2]) -> ProfileLabelEntry {
    ProfileLabelEntry {
        profile_id,
        name,
        suffix,
    }
}

/// IMF profiles, ordered by family then (mainlevel, sublevel).
pub const IMF_PROFILES: &[ProfileLabelEntry] = &[
    // 2K lossy
    entry(0x0401, "IMF 2K lossy M1S0", [0x02, 0x01]),
    entry(0x0402, "IMF 2K lossy M2S0", [0x02, 0x02]),
    entry(0x0403, "IMF 2K lossy M3S0", [0x02, 0x03]),
    entry(0x0404, "IMF 2K lossy M4S0", [0x02, 0x04]),
    entry(0x0414, "IMF 2K lossy M4S1", [0x02, 0x05]),
    entry(0x0405, "IMF 2K lossy M5S0", [0x02, 0x06]),
    entry(0x0415, "IMF 2K lossy M5S1", [0x02, 0x07]),
    entry(0x0425, "IMF 2K lossy M5S2", [0x02, 0x08]),
    entry(0x0406, "IMF 2K lossy M6S0", [0x02, 0x09]),
    entry(0x0416, "IMF 2K lossy M6S1", [0x02, 0x0a]),
    entry(0x0426, "IMF 2K lossy M6S2", [0x02, 0x0b]),
    entry(0x0436, "IMF 2K lossy M6S3", [0x02, 0x0c]),
    // 4K lossy
    entry(0x0501, "IMF 4K lossy M1S0", [0x03, 0x01]),
    entry(0x0502, "IMF 4K lossy M2S0", [0x03, 0x02]),
    entry(0x0503, "IMF 4K lossy M3S0", [0x03, 0x03]),
    entry(0x0504, "IMF 4K lossy M4S0", [0x03, 0x04]),
    entry(0x0514, "IMF 4K lossy M4S1", [0x03, 0x05]),
    entry(0x0505, "IMF 4K lossy M5S0", [0x03, 0x06]),
    entry(0x0515, "IMF 4K lossy M5S1", [0x03, 0x07]),
    entry(0x0525, "IMF 4K lossy M5S2", [0x03, 0x08]),
    entry(0x0506, "IMF 4K lossy M6S0", [0x03, 0x09]),
    entry(0x0516, "IMF 4K lossy M6S1", [0x03, 0x0a]),
    entry(0x0526, "IMF 4K lossy M6S2", [0x03, 0x0b]),
    entry(0x0536, "IMF 4K lossy M6S3", [0x03, 0x0c]),
    entry(0x0507, "IMF 4K lossy M7S0", [0x03, 0x0d]),
    entry(0x0517, "IMF 4K lossy M7S1", [0x03, 0x0e]),
    entry(0x0527, "IMF 4K lossy M7S2", [0x03, 0x0f]),
    entry(0x0537, "IMF 4K lossy M7S3", [0x03, 0x10]),
    entry(0x0547, "IMF 4K lossy M7S4", [0x03, 0x11]),
    // 8K lossy
    entry(0x0601, "IMF 8K lossy M1S0", [0x04, 0x01]),
    entry(0x0602, "IMF 8K lossy M2S0", [0x04, 0x02]),
    entry(0x0603, "IMF 8K lossy M3S0", [0x04, 0x03]),
    entry(0x0604, "IMF 8K lossy M4S0", [0x04, 0x04]),
    entry(0x0614, "IMF 8K lossy M4S1", [0x04, 0x05]),
    entry(0x0605, "IMF 8K lossy M5S0", [0x04, 0x06]),
    entry(0x0615, "IMF 8K lossy M5S1", [0x04, 0x07]),
    entry(0x0625, "IMF 8K lossy M5S2", [0x04, 0x08]),
    entry(0x0606, "IMF 8K lossy M6S0", [0x04, 0x09]),
    entry(0x0616, "IMF 8K lossy M6S1", [0x04, 0x0a]),
    entry(0x0626, "IMF 8K lossy M6S2", [0x04, 0x0b]),
    entry(0x0636, "IMF 8K lossy M6S3", [0x04, 0x0c]),
    entry(0x0607, "IMF 8K lossy M7S0", [0x04, 0x0d]),
    entry(0x0617, "IMF 8K lossy M7S1", [0x04, 0x0e]),
    entry(0x0627, "IMF 8K lossy M7S2", [0x04, 0x0f]),
    entry(0x0637, "IMF 8K lossy M7S3", [0x04, 0x10]),
    entry(0x0647, "IMF 8K lossy M7S4", [0x04, 0x11]),
    entry(0x0608, "IMF 8K lossy M8S0", [0x04, 0x12]),
    entry(0x0618, "IMF 8K lossy M8S1", [0x04, 0x13]),
    entry(0x0628, "IMF 8K lossy M8S2", [0x04, 0x14]),
    entry(0x0638, "IMF 8K lossy M8S3", [0x04, 0x15]),
    entry(0x0648, "IMF 8K lossy M8S4", [0x04, 0x16]),
    entry(0x0658, "IMF 8K lossy M8S5", [0x04, 0x17]),
    entry(0x0609, "IMF 8K lossy M9S0", [0x04, 0x18]),
    entry(0x0619, "IMF 8K lossy M9S1", [0x04, 0x19]),
    entry(0x0629, "IMF 8K lossy M9S2", [0x04, 0x1a]),
    entry(0x0639, "IMF 8K lossy M9S3", [0x04, 0x1b]),
    entry(0x0649, "IMF 8K lossy M9S4", [0x04, 0x1c]),
    entry(0x0659, "IMF 8K lossy M9S5", [0x04, 0x1d]),
    entry(0x0669, "IMF 8K lossy M9S6", [0x04, 0x1e]),
    // 2K reversible
    entry(0x0701, "IMF 2K reversible M1S0", [0x05, 0x01]),
    entry(0x0702, "IMF 2K reversible M2S0", [0x05, 0x02]),
    entry(0x0703, "IMF 2K reversible M3S0", [0x05, 0x03]),
    entry(0x0704, "IMF 2K reversible M4S0", [0x05, 0x04]),
    entry(0x0714, "IMF 2K reversible M4S1", [0x05, 0x05]),
    entry(0x0705, "IMF 2K reversible M5S0", [0x05, 0x06]),
    entry(0x0715, "IMF 2K reversible M5S1", [0x05, 0x07]),
    entry(0x0725, "IMF 2K reversible M5S2", [0x05, 0x08]),
    entry(0x0706, "IMF 2K reversible M6S0", [0x05, 0x09]),
    entry(0x0716, "IMF 2K reversible M6S1", [0x05, 0x0a]),
    entry(0x0726, "IMF 2K reversible M6S2", [0x05, 0x0b]),
    entry(0x0736, "IMF 2K reversible M6S3", [0x05, 0x0c]),
    // 4K reversible
    entry(0x0801, "IMF 4K reversible M1S0", [0x06, 0x01]),
    entry(0x0802, "IMF 4K reversible M2S0", [0x06, 0x02]),
    entry(0x0803, "IMF 4K reversible M3S0", [0x06, 0x03]),
    entry(0x0804, "IMF 4K reversible M4S0", [0x06, 0x04]),
    entry(0x0814, "IMF 4K reversible M4S1", [0x06, 0x05]),
    entry(0x0805, "IMF 4K reversible M5S0", [0x06, 0x06]),
    entry(0x0815, "IMF 4K reversible M5S1", [0x06, 0x07]),
    entry(0x0825, "IMF 4K reversible M5S2", [0x06, 0x08]),
    entry(0x0806, "IMF 4K reversible M6S0", [0x06, 0x09]),
    entry(0x0816, "IMF 4K reversible M6S1", [0x06, 0x0a]),
    entry(0x0826, "IMF 4K reversible M6S2", [0x06, 0x0b]),
    entry(0x0836, "IMF 4K reversible M6S3", [0x06, 0x0c]),
    entry(0x0807, "IMF 4K reversible M7S0", [0x06, 0x0d]),
    entry(0x0817, "IMF 4K reversible M7S1", [0x06, 0x0e]),
    entry(0x0827, "IMF 4K reversible M7S2", [0x06, 0x0f]),
    entry(0x0837, "IMF 4K reversible M7S3", [0x06, 0x10]),
    entry(0x0847, "IMF 4K reversible M7S4", [0x06, 0x11]),
    // 8K reversible
    entry(0x0901, "IMF 8K reversible M1S0", [0x07, 0x01]),
    entry(0x0902, "IMF 8K reversible M2S0", [0x07, 0x02]),
    entry(0x0903, "IMF 8K reversible M3S0", [0x07, 0x03]),
    entry(0x0904, "IMF 8K reversible M4S0", [0x07, 0x04]),
    entry(0x0914, "IMF 8K reversible M4S1", [0x07, 0x05]),
    entry(0x0905, "IMF 8K reversible M5S0", [0x07, 0x06]),
    entry(0x0915, "IMF 8K reversible M5S1", [0x07, 0x07]),
    entry(0x0925, "IMF 8K reversible M5S2", [0x07, 0x08]),
    entry(0x0906, "IMF 8K reversible M6S0", [0x07, 0x09]),
    entry(0x0916, "IMF 8K reversible M6S1", [0x07, 0x0a]),
    entry(0x0926, "IMF 8K reversible M6S2", [0x07, 0x0b]),
    entry(0x0936, "IMF 8K reversible M6S3", [0x07, 0x0c]),
    entry(0x0907, "IMF 8K reversible M7S0", [0x07, 0x0d]),
    entry(0x0917, "IMF 8K reversible M7S1", [0x07, 0x0e]),
    entry(0x0927, "IMF 8K reversible M7S2", [0x07, 0x0f]),
    entry(0x0937, "IMF 8K reversible M7S3", [0x07, 0x10]),
    entry(0x0947, "IMF 8K reversible M7S4", [0x07, 0x11]),
    entry(0x0908, "IMF 8K reversible M8S0", [0x07, 0x12]),
    entry(0x0918, "IMF 8K reversible M8S1", [0x07, 0x13]),
    entry(0x0928, "IMF 8K reversible M8S2", [0x07, 0x14]),
    entry(0x0938, "IMF 8K reversible M8S3", [0x07, 0x15]),
    entry(0x0948, "IMF 8K reversible M8S4", [0x07, 0x16]),
    entry(0x0958, "IMF 8K reversible M8S5", [0x07, 0x17]),
    entry(0x0909, "IMF 8K reversible M9S0", [0x07, 0x18]),
    entry(0x0919, "IMF 8K reversible M9S1", [0x07, 0x19]),
    entry(0x0929, "IMF 8K reversible M9S2", [0x07, 0x1a]),
    entry(0x0939, "IMF 8K reversible M9S3", [0x07, 0x1b]),
    entry(0x0949, "IMF 8K reversible M9S4", [0x07, 0x1c]),
    entry(0x0959, "IMF 8K reversible M9S5", [0x07, 0x1d]),
    entry(0x0969, "IMF 8K reversible M9S6", [0x07, 0x1e]),
];

/// Look up the table entry for an Rsiz value.
pub fn lookup(profile_id: u16) -> Option<&'static ProfileLabelEntry> {
    IMF_PROFILES.iter().find(|e| e.profile_id == profile_id)
}

/// Human-readable name of an IMF profile.
pub fn profile_name(profile_id: u16) -> Option<&'static str> {
    lookup(profile_id).map(|e| e.name)
}

/// Resolve the picture essence coding label for a codestream.
///
/// The HT capability bit wins over the Rsiz value.
pub fn resolve(capability_flags: u32, profile_id: u16) -> Result<Ul> {
    if capability_flags & HT_CAPABILITY_FLAG != 0 {
        return Ok(HTJ2K_GENERIC);
    }

    lookup(profile_id)
        .map(ProfileLabelEntry::label)
        .ok_or(WrapError::UnsupportedProfile { profile_id })
}
