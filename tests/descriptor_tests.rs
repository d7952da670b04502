// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Descriptor resolution tests, from codestream bytes to descriptor record.

mod common;

use common::CodestreamBuilder;
use j2kwrap::core::ul::labels;
use j2kwrap::metadata::{build_descriptor, profile};
use j2kwrap::{
    ColorimetryRegistry, ComponentScheme, DescriptorRecord, HeaderParser, J2kHeaderParser,
    Quantization, Result, ShapeKind, WrapError,
};
use proptest::prelude::*;

fn resolve(
    codestream: &[u8],
    colorimetry: &str,
    scheme: ComponentScheme,
    quantization: Quantization,
) -> Result<DescriptorRecord> {
    let registry = ColorimetryRegistry::standard();
    let color = registry.from_name(colorimetry)?;
    let geometry = J2kHeaderParser::new().parse(codestream)?;
    build_descriptor(&geometry, color, scheme, quantization)
}

#[test]
fn test_xyz_cinema_mezzanine() {
    let codestream = CodestreamBuilder::new().build();
    let record = resolve(
        &codestream,
        "CinemaMezzanine",
        ComponentScheme::Xyz,
        Quantization::Full,
    )
    .unwrap();

    assert_eq!(record.shape, ShapeKind::Rgba);
    assert_eq!((record.stored_width, record.stored_height), (1920, 1080));
    assert_eq!(record.component_depth, 12);
    assert_eq!(record.component_max_ref, 4095);
    assert_eq!(record.component_min_ref, 0);
    assert_eq!(record.layout, [0xd8, 12, 0xd9, 12, 0xda, 12, 0]);
    assert_eq!(record.component_scheme(), ComponentScheme::Xyz);
    assert_eq!(
        record.picture_essence_coding,
        profile::lookup(0x0401).unwrap().label()
    );
    assert_eq!(
        record.transfer_characteristic,
        labels::TRANSFER_CINEMA_MEZZANINE_DCDM
    );
    assert_eq!(record.color_primaries, labels::PRIMARIES_CINEMA_MEZZANINE);
    assert!(record.cdci.is_none());
}

#[test]
fn test_ycbcr_422_partial() {
    let codestream = CodestreamBuilder::ht().depth_and_chroma(10, 2).build();
    let record = resolve(
        &codestream,
        "color5",
        ComponentScheme::YCbCr,
        Quantization::Partial,
    )
    .unwrap();

    assert_eq!(record.shape, ShapeKind::Cdci);
    assert_eq!(record.component_max_ref, 940);
    assert_eq!(record.component_min_ref, 64);
    assert_eq!(record.picture_essence_coding, labels::HTJ2K_GENERIC);
    let cdci = record.cdci.unwrap();
    assert_eq!(cdci.horizontal_subsampling, 2);
    assert_eq!(cdci.color_range, 897);
    assert_eq!(cdci.coding_equations, labels::CODING_BT2020_NCL);
}

#[test]
fn test_rgb_partial_8bit() {
    let codestream = CodestreamBuilder::ht().depth_and_chroma(8, 1).build();
    let record = resolve(
        &codestream,
        "Color3",
        ComponentScheme::Rgb,
        Quantization::Partial,
    )
    .unwrap();
    assert_eq!(record.component_max_ref, 235);
    assert_eq!(record.component_min_ref, 16);
    assert_eq!(record.layout, [0x52, 8, 0x47, 8, 0x42, 8, 0]);
}

#[test]
fn test_unknown_colorimetry() {
    let codestream = CodestreamBuilder::new().build();
    let err = resolve(&codestream, "Color8", ComponentScheme::Rgb, Quantization::Full).unwrap_err();
    assert!(matches!(err, WrapError::UnknownColorimetryScheme { .. }));
}

#[test]
fn test_unsupported_profile() {
    let codestream = CodestreamBuilder::new().rsiz(9999).build();
    let err = resolve(&codestream, "Color3", ComponentScheme::Rgb, Quantization::Full).unwrap_err();
    assert!(matches!(
        err,
        WrapError::UnsupportedProfile { profile_id: 9999 }
    ));
}

#[test]
fn test_subsampled_rgb_rejected() {
    let codestream = CodestreamBuilder::ht().depth_and_chroma(10, 2).build();
    let err = resolve(&codestream, "Color3", ComponentScheme::Rgb, Quantization::Full).unwrap_err();
    assert!(matches!(
        err,
        WrapError::SubsampledComponentsInRgbMode {
            component: 1,
            dx: 2,
            dy: 1
        }
    ));
}

#[test]
fn test_unequal_chroma_subsampling() {
    let codestream = CodestreamBuilder::ht()
        .components(vec![(9, 1, 1), (9, 2, 1), (9, 4, 1)])
        .build();
    let err = resolve(
        &codestream,
        "Color3",
        ComponentScheme::YCbCr,
        Quantization::Partial,
    )
    .unwrap_err();
    assert!(matches!(err, WrapError::UnequalSubsampling { .. }));
}

#[test]
fn test_ycbcr_full_range_rejected() {
    let codestream = CodestreamBuilder::ht().depth_and_chroma(10, 2).build();
    let err = resolve(
        &codestream,
        "Color3",
        ComponentScheme::YCbCr,
        Quantization::Full,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        WrapError::InvalidQuantizationForScheme { .. }
    ));
}

#[test]
fn test_two_component_codestream() {
    let codestream = CodestreamBuilder::ht()
        .components(vec![(11, 1, 1), (11, 1, 1)])
        .build();
    let err = resolve(&codestream, "Color3", ComponentScheme::Rgb, Quantization::Full).unwrap_err();
    assert!(matches!(
        err,
        WrapError::UnsupportedComponentCount { count: 2 }
    ));
}

#[test]
fn test_truncated_codestream() {
    let codestream = CodestreamBuilder::new().build();
    let err = resolve(
        &codestream[..10],
        "Color3",
        ComponentScheme::Rgb,
        Quantization::Full,
    )
    .unwrap_err();
    assert!(matches!(err, WrapError::MalformedCodestream { .. }));
}

proptest! {
    #[test]
    fn prop_unequal_depths_always_rejected(
        a in 0u8..16,
        b in 0u8..16,
        c in 0u8..16,
        ycc in any::<bool>(),
    ) {
        prop_assume!(a != b || b != c);
        let codestream = CodestreamBuilder::ht()
            .components(vec![(a, 1, 1), (b, 1, 1), (c, 1, 1)])
            .build();
        let (scheme, quantization) = if ycc {
            (ComponentScheme::YCbCr, Quantization::Partial)
        } else {
            (ComponentScheme::Rgb, Quantization::Full)
        };
        let result = resolve(&codestream, "Color3", scheme, quantization);
        let is_unequal_depth = matches!(result, Err(WrapError::UnequalComponentDepth { .. }));
        prop_assert!(is_unequal_depth);
    }

    #[test]
    fn prop_ht_flag_yields_generic_label(rsiz in any::<u16>(), extra in any::<u32>()) {
        let codestream = CodestreamBuilder::new()
            .rsiz(rsiz)
            .pcap(extra | profile::HT_CAPABILITY_FLAG)
            .build();
        let record = resolve(&codestream, "Color1", ComponentScheme::Rgb, Quantization::Full).unwrap();
        prop_assert_eq!(record.picture_essence_coding, labels::HTJ2K_GENERIC);
    }
}
