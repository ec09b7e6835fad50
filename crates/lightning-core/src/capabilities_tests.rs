//! Tests for `capabilities` module.

use super::capabilities::*;
use super::simd_native::SimdLevel;

#[test]
fn test_capabilities_is_stable() {
    let first = capabilities();
    let second = capabilities();
    assert!(std::ptr::eq(first, second));
    assert!(capabilities_resolved());
}

#[test]
fn test_lane_width_matches_tier() {
    let caps = capabilities();
    assert_eq!(caps.lane_width(), caps.tier().lane_width());
    assert_eq!(caps.is_accelerated(), caps.tier() != SimdLevel::Scalar);
    assert_eq!(is_accelerated(), caps.is_accelerated());
}

#[test]
fn test_arch_is_reported() {
    assert_eq!(capabilities().arch(), std::env::consts::ARCH);
}

#[test]
fn test_tier_backed_by_features() {
    let caps = capabilities();
    match caps.tier() {
        SimdLevel::Avx2 => {
            assert!(caps.has_feature("avx2"));
            assert!(caps.has_feature("fma"));
        }
        SimdLevel::Neon => assert!(caps.has_feature("neon")),
        SimdLevel::Scalar => {}
    }
    assert!(!caps.has_feature("not-a-real-feature"));
}

#[test]
fn test_select_tier_rules() {
    let avx = select_tier(&["sse2", "avx", "avx2", "fma"]);
    let avx_no_fma = select_tier(&["sse2", "avx", "avx2"]);
    let neon = select_tier(&["neon"]);
    assert_eq!(select_tier(&[]), SimdLevel::Scalar);
    assert_eq!(avx_no_fma, SimdLevel::Scalar);

    if cfg!(target_arch = "x86_64") {
        assert_eq!(avx, SimdLevel::Avx2);
        assert_eq!(neon, SimdLevel::Scalar);
    } else if cfg!(target_arch = "aarch64") {
        assert_eq!(avx, SimdLevel::Scalar);
        assert_eq!(neon, SimdLevel::Neon);
    }
}

#[test]
fn test_display_is_one_line_summary() {
    let text = capabilities().to_string();
    assert!(text.starts_with("lightning-simd tier="));
    assert!(text.contains(&format!("lanes={}", capabilities().lane_width())));
    assert!(!text.contains('\n'));
}

#[test]
fn test_json_report_fields() {
    let caps = capabilities();
    let value: serde_json::Value = serde_json::from_str(&caps.to_json()).unwrap();
    assert_eq!(value["lane_width"], caps.lane_width());
    assert_eq!(value["arch"], caps.arch());
    assert_eq!(value["accelerated"], caps.is_accelerated());
    assert!(value["features"].is_array());
    assert!(value["tier"].is_string());
}
