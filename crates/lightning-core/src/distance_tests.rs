//! Tests for `distance` module.

use super::distance::*;
use super::error::Error;
use super::simd_native::{Backend, SimdLevel};

fn kernels() -> [DistanceKernel; 2] {
    [DistanceKernel::new(Backend::Auto), DistanceKernel::scalar()]
}

// =========================================================================
// Euclidean
// =========================================================================

#[test]
fn test_euclidean_three_four_five() {
    for kernel in kernels() {
        let d = kernel.euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-6, "{:?}: {d}", kernel.level());
    }
}

#[test]
fn test_euclidean_identical_is_zero() {
    let v: Vec<f32> = (0..128).map(|i| i as f32 * 0.25).collect();
    for kernel in kernels() {
        assert_eq!(kernel.euclidean(&v, &v).unwrap(), 0.0);
    }
}

#[test]
fn test_euclidean_large_components_do_not_overflow() {
    for kernel in kernels() {
        for n in [1_usize, 16, 300] {
            let a = vec![1e20_f32; n];
            let b = vec![-1e20_f32; n];
            let d = kernel.euclidean(&a, &b).unwrap();
            let expected = 2e20 * (n as f64).sqrt();
            assert!(d.is_finite(), "{:?} n={n}: {d}", kernel.level());
            assert!(((f64::from(d) - expected) / expected).abs() < 1e-6);
        }
    }
}

#[test]
fn test_euclidean_tiny_components_do_not_underflow() {
    for kernel in kernels() {
        for n in [1_usize, 16, 300] {
            let a = vec![1e-23_f32; n];
            let b = vec![-1e-23_f32; n];
            let d = kernel.euclidean(&a, &b).unwrap();
            let expected = 2e-23 * (n as f64).sqrt();
            assert!(((f64::from(d) - expected) / expected).abs() < 1e-6, "{d}");
            assert_eq!(kernel.euclidean(&a, &a).unwrap(), 0.0);
        }
    }
}

#[test]
fn test_euclidean_beyond_f32_range_is_infinite() {
    let d = DistanceKernel::default()
        .euclidean(&[f32::MAX], &[-f32::MAX])
        .unwrap();
    assert_eq!(d, f32::INFINITY);
}

#[test]
fn test_squared_euclidean_skips_sqrt() {
    let kernel = DistanceKernel::default();
    let sq = kernel.squared_euclidean(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0]).unwrap();
    // 9 + 16 + 25
    assert!((sq - 50.0).abs() < 1e-5);
}

#[test]
fn test_euclidean_dimension_mismatch() {
    let err = DistanceKernel::default()
        .euclidean(&[1.0, 2.0, 3.0], &[1.0, 2.0])
        .unwrap_err();
    assert_eq!(err, Error::dimension(3, 2));
}

#[test]
fn test_euclidean_empty_operand() {
    let kernel = DistanceKernel::default();
    assert_eq!(kernel.euclidean(&[], &[]), Err(Error::EmptyVector));
    assert_eq!(kernel.euclidean(&[1.0], &[]), Err(Error::EmptyVector));
}

// =========================================================================
// Cosine
// =========================================================================

#[test]
fn test_cosine_orthogonal_is_one() {
    for kernel in kernels() {
        let d = kernel.cosine(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - 1.0).abs() < 1e-6);
    }
}

#[test]
fn test_cosine_parallel_is_zero() {
    for kernel in kernels() {
        let d = kernel.cosine(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!(d.abs() < 1e-6, "{d}");
    }
}

#[test]
fn test_cosine_self_is_exactly_zero() {
    let v: Vec<f32> = (0..300).map(|i| (i as f32 * 0.3).sin() + 0.1).collect();
    for kernel in kernels() {
        assert_eq!(kernel.cosine(&v, &v).unwrap(), 0.0);
    }
}

#[test]
fn test_cosine_self_is_zero_at_extreme_magnitudes() {
    for kernel in kernels() {
        for n in [2_usize, 16, 300] {
            for scale in [1e20_f32, 1e-20, 1e-23, 1e-40, f32::MAX] {
                let v = vec![scale; n];
                assert_eq!(
                    kernel.cosine(&v, &v).unwrap(),
                    0.0,
                    "{:?} n={n} scale={scale}",
                    kernel.level()
                );
                let opposite: Vec<f32> = v.iter().map(|x| -x).collect();
                assert_eq!(kernel.cosine(&v, &opposite).unwrap(), 2.0);
            }
        }
    }
}

#[test]
fn test_cosine_tiny_vector_is_not_treated_as_zero() {
    for kernel in kernels() {
        let tiny = [1e-23_f32, 1e-23];
        assert_eq!(kernel.cosine(&tiny, &[1.0, 1.0]).unwrap(), 0.0);
        let d = kernel.cosine(&tiny, &[1.0, 0.0]).unwrap();
        assert!((d - (1.0 - std::f32::consts::FRAC_1_SQRT_2)).abs() < 1e-6);
    }
}

#[test]
fn test_cosine_zero_norm_is_one() {
    for kernel in kernels() {
        assert_eq!(kernel.cosine(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 1.0);
        assert_eq!(kernel.cosine(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 1.0);
    }
}

#[test]
fn test_cosine_dimension_mismatch() {
    let err = DistanceKernel::default()
        .cosine(&[1.0, 2.0], &[1.0, 2.0, 3.0])
        .unwrap_err();
    assert_eq!(err, Error::dimension(2, 3));
}

#[test]
fn test_cosine_range() {
    let a: Vec<f32> = (0..64).map(|i| (i as f32).sin()).collect();
    let b: Vec<f32> = (0..64).map(|i| (i as f32 * 1.7).cos()).collect();
    let d = DistanceKernel::default().cosine(&a, &b).unwrap();
    assert!((0.0..=2.0).contains(&d));
}

// =========================================================================
// Declared dimension
// =========================================================================

#[test]
fn test_with_dim_checks_each_operand() {
    let kernel = DistanceKernel::default();
    assert!(kernel.euclidean_with_dim(&[1.0, 2.0], &[3.0, 4.0], 2).is_ok());
    assert_eq!(
        kernel.euclidean_with_dim(&[1.0, 2.0], &[3.0, 4.0], 3),
        Err(Error::dimension(3, 2))
    );
    assert_eq!(
        kernel.cosine_with_dim(&[1.0, 2.0, 3.0], &[3.0, 4.0], 3),
        Err(Error::dimension(3, 2))
    );
    assert_eq!(
        kernel.cosine_with_dim(&[1.0], &[1.0], 0),
        Err(Error::EmptyVector)
    );
}

// =========================================================================
// Kernel and metric plumbing
// =========================================================================

#[test]
fn test_scalar_kernel_reports_scalar_level() {
    let kernel = DistanceKernel::scalar();
    assert_eq!(kernel.level(), SimdLevel::Scalar);
    assert!(!kernel.is_accelerated());
}

#[test]
fn test_auto_kernel_matches_capabilities() {
    let kernel = DistanceKernel::new(Backend::Auto);
    assert_eq!(kernel.level(), crate::capabilities().tier());
}

#[test]
fn test_distance_dispatches_on_metric() {
    let kernel = DistanceKernel::default();
    let a = [1.0, 0.0];
    let b = [0.0, 1.0];
    assert_eq!(
        kernel.distance(DistanceMetric::Euclidean, &a, &b),
        kernel.euclidean(&a, &b)
    );
    assert_eq!(
        kernel.distance(DistanceMetric::Cosine, &a, &b),
        kernel.cosine(&a, &b)
    );
}

#[test]
fn test_metric_parse_and_display() {
    assert_eq!(
        "euclidean".parse::<DistanceMetric>(),
        Ok(DistanceMetric::Euclidean)
    );
    assert_eq!("L2".parse::<DistanceMetric>(), Ok(DistanceMetric::Euclidean));
    assert_eq!("Cosine".parse::<DistanceMetric>(), Ok(DistanceMetric::Cosine));
    assert!("hamming".parse::<DistanceMetric>().is_err());
    assert_eq!(DistanceMetric::Cosine.to_string(), "cosine");
    assert_eq!(DistanceMetric::default(), DistanceMetric::Euclidean);
}

#[test]
fn test_metric_serde_lowercase() {
    let json = serde_json::to_string(&DistanceMetric::Cosine).unwrap();
    assert_eq!(json, "\"cosine\"");
    let back: DistanceMetric = serde_json::from_str("\"euclidean\"").unwrap();
    assert_eq!(back, DistanceMetric::Euclidean);
}

#[test]
fn test_kernel_is_send_sync_copy() {
    fn assert_traits<T: Send + Sync + Copy>() {}
    assert_traits::<DistanceKernel>();
}
