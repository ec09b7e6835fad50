//! Fuzz target for the distance entry points.
//!
//! Feeds arbitrary vectors (NaN, Inf, subnormals, ragged lengths) through the
//! pairwise, batch and zero-copy paths looking for:
//! - Panics on malformed input instead of a returned error
//! - Divergence between batch results and pairwise results
//! - Zero-copy views that disagree with the copying path
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_distance_metrics
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lightning_core::{BatchEvaluator, DistanceKernel, DistanceMetric, ExternalRegion};

const MAX_DIM: usize = 2048;
const MAX_CANDIDATES: usize = 64;

/// Fuzzing input for distance calculations.
#[derive(Arbitrary, Debug)]
struct DistanceInput {
    /// Query vector
    vec_a: Vec<f32>,
    /// Second operand, deliberately not length-matched
    vec_b: Vec<f32>,
    /// Batch candidates, some of which may be ragged
    candidates: Vec<Vec<f32>>,
    /// Raw bytes for the zero-copy path
    raw: Vec<u8>,
    use_scalar: bool,
}

fuzz_target!(|input: DistanceInput| {
    let kernel = if input.use_scalar {
        DistanceKernel::scalar()
    } else {
        DistanceKernel::default()
    };

    let a: Vec<f32> = input.vec_a.into_iter().take(MAX_DIM).collect();
    let b: Vec<f32> = input.vec_b.into_iter().take(MAX_DIM).collect();

    // Pairwise: errors are fine, panics are not.
    let euclid = kernel.euclidean(&a, &b);
    let cosine = kernel.cosine(&a, &b);
    assert_eq!(euclid.is_ok(), !a.is_empty() && a.len() == b.len());
    assert_eq!(euclid.is_ok(), cosine.is_ok());
    if let Ok(d) = cosine {
        assert!(d.is_nan() || (0.0..=2.0).contains(&d), "cosine out of range: {d}");
    }

    // Batch must agree with pairwise bit for bit.
    let candidates: Vec<Vec<f32>> = input
        .candidates
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|c| c.into_iter().take(MAX_DIM).collect())
        .collect();
    let evaluator = BatchEvaluator::new(kernel).with_parallel_threshold(16);
    for metric in [DistanceMetric::Euclidean, DistanceMetric::Cosine] {
        if let Ok(results) = evaluator.batch(metric, &a, &candidates) {
            assert_eq!(results.len(), candidates.len());
            for (got, candidate) in results.iter().zip(&candidates) {
                let want = kernel.distance(metric, &a, candidate).map(f32::to_bits);
                assert_eq!(Ok(got.to_bits()), want);
            }
        }
    }

    // Zero-copy over arbitrary bytes.
    if let Ok(region) = ExternalRegion::from_bytes(&input.raw) {
        let owned = region.as_slice().to_vec();
        let probe = vec![1.0_f32; owned.len()];
        let direct = kernel.euclidean_direct(&region, &probe).map(f32::to_bits);
        let copied = kernel.euclidean(&owned, &probe).map(f32::to_bits);
        assert_eq!(direct, copied);
    }
});
