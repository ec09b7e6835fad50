//! Scalar reference implementations of the distance kernels.
//!
//! These functions serve as:
//! - The portable path on CPUs without a supported SIMD tier
//! - Reference implementations for testing SIMD correctness
//! - Tail handlers for vectors shorter than one SIMD lane

use super::CosineParts;

/// Scalar squared L2 distance.
#[inline]
#[must_use]
pub fn squared_l2_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Scalar dot product.
#[inline]
#[must_use]
pub fn dot_product_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scalar single-pass dot product and squared norms.
///
/// Accumulates `a·b`, `|a|²` and `|b|²` in one sweep so the cosine distance
/// policy can be applied by the caller.
#[inline]
#[must_use]
pub fn cosine_parts_scalar(a: &[f32], b: &[f32]) -> CosineParts {
    let mut dot = 0.0_f32;
    let mut norm_a_sq = 0.0_f32;
    let mut norm_b_sq = 0.0_f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    CosineParts {
        dot,
        norm_a_sq,
        norm_b_sq,
    }
}

/// Squared L2 distance accumulated in `f64`.
///
/// Squares of any finite `f32` difference fit in `f64` without overflow or
/// underflow. `DistanceKernel` falls back to this when an `f32` kernel result
/// leaves the normal range.
#[must_use]
pub fn squared_l2_wide(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum()
}

/// Cosine distance with the dot product and norms accumulated in `f64`.
///
/// Same zero-norm and clamp policy as [`CosineParts::distance`]; the norm is
/// only zero here when every component is zero.
#[must_use]
pub fn cosine_distance_wide(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0_f64;
    let mut norm_a_sq = 0.0_f64;
    let mut norm_b_sq = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a_sq += x * x;
        norm_b_sq += y * y;
    }

    super::cosine_from_parts(dot, norm_a_sq, norm_b_sq)
}
