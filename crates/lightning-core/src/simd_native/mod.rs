//! Native SIMD intrinsics for the distance kernels.
//!
//! This module provides hand-tuned SIMD implementations using `core::arch`
//! intrinsics for AVX2+FMA and ARM NEON, with a scalar reference path.
//!
//! # Module Structure
//!
//! - `scalar`: Scalar reference implementations
//! - `tail_unroll`: Remainder/tail handling macros for SIMD loops
//! - `prefetch`: CPU cache prefetch utilities
//! - `x86_avx2`: AVX2+FMA squared L2 kernels (x86_64 only)
//! - `x86_avx2_similarity`: AVX2+FMA fused cosine kernels (x86_64 only)
//! - `neon`: ARM NEON kernels (aarch64 only)
//! - `dispatch`: Tier-to-kernel wiring and cached dispatch
//!
//! # Performance
//!
//! - **AVX2**: 8-wide f32 with FMA, multi-accumulator ILP above 256 elements
//! - **ARM NEON**: 4-wide f32, 4 accumulators above 64 elements
//! - **Prefetch**: software prefetching of upcoming batch candidates
#![allow(clippy::doc_markdown)] // Contains ISA/architecture nomenclature in docs.
#![allow(clippy::missing_panics_doc)] // Dispatch APIs assert equal vector dimensions by design.

pub mod prefetch;
pub mod scalar;
mod tail_unroll;

pub use prefetch::{calculate_prefetch_distance, prefetch_vector, L2_CACHE_LINE_BYTES};

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: All pointer arithmetic is derived from slice pointers with loop bounds
//   proving in-range access for each lane width.
// - Condition 2: Target-featured functions are reachable only through
//   `dispatch::*_kernel`, which hands them out after runtime feature checks.
// - Condition 3: Unaligned loads use `*_loadu_*` / `vld1q_*` which permit unaligned access.
// - Condition 4: Both operands have equal length; every public entry point validates or
//   asserts this before a kernel runs.

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "x86_64")]
mod x86_avx2_similarity;

#[cfg(target_arch = "aarch64")]
mod neon;

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx2::{squared_l2_avx2_1acc, squared_l2_avx2_4acc};

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_avx2_similarity::{cosine_parts_avx2, cosine_parts_avx2_2acc};

#[cfg(target_arch = "aarch64")]
pub(crate) use neon::{cosine_parts_neon, squared_l2_neon};

mod dispatch;

pub(crate) use dispatch::{cosine_parts_kernel, squared_l2_kernel, CosinePartsFn, SquaredL2Fn};
pub use dispatch::{
    cosine_distance_native, cosine_parts_native, euclidean_native, simd_level,
    squared_l2_native, warmup_simd_cache, Backend, SimdLevel,
};

/// Dot product and squared norms accumulated in one pass over two vectors.
///
/// Every cosine kernel produces this triple; [`CosineParts::distance`]
/// applies the zero-norm policy exactly once for all tiers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CosineParts {
    /// `a · b`
    pub dot: f32,
    /// `|a|²`
    pub norm_a_sq: f32,
    /// `|b|²`
    pub norm_b_sq: f32,
}

impl CosineParts {
    /// Cosine distance `1 - (a·b)/(|a||b|)`.
    ///
    /// Returns exactly `1.0` when either vector has zero norm. The similarity
    /// is clamped to `[-1, 1]`, so the distance always lies in `[0, 2]`.
    /// The ratio is formed in `f64` so `cosine(a, a)` is exactly zero.
    ///
    /// This trusts the `f32` accumulators; check [`CosineParts::is_well_scaled`]
    /// first when the inputs may hold very large or very small components.
    #[inline]
    #[must_use]
    pub fn distance(self) -> f32 {
        cosine_from_parts(
            f64::from(self.dot),
            f64::from(self.norm_a_sq),
            f64::from(self.norm_b_sq),
        )
    }

    /// Whether the `f32` sums are finite and both norms are in the normal range.
    ///
    /// A squared norm that overflowed to infinity or underflowed towards zero
    /// no longer describes the vector, so the distance has to be recomputed
    /// with [`scalar::cosine_distance_wide`].
    #[inline]
    #[must_use]
    pub fn is_well_scaled(self) -> bool {
        self.dot.is_finite() && self.norm_a_sq.is_normal() && self.norm_b_sq.is_normal()
    }
}

/// Zero-norm and clamp policy shared by the `f32` and `f64` cosine paths.
#[inline]
pub(crate) fn cosine_from_parts(dot: f64, norm_a_sq: f64, norm_b_sq: f64) -> f32 {
    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return 1.0;
    }
    let similarity = (dot / (norm_a_sq * norm_b_sq).sqrt()).clamp(-1.0, 1.0);
    // Reason: value is in [0, 2], always representable in f32.
    #[allow(clippy::cast_possible_truncation)]
    let distance = (1.0 - similarity) as f32;
    distance
}

/// Euclidean distance from a kernel's `f32` squared sum.
///
/// Anything outside the normal range (overflow, underflow, exact zero) is
/// recomputed in `f64`, so identical inputs still give `0.0` and distances
/// that fit in `f32` never come back as infinity.
#[inline]
pub(crate) fn finish_euclidean(squared: f32, a: &[f32], b: &[f32]) -> f32 {
    if squared.is_normal() {
        return squared.sqrt();
    }
    // Reason: overflow past f32::MAX becomes infinity, which is the true answer.
    #[allow(clippy::cast_possible_truncation)]
    let distance = scalar::squared_l2_wide(a, b).sqrt() as f32;
    distance
}

/// Squared Euclidean distance with the same fallback as [`finish_euclidean`].
#[inline]
pub(crate) fn finish_squared_l2(squared: f32, a: &[f32], b: &[f32]) -> f32 {
    if squared.is_normal() {
        return squared;
    }
    #[allow(clippy::cast_possible_truncation)]
    let squared = scalar::squared_l2_wide(a, b) as f32;
    squared
}

/// Cosine distance from fused kernel output, recomputed in `f64` when the
/// `f32` sums are not trustworthy.
#[inline]
pub(crate) fn finish_cosine(parts: CosineParts, a: &[f32], b: &[f32]) -> f32 {
    if parts.is_well_scaled() {
        parts.distance()
    } else {
        scalar::cosine_distance_wide(a, b)
    }
}
