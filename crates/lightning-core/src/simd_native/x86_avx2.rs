//! AVX2+FMA kernel implementations for x86_64.
//!
//! Contains hand-tuned AVX2 SIMD kernels for squared L2 distance with
//! 1-acc and 4-acc variants for different vector sizes.
//!
//! All functions require runtime AVX2+FMA detection before calling.

#![allow(clippy::incompatible_msrv)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::similar_names)]

use std::arch::x86_64::*;

use super::tail_unroll::sum_squared_remainder_unrolled_8;

/// Horizontal sum of the eight lanes of an AVX register.
///
/// # Safety
///
/// CPU must support AVX2 (enforced by `#[target_feature]` and runtime detection).
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn hsum_avx2(v: __m256) -> f32 {
    let hi = _mm256_extractf128_ps(v, 1);
    let lo = _mm256_castps256_ps128(v);
    let sum128 = _mm_add_ps(lo, hi);
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
}

// =============================================================================
// Squared L2 Distance
// =============================================================================

/// AVX2 squared L2 with a single accumulator.
///
/// Optimized for vectors 8-255 elements where multi-accumulator overhead
/// isn't worth it.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2+FMA (enforced by `#[target_feature]` and runtime detection)
/// - `a.len() == b.len()` (enforced by the validating public API)
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn squared_l2_avx2_1acc(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: offset + 8 <= simd_len * 8 <= len for every load below.
    let len = a.len();
    let simd_len = len / 8;

    let mut sum = _mm256_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        let diff = _mm256_sub_ps(va, vb);
        sum = _mm256_fmadd_ps(diff, diff, sum);
    }

    let mut result = hsum_avx2(sum);

    // Handle remainder (max 7 elements) with unrolled tail
    let base = simd_len * 8;
    let remainder = len - base;
    sum_squared_remainder_unrolled_8!(a, b, base, remainder, result);

    result
}

/// AVX2 squared L2 with 4 accumulators for ILP on large vectors.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2+FMA (enforced by `#[target_feature]` and runtime detection)
/// - `a.len() == b.len()` (enforced by the validating public API)
/// - `a.len() >= 256` for optimal performance (amortizes accumulator combining cost)
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn squared_l2_avx2_4acc(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: offset = i * 32 where i < len / 32, so every 8-wide load is in bounds.
    let len = a.len();
    let simd_len = len / 32; // Process 32 per iteration (4×8)

    let mut sum0 = _mm256_setzero_ps();
    let mut sum1 = _mm256_setzero_ps();
    let mut sum2 = _mm256_setzero_ps();
    let mut sum3 = _mm256_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 32;

        let d0 = _mm256_sub_ps(
            _mm256_loadu_ps(a_ptr.add(offset)),
            _mm256_loadu_ps(b_ptr.add(offset)),
        );
        sum0 = _mm256_fmadd_ps(d0, d0, sum0);

        let d1 = _mm256_sub_ps(
            _mm256_loadu_ps(a_ptr.add(offset + 8)),
            _mm256_loadu_ps(b_ptr.add(offset + 8)),
        );
        sum1 = _mm256_fmadd_ps(d1, d1, sum1);

        let d2 = _mm256_sub_ps(
            _mm256_loadu_ps(a_ptr.add(offset + 16)),
            _mm256_loadu_ps(b_ptr.add(offset + 16)),
        );
        sum2 = _mm256_fmadd_ps(d2, d2, sum2);

        let d3 = _mm256_sub_ps(
            _mm256_loadu_ps(a_ptr.add(offset + 24)),
            _mm256_loadu_ps(b_ptr.add(offset + 24)),
        );
        sum3 = _mm256_fmadd_ps(d3, d3, sum3);
    }

    // Combine 4 accumulators into 1
    let sum01 = _mm256_add_ps(sum0, sum1);
    let sum23 = _mm256_add_ps(sum2, sum3);
    let mut combined = _mm256_add_ps(sum01, sum23);

    // Remaining full 8-wide chunks (0-3 of them)
    let mut base = simd_len * 32;
    while base + 8 <= len {
        let d = _mm256_sub_ps(
            _mm256_loadu_ps(a_ptr.add(base)),
            _mm256_loadu_ps(b_ptr.add(base)),
        );
        combined = _mm256_fmadd_ps(d, d, combined);
        base += 8;
    }

    let mut result = hsum_avx2(combined);
    let remainder = len - base;
    sum_squared_remainder_unrolled_8!(a, b, base, remainder, result);

    result
}
