//! AVX2+FMA fused cosine kernels for x86_64.
//!
//! Each kernel computes the dot product and both squared norms in a single
//! SIMD pass and returns them as [`CosineParts`]; the distance policy is
//! applied by the caller.
//!
//! All functions require runtime AVX2+FMA detection before calling.

#![allow(clippy::incompatible_msrv)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::similar_names)]

use std::arch::x86_64::*;

use super::tail_unroll::sum_cosine_remainder;
use super::x86_avx2::hsum_avx2;
use super::CosineParts;

/// AVX2 fused cosine parts with a single accumulator set.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2+FMA (enforced by `#[target_feature]` and runtime detection)
/// - `a.len() == b.len()`
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn cosine_parts_avx2(a: &[f32], b: &[f32]) -> CosineParts {
    let len = a.len();
    let simd_len = len / 8;

    let mut dot = _mm256_setzero_ps();
    let mut na = _mm256_setzero_ps();
    let mut nb = _mm256_setzero_ps();

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 8;
        let va = _mm256_loadu_ps(a_ptr.add(offset));
        let vb = _mm256_loadu_ps(b_ptr.add(offset));
        dot = _mm256_fmadd_ps(va, vb, dot);
        na = _mm256_fmadd_ps(va, va, na);
        nb = _mm256_fmadd_ps(vb, vb, nb);
    }

    let mut dot_s = hsum_avx2(dot);
    let mut na_s = hsum_avx2(na);
    let mut nb_s = hsum_avx2(nb);

    sum_cosine_remainder!(a, b, simd_len * 8, len, dot_s, na_s, nb_s);

    CosineParts {
        dot: dot_s,
        norm_a_sq: na_s,
        norm_b_sq: nb_s,
    }
}

/// AVX2 fused cosine parts with 2 accumulator sets for medium and large vectors.
///
/// # Safety
///
/// Same requirements as [`cosine_parts_avx2`].
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
pub(crate) unsafe fn cosine_parts_avx2_2acc(a: &[f32], b: &[f32]) -> CosineParts {
    let len = a.len();
    let mut a_ptr = a.as_ptr();
    let mut b_ptr = b.as_ptr();
    let end_main = a.as_ptr().add(len / 16 * 16);

    let mut dot0 = _mm256_setzero_ps();
    let mut dot1 = _mm256_setzero_ps();
    let mut na0 = _mm256_setzero_ps();
    let mut na1 = _mm256_setzero_ps();
    let mut nb0 = _mm256_setzero_ps();
    let mut nb1 = _mm256_setzero_ps();

    while a_ptr < end_main {
        let va0 = _mm256_loadu_ps(a_ptr);
        let vb0 = _mm256_loadu_ps(b_ptr);
        dot0 = _mm256_fmadd_ps(va0, vb0, dot0);
        na0 = _mm256_fmadd_ps(va0, va0, na0);
        nb0 = _mm256_fmadd_ps(vb0, vb0, nb0);

        let va1 = _mm256_loadu_ps(a_ptr.add(8));
        let vb1 = _mm256_loadu_ps(b_ptr.add(8));
        dot1 = _mm256_fmadd_ps(va1, vb1, dot1);
        na1 = _mm256_fmadd_ps(va1, va1, na1);
        nb1 = _mm256_fmadd_ps(vb1, vb1, nb1);

        a_ptr = a_ptr.add(16);
        b_ptr = b_ptr.add(16);
    }

    let mut dot_acc = _mm256_add_ps(dot0, dot1);
    let mut na_acc = _mm256_add_ps(na0, na1);
    let mut nb_acc = _mm256_add_ps(nb0, nb1);

    // At most one more full 8-wide chunk
    let mut base = len / 16 * 16;
    if base + 8 <= len {
        let va = _mm256_loadu_ps(a.as_ptr().add(base));
        let vb = _mm256_loadu_ps(b.as_ptr().add(base));
        dot_acc = _mm256_fmadd_ps(va, vb, dot_acc);
        na_acc = _mm256_fmadd_ps(va, va, na_acc);
        nb_acc = _mm256_fmadd_ps(vb, vb, nb_acc);
        base += 8;
    }

    let mut dot_s = hsum_avx2(dot_acc);
    let mut na_s = hsum_avx2(na_acc);
    let mut nb_s = hsum_avx2(nb_acc);

    sum_cosine_remainder!(a, b, base, len, dot_s, na_s, nb_s);

    CosineParts {
        dot: dot_s,
        norm_a_sq: na_s,
        norm_b_sq: nb_s,
    }
}
