//! ARM NEON kernel implementations for aarch64.
//!
//! Contains NEON SIMD kernels for squared L2 distance and fused cosine parts,
//! with a 4-accumulator variant for large vectors.
//!
//! NEON is always available on aarch64, so no runtime detection is needed.

#![allow(clippy::similar_names)]

use std::arch::aarch64::*;

use super::CosineParts;

// =============================================================================
// Squared L2 Distance
// =============================================================================

/// ARM NEON squared L2 distance.
#[inline]
pub(crate) fn squared_l2_neon(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();

    if len >= 64 {
        return squared_l2_neon_4acc(a, b);
    }

    let simd_len = len / 4;

    // SAFETY: NEON intrinsics are always safe on aarch64.
    let mut sum = unsafe { vdupq_n_f32(0.0) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len, vld1q_f32 handles unaligned loads safely.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            let diff = vsubq_f32(va, vb);
            sum = vfmaq_f32(sum, diff, diff);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let mut result = unsafe { vaddvq_f32(sum) };

    for i in simd_len * 4..len {
        let diff = a[i] - b[i];
        result += diff * diff;
    }

    result
}

/// ARM NEON squared L2 distance with 4 accumulators for large vectors.
#[inline]
fn squared_l2_neon_4acc(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len();
    let main = len / 16 * 16;

    // SAFETY: vdupq_n_f32 is always safe on aarch64.
    let (mut acc0, mut acc1, mut acc2, mut acc3) = unsafe {
        (
            vdupq_n_f32(0.0),
            vdupq_n_f32(0.0),
            vdupq_n_f32(0.0),
            vdupq_n_f32(0.0),
        )
    };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    let mut offset = 0;
    while offset < main {
        // SAFETY: offset + 16 <= main <= len; vld1q_f32 is unaligned-safe.
        unsafe {
            let d0 = vsubq_f32(vld1q_f32(a_ptr.add(offset)), vld1q_f32(b_ptr.add(offset)));
            acc0 = vfmaq_f32(acc0, d0, d0);
            let d1 = vsubq_f32(
                vld1q_f32(a_ptr.add(offset + 4)),
                vld1q_f32(b_ptr.add(offset + 4)),
            );
            acc1 = vfmaq_f32(acc1, d1, d1);
            let d2 = vsubq_f32(
                vld1q_f32(a_ptr.add(offset + 8)),
                vld1q_f32(b_ptr.add(offset + 8)),
            );
            acc2 = vfmaq_f32(acc2, d2, d2);
            let d3 = vsubq_f32(
                vld1q_f32(a_ptr.add(offset + 12)),
                vld1q_f32(b_ptr.add(offset + 12)),
            );
            acc3 = vfmaq_f32(acc3, d3, d3);
        }
        offset += 16;
    }

    // SAFETY: vaddq_f32/vaddvq_f32 always safe on aarch64.
    let mut result = unsafe {
        let sum01 = vaddq_f32(acc0, acc1);
        let sum23 = vaddq_f32(acc2, acc3);
        vaddvq_f32(vaddq_f32(sum01, sum23))
    };

    for i in main..len {
        let diff = a[i] - b[i];
        result += diff * diff;
    }

    result
}

// =============================================================================
// Cosine (Fused)
// =============================================================================

/// ARM NEON fused dot product and squared norms.
#[inline]
pub(crate) fn cosine_parts_neon(a: &[f32], b: &[f32]) -> CosineParts {
    let len = a.len();
    let simd_len = len / 4;

    // SAFETY: vdupq_n_f32 is always safe on aarch64.
    let (mut dot, mut na, mut nb) =
        unsafe { (vdupq_n_f32(0.0), vdupq_n_f32(0.0), vdupq_n_f32(0.0)) };

    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    for i in 0..simd_len {
        let offset = i * 4;
        // SAFETY: offset + 4 <= len, vld1q_f32 handles unaligned loads safely.
        unsafe {
            let va = vld1q_f32(a_ptr.add(offset));
            let vb = vld1q_f32(b_ptr.add(offset));
            dot = vfmaq_f32(dot, va, vb);
            na = vfmaq_f32(na, va, va);
            nb = vfmaq_f32(nb, vb, vb);
        }
    }

    // SAFETY: vaddvq_f32 is always safe on aarch64.
    let (mut dot_s, mut na_s, mut nb_s) =
        unsafe { (vaddvq_f32(dot), vaddvq_f32(na), vaddvq_f32(nb)) };

    for i in simd_len * 4..len {
        let (x, y) = (a[i], b[i]);
        dot_s += x * y;
        na_s += x * x;
        nb_s += y * y;
    }

    CosineParts {
        dot: dot_s,
        norm_a_sq: na_s,
        norm_b_sq: nb_s,
    }
}
