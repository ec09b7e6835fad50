//! Tier-to-kernel wiring and cached dispatch.
//!
//! This module provides:
//! - `SimdLevel` enum for representing the detected SIMD capability
//! - `Backend` for choosing between the detected tier and the scalar path
//! - `squared_l2_kernel()` / `cosine_parts_kernel()` returning function
//!   pointers that are resolved once and cached by `DistanceKernel`
//! - Assertion-based `*_native` convenience functions on the detected tier

use serde::{Deserialize, Serialize};

use super::{finish_cosine, finish_euclidean, finish_squared_l2, scalar, CosineParts};

/// SIMD capability level detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    /// AVX2 + FMA available (x86_64 only).
    Avx2,
    /// NEON available (aarch64, always true).
    Neon,
    /// Scalar fallback.
    Scalar,
}

impl SimdLevel {
    /// Number of `f32` lanes processed per SIMD instruction.
    #[must_use]
    pub const fn lane_width(self) -> usize {
        match self {
            Self::Avx2 => 8,
            Self::Neon => 4,
            Self::Scalar => 1,
        }
    }

    /// Stable lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Avx2 => "avx2+fma",
            Self::Neon => "neon",
            Self::Scalar => "scalar",
        }
    }

    /// True for every tier other than [`SimdLevel::Scalar`].
    #[must_use]
    pub const fn is_accelerated(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

impl std::fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the cached SIMD capability level.
///
/// Detection runs once per process as part of capability resolution.
#[inline]
#[must_use]
pub fn simd_level() -> SimdLevel {
    crate::capabilities::capabilities().tier()
}

/// Which implementation family a kernel should bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Best tier reported by the capability probe.
    #[default]
    Auto,
    /// Portable scalar reference path, regardless of hardware.
    Scalar,
}

impl Backend {
    /// Resolves this backend to a concrete tier supported by the running CPU.
    #[must_use]
    pub fn resolve(self) -> SimdLevel {
        match self {
            Self::Auto => simd_level(),
            Self::Scalar => SimdLevel::Scalar,
        }
    }
}

// =============================================================================
// Function-pointer dispatch
// =============================================================================

pub(crate) type SquaredL2Fn = fn(&[f32], &[f32]) -> f32;
pub(crate) type CosinePartsFn = fn(&[f32], &[f32]) -> CosineParts;

/// Returns the squared L2 kernel for `level`.
///
/// A tier the running CPU does not support degrades to scalar, so the
/// returned pointer is always sound to call.
pub(crate) fn squared_l2_kernel(level: SimdLevel) -> SquaredL2Fn {
    match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if simd_level() == SimdLevel::Avx2 => squared_l2_avx2_entry,
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon => super::squared_l2_neon,
        _ => scalar::squared_l2_scalar,
    }
}

/// Returns the fused cosine kernel for `level`.
pub(crate) fn cosine_parts_kernel(level: SimdLevel) -> CosinePartsFn {
    match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 if simd_level() == SimdLevel::Avx2 => cosine_parts_avx2_entry,
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon => super::cosine_parts_neon,
        _ => scalar::cosine_parts_scalar,
    }
}

#[cfg(target_arch = "x86_64")]
fn squared_l2_avx2_entry(a: &[f32], b: &[f32]) -> f32 {
    // SAFETY: only handed out by `squared_l2_kernel` after AVX2+FMA detection;
    // callers guarantee `a.len() == b.len()`.
    match a.len() {
        n if n >= 256 => unsafe { super::squared_l2_avx2_4acc(a, b) },
        n if n >= 8 => unsafe { super::squared_l2_avx2_1acc(a, b) },
        _ => scalar::squared_l2_scalar(a, b),
    }
}

#[cfg(target_arch = "x86_64")]
fn cosine_parts_avx2_entry(a: &[f32], b: &[f32]) -> CosineParts {
    // SAFETY: only handed out by `cosine_parts_kernel` after AVX2+FMA detection;
    // callers guarantee `a.len() == b.len()`.
    match a.len() {
        n if n >= 64 => unsafe { super::cosine_parts_avx2_2acc(a, b) },
        n if n >= 8 => unsafe { super::cosine_parts_avx2(a, b) },
        _ => scalar::cosine_parts_scalar(a, b),
    }
}

// =============================================================================
// Public API with cached dispatch
// =============================================================================

/// Squared L2 distance with automatic dispatch to the best available SIMD.
#[inline]
#[must_use]
pub fn squared_l2_native(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    finish_squared_l2(squared_l2_kernel(simd_level())(a, b), a, b)
}

/// Euclidean distance with automatic dispatch.
#[inline]
#[must_use]
pub fn euclidean_native(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    finish_euclidean(squared_l2_kernel(simd_level())(a, b), a, b)
}

/// Dot product and squared norms with automatic dispatch.
#[inline]
#[must_use]
pub fn cosine_parts_native(a: &[f32], b: &[f32]) -> CosineParts {
    assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    cosine_parts_kernel(simd_level())(a, b)
}

/// Cosine distance with automatic dispatch; `1.0` when either norm is zero.
#[inline]
#[must_use]
pub fn cosine_distance_native(a: &[f32], b: &[f32]) -> f32 {
    finish_cosine(cosine_parts_native(a, b), a, b)
}

/// Warms up SIMD caches to eliminate cold-start latency.
///
/// Call this at application startup so the first distance computed on the
/// hot path is as fast as subsequent ones.
///
/// # Example
///
/// ```
/// use lightning_core::simd_native::warmup_simd_cache;
/// warmup_simd_cache();
/// ```
#[inline]
pub fn warmup_simd_cache() {
    let _ = simd_level();
    let warmup_size = 768;
    let a: Vec<f32> = vec![0.01; warmup_size];
    let b: Vec<f32> = vec![0.02; warmup_size];
    for _ in 0..3 {
        let _ = squared_l2_native(&a, &b);
        let _ = cosine_parts_native(&a, &b);
    }
}
