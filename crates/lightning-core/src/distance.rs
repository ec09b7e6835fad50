//! Validating distance kernels.
//!
//! [`DistanceKernel`] resolves its backend once at construction and caches
//! the chosen function pointers, so there is no per-call branching on
//! hardware capability. Scalar and accelerated kernels agree to within
//! floating-point noise (relative error ≤ 1e-5).
//!
//! Kernels accumulate in `f32`. A sum that overflows or falls out of the
//! normal range is recomputed in `f64` on the scalar path, so extreme but
//! finite inputs still honour `cosine(a, a) == 0` and finite distances.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::simd_native::{
    cosine_parts_kernel, finish_cosine, finish_euclidean, finish_squared_l2, squared_l2_kernel,
    Backend, CosinePartsFn, SimdLevel, SquaredL2Fn,
};
use crate::vector::check_pair;

/// Distance metric served by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// L2 distance `sqrt(Σ (a[i]-b[i])²)`.
    #[default]
    Euclidean,
    /// `1 - cos(a, b)`, `1.0` when either vector has zero norm.
    Cosine,
}

impl DistanceMetric {
    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "cosine" | "cos" => Ok(Self::Cosine),
            other => Err(format!(
                "unknown metric '{other}', expected 'euclidean' or 'cosine'"
            )),
        }
    }
}

/// Distance kernels bound to one acceleration tier.
///
/// Cheap to copy and safe to share across threads.
#[derive(Clone, Copy)]
pub struct DistanceKernel {
    level: SimdLevel,
    squared_l2: SquaredL2Fn,
    cosine_parts: CosinePartsFn,
}

impl std::fmt::Debug for DistanceKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceKernel")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Default for DistanceKernel {
    fn default() -> Self {
        Self::new(Backend::Auto)
    }
}

impl DistanceKernel {
    /// Resolves `backend` to a tier and binds the matching kernels.
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        let level = backend.resolve();
        tracing::debug!(?backend, %level, "Resolved distance kernel");
        Self {
            level,
            squared_l2: squared_l2_kernel(level),
            cosine_parts: cosine_parts_kernel(level),
        }
    }

    /// Portable scalar reference kernel.
    #[must_use]
    pub fn scalar() -> Self {
        Self::new(Backend::Scalar)
    }

    /// Tier this kernel is bound to.
    #[must_use]
    pub fn level(&self) -> SimdLevel {
        self.level
    }

    /// Whether this kernel uses a SIMD tier.
    #[must_use]
    pub fn is_accelerated(&self) -> bool {
        self.level.is_accelerated()
    }

    /// Euclidean distance. Fails on empty or unequal-length operands.
    #[inline]
    pub fn euclidean(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        check_pair(a, b)?;
        Ok(finish_euclidean((self.squared_l2)(a, b), a, b))
    }

    /// Squared Euclidean distance (no square root).
    #[inline]
    pub fn squared_euclidean(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        check_pair(a, b)?;
        Ok(finish_squared_l2((self.squared_l2)(a, b), a, b))
    }

    /// Cosine distance; exactly `1.0` when either operand has zero norm.
    #[inline]
    pub fn cosine(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        check_pair(a, b)?;
        Ok(finish_cosine((self.cosine_parts)(a, b), a, b))
    }

    /// Distance under `metric`.
    #[inline]
    pub fn distance(&self, metric: DistanceMetric, a: &[f32], b: &[f32]) -> Result<f32> {
        match metric {
            DistanceMetric::Euclidean => self.euclidean(a, b),
            DistanceMetric::Cosine => self.cosine(a, b),
        }
    }

    /// Euclidean distance with both operands checked against a declared `dim`.
    pub fn euclidean_with_dim(&self, a: &[f32], b: &[f32], dim: usize) -> Result<f32> {
        check_declared(a, b, dim)?;
        self.euclidean(a, b)
    }

    /// Cosine distance with both operands checked against a declared `dim`.
    pub fn cosine_with_dim(&self, a: &[f32], b: &[f32], dim: usize) -> Result<f32> {
        check_declared(a, b, dim)?;
        self.cosine(a, b)
    }

    /// Unchecked distance for callers that validated dimensions up front.
    #[inline]
    pub(crate) fn distance_unchecked(&self, metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        match metric {
            DistanceMetric::Euclidean => finish_euclidean((self.squared_l2)(a, b), a, b),
            DistanceMetric::Cosine => finish_cosine((self.cosine_parts)(a, b), a, b),
        }
    }
}

fn check_declared(a: &[f32], b: &[f32], dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(Error::EmptyVector);
    }
    for operand in [a, b] {
        if operand.len() != dim {
            return Err(Error::dimension(dim, operand.len()));
        }
    }
    Ok(())
}
