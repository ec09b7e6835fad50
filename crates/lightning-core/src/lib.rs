//! # Lightning Core
//!
//! Native SIMD distance engine for dense `f32` vectors.
//!
//! ## Features
//!
//! - **Two metrics**: Euclidean (L2) and cosine distance
//! - **Runtime dispatch**: AVX2+FMA on x86_64, NEON on aarch64, scalar everywhere
//! - **Batch evaluation**: one query against many candidates, rayon-parallel above a threshold
//! - **Zero-copy**: distances straight over caller-owned or memory-mapped memory
//! - **Capability report**: one immutable description of the active acceleration
//!
//! ## Quick Start
//!
//! ```rust
//! use lightning_core::{batch_euclidean, cosine, euclidean};
//!
//! fn main() -> lightning_core::Result<()> {
//!     let d = euclidean(&[0.0, 0.0], &[3.0, 4.0])?;
//!     assert!((d - 5.0).abs() < 1e-5);
//!
//!     let c = cosine(&[1.0, 0.0], &[0.0, 1.0])?;
//!     assert!((c - 1.0).abs() < 1e-5);
//!
//!     let all = batch_euclidean(&[0.0, 0.0], &[vec![3.0, 4.0], vec![0.0, 1.0]])?;
//!     assert_eq!(all.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! The free functions route through [`Engine::global`], which is configured
//! from `LIGHTNING_*` environment variables on first use. Build an [`Engine`]
//! from an [`EngineConfig`] to control kernels and batching explicitly.

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(
        clippy::float_cmp,
        clippy::cast_precision_loss,
        clippy::doc_markdown,
        clippy::uninlined_format_args
    )
)]

pub mod batch;
#[cfg(test)]
mod batch_tests;
pub mod capabilities;
#[cfg(test)]
mod capabilities_tests;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod distance;
#[cfg(test)]
mod distance_tests;
pub mod engine;
pub mod error;
pub mod simd_native;
pub mod vector;
pub mod zero_copy;

pub use batch::BatchEvaluator;
pub use capabilities::{capabilities, capabilities_resolved, Capabilities};
pub use config::{BatchConfig, ConfigError, EngineConfig, KernelConfig, LoggingConfig};
pub use distance::{DistanceKernel, DistanceMetric};
pub use engine::Engine;
pub use error::{Error, Result};
pub use simd_native::{Backend, CosineParts, SimdLevel};
pub use vector::VectorBuffer;
pub use zero_copy::ExternalRegion;

/// True if the default engine runs a non-scalar kernel.
///
/// This follows [`Engine::global`], so it is `false` when
/// `LIGHTNING_KERNEL__FORCE_SCALAR` pinned the scalar path even on SIMD-capable
/// hardware. Use [`Capabilities::is_accelerated`] for what the CPU supports.
#[must_use]
pub fn is_accelerated() -> bool {
    Engine::global().kernel().is_accelerated()
}

/// Euclidean distance between `a` and `b` on the default engine.
///
/// # Errors
///
/// `EmptyVector` if either operand is empty, `DimensionMismatch` if their
/// lengths differ.
pub fn euclidean(a: &[f32], b: &[f32]) -> Result<f32> {
    Engine::global().euclidean(a, b)
}

/// Cosine distance `1 - cos(a, b)` on the default engine.
///
/// Returns exactly `1.0` when either operand has zero norm.
///
/// # Errors
///
/// Same as [`euclidean`].
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f32> {
    Engine::global().cosine(a, b)
}

/// Euclidean distance from `query` to each candidate, in input order.
///
/// # Errors
///
/// `EmptyVector` for an empty query; `DimensionMismatch` naming the first
/// candidate whose length differs. No partial results are returned.
pub fn batch_euclidean<V>(query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
where
    V: AsRef<[f32]> + Sync,
{
    Engine::global().batch_euclidean(query, candidates)
}

/// Cosine distance from `query` to each candidate, in input order.
///
/// # Errors
///
/// Same as [`batch_euclidean`].
pub fn batch_cosine<V>(query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
where
    V: AsRef<[f32]> + Sync,
{
    Engine::global().batch_cosine(query, candidates)
}

/// Euclidean distance computed directly over external memory.
///
/// # Errors
///
/// Same as [`euclidean`].
pub fn euclidean_direct(region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
    Engine::global().euclidean_direct(region, b)
}

/// Cosine distance computed directly over external memory.
///
/// # Errors
///
/// Same as [`euclidean`].
pub fn cosine_direct(region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
    Engine::global().cosine_direct(region, b)
}

/// Resolves capabilities, builds the default engine and runs each kernel once.
pub fn warmup() {
    let engine = Engine::global();
    simd_native::warmup_simd_cache();
    let probe = [0.5_f32; 64];
    let _ = engine.euclidean(&probe, &probe);
    let _ = engine.cosine(&probe, &probe);
}
