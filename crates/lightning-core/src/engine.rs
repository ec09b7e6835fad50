//! Configured distance engine and the process-wide default instance.

use std::sync::OnceLock;

use crate::batch::BatchEvaluator;
use crate::config::{ConfigError, EngineConfig};
use crate::distance::{DistanceKernel, DistanceMetric};
use crate::error::Result;
use crate::simd_native::{Backend, SimdLevel};
use crate::zero_copy::ExternalRegion;

/// Default engine backing the crate-level free functions.
static GLOBAL_ENGINE: OnceLock<Engine> = OnceLock::new();

/// A resolved [`DistanceKernel`] plus batch settings.
///
/// `Copy`, `Send` and `Sync`; build one per configuration and share it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    kernel: DistanceKernel,
    batch: BatchEvaluator,
}

impl Engine {
    /// Engine with default configuration on the detected tier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine bound to `backend` with default batch settings.
    #[must_use]
    pub fn with_backend(backend: Backend) -> Self {
        let kernel = DistanceKernel::new(backend);
        Self {
            kernel,
            batch: BatchEvaluator::new(kernel),
        }
    }

    /// Engine built from a validated configuration.
    pub fn from_config(config: &EngineConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let kernel = DistanceKernel::new(config.kernel.backend());
        let batch = BatchEvaluator::from_config(kernel, &config.batch);
        tracing::debug!(
            level = %kernel.level(),
            parallel = config.batch.parallel,
            parallel_threshold = config.batch.parallel_threshold,
            "Distance engine configured"
        );
        Ok(Self { kernel, batch })
    }

    /// Returns the process-wide default engine, building it on first use
    /// from `LIGHTNING_*` environment configuration.
    pub fn global() -> &'static Engine {
        GLOBAL_ENGINE.get_or_init(|| {
            match EngineConfig::load().and_then(|config| Engine::from_config(&config)) {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::warn!(error = %err, "Ignoring invalid engine configuration, using defaults");
                    Engine::default()
                }
            }
        })
    }

    /// Installs `self` as the process-wide default.
    ///
    /// Fails, handing the engine back, if the default was already built.
    pub fn install_global(self) -> std::result::Result<&'static Engine, Engine> {
        GLOBAL_ENGINE.set(self)?;
        Ok(Self::global())
    }

    /// Kernel used for pairwise calls.
    #[must_use]
    pub fn kernel(&self) -> &DistanceKernel {
        &self.kernel
    }

    /// Batch evaluator.
    #[must_use]
    pub fn batch(&self) -> &BatchEvaluator {
        &self.batch
    }

    /// Tier the kernels are bound to.
    #[must_use]
    pub fn level(&self) -> SimdLevel {
        self.kernel.level()
    }

    /// See [`DistanceKernel::euclidean`].
    pub fn euclidean(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        self.kernel.euclidean(a, b)
    }

    /// See [`DistanceKernel::cosine`].
    pub fn cosine(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        self.kernel.cosine(a, b)
    }

    /// See [`DistanceKernel::distance`].
    pub fn distance(&self, metric: DistanceMetric, a: &[f32], b: &[f32]) -> Result<f32> {
        self.kernel.distance(metric, a, b)
    }

    /// See [`BatchEvaluator::batch_euclidean`].
    pub fn batch_euclidean<V>(&self, query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch.batch_euclidean(query, candidates)
    }

    /// See [`BatchEvaluator::batch_cosine`].
    pub fn batch_cosine<V>(&self, query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch.batch_cosine(query, candidates)
    }

    /// See [`DistanceKernel::euclidean_direct`].
    pub fn euclidean_direct(&self, region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
        self.kernel.euclidean_direct(region, b)
    }

    /// See [`DistanceKernel::cosine_direct`].
    pub fn cosine_direct(&self, region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
        self.kernel.cosine_direct(region, b)
    }

    /// Scans a row-major region of `query.len()`-wide vectors in place.
    pub fn batch_direct(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        region: &ExternalRegion<'_>,
    ) -> Result<Vec<f32>> {
        if query.is_empty() {
            return Err(crate::Error::EmptyVector);
        }
        let rows = region.rows(query.len())?;
        self.batch.batch(metric, query, &rows)
    }
}
