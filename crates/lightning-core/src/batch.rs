//! Query-to-many distance evaluation.
//!
//! All candidates are validated before any distance is computed, so a
//! malformed candidate fails the whole batch without partial output. Large
//! batches are split across the rayon pool; each worker writes only its own
//! output slot, which keeps results index-aligned with the input.

use crate::config::BatchConfig;
use crate::distance::{DistanceKernel, DistanceMetric};
use crate::error::{Error, Result};
use crate::simd_native::{calculate_prefetch_distance, prefetch_vector};

/// Evaluates one query against an ordered candidate set.
#[derive(Debug, Clone, Copy)]
pub struct BatchEvaluator {
    kernel: DistanceKernel,
    parallel: bool,
    parallel_threshold: usize,
    prefetch: bool,
}

impl Default for BatchEvaluator {
    fn default() -> Self {
        Self::new(DistanceKernel::default())
    }
}

impl BatchEvaluator {
    /// Evaluator over `kernel` with default batch settings.
    #[must_use]
    pub fn new(kernel: DistanceKernel) -> Self {
        Self::from_config(kernel, &BatchConfig::default())
    }

    /// Evaluator over `kernel` with settings from `config`.
    #[must_use]
    pub fn from_config(kernel: DistanceKernel, config: &BatchConfig) -> Self {
        Self {
            kernel,
            parallel: config.parallel,
            parallel_threshold: config.parallel_threshold.max(1),
            prefetch: config.prefetch,
        }
    }

    /// Minimum candidate count before work is split across threads.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Disables parallel evaluation.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Kernel used for each candidate.
    #[must_use]
    pub fn kernel(&self) -> &DistanceKernel {
        &self.kernel
    }

    /// Whether a batch of `n` candidates would run in parallel.
    #[must_use]
    pub fn runs_parallel(&self, n: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && n >= self.parallel_threshold
    }

    /// `results[i] = euclidean(query, candidates[i])`.
    pub fn batch_euclidean<V>(&self, query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch(DistanceMetric::Euclidean, query, candidates)
    }

    /// `results[i] = cosine(query, candidates[i])`.
    pub fn batch_cosine<V>(&self, query: &[f32], candidates: &[V]) -> Result<Vec<f32>>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch(DistanceMetric::Cosine, query, candidates)
    }

    /// Distances under `metric`, one per candidate, in input order.
    pub fn batch<V>(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        candidates: &[V],
    ) -> Result<Vec<f32>>
    where
        V: AsRef<[f32]> + Sync,
    {
        validate(query, candidates)?;
        let mut results = vec![0.0_f32; candidates.len()];
        self.fill(metric, query, candidates, &mut results);
        Ok(results)
    }

    /// Euclidean distances written into a caller-provided buffer.
    pub fn batch_euclidean_into<V>(
        &self,
        query: &[f32],
        candidates: &[V],
        results: &mut [f32],
    ) -> Result<()>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch_into(DistanceMetric::Euclidean, query, candidates, results)
    }

    /// Cosine distances written into a caller-provided buffer.
    pub fn batch_cosine_into<V>(
        &self,
        query: &[f32],
        candidates: &[V],
        results: &mut [f32],
    ) -> Result<()>
    where
        V: AsRef<[f32]> + Sync,
    {
        self.batch_into(DistanceMetric::Cosine, query, candidates, results)
    }

    /// Distances under `metric` written into `results`.
    ///
    /// `results` must hold exactly one slot per candidate. On error the
    /// buffer is left untouched.
    pub fn batch_into<V>(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        candidates: &[V],
        results: &mut [f32],
    ) -> Result<()>
    where
        V: AsRef<[f32]> + Sync,
    {
        if results.len() != candidates.len() {
            return Err(Error::OutputLengthMismatch {
                expected: candidates.len(),
                actual: results.len(),
            });
        }
        validate(query, candidates)?;
        self.fill(metric, query, candidates, results);
        Ok(())
    }

    fn fill<V>(&self, metric: DistanceMetric, query: &[f32], candidates: &[V], out: &mut [f32])
    where
        V: AsRef<[f32]> + Sync,
    {
        let parallel = self.runs_parallel(candidates.len());
        tracing::trace!(
            %metric,
            candidates = candidates.len(),
            dim = query.len(),
            parallel,
            "Evaluating batch"
        );
        if parallel {
            self.fill_parallel(metric, query, candidates, out);
        } else {
            self.fill_sequential(metric, query, candidates, out);
        }
    }

    fn fill_sequential<V>(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        candidates: &[V],
        out: &mut [f32],
    ) where
        V: AsRef<[f32]>,
    {
        let ahead = calculate_prefetch_distance(query.len());
        for (i, (slot, candidate)) in out.iter_mut().zip(candidates).enumerate() {
            if self.prefetch {
                if let Some(next) = candidates.get(i + ahead) {
                    prefetch_vector(next.as_ref());
                }
            }
            *slot = self
                .kernel
                .distance_unchecked(metric, query, candidate.as_ref());
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_parallel<V>(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        candidates: &[V],
        out: &mut [f32],
    ) where
        V: AsRef<[f32]> + Sync,
    {
        use rayon::prelude::*;

        let kernel = self.kernel;
        out.par_iter_mut()
            .zip(candidates.par_iter())
            .for_each(|(slot, candidate)| {
                *slot = kernel.distance_unchecked(metric, query, candidate.as_ref());
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_parallel<V>(
        &self,
        metric: DistanceMetric,
        query: &[f32],
        candidates: &[V],
        out: &mut [f32],
    ) where
        V: AsRef<[f32]> + Sync,
    {
        self.fill_sequential(metric, query, candidates, out);
    }
}

/// Fails fast on the first candidate whose dimension differs from the query.
fn validate<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> Result<()> {
    if query.is_empty() {
        return Err(Error::EmptyVector);
    }
    let dim = query.len();
    for (index, candidate) in candidates.iter().enumerate() {
        let actual = candidate.as_ref().len();
        if actual != dim {
            return Err(Error::candidate_dimension(index, dim, actual));
        }
    }
    Ok(())
}
