//! Tests for `batch` module.

use super::batch::BatchEvaluator;
use super::config::BatchConfig;
use super::distance::{DistanceKernel, DistanceMetric};
use super::error::Error;
use super::vector::VectorBuffer;

fn candidates(n: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            (0..dim)
                .map(|j| ((i * 31 + j * 7) % 97) as f32 * 0.01 - 0.4)
                .collect()
        })
        .collect()
}

#[test]
fn test_batch_euclidean_spec_example() {
    let evaluator = BatchEvaluator::default();
    let result = evaluator
        .batch_euclidean(&[0.0, 0.0], &[vec![3.0, 4.0], vec![0.0, 1.0]])
        .unwrap();
    assert_eq!(result.len(), 2);
    assert!((result[0] - 5.0).abs() < 1e-6);
    assert!((result[1] - 1.0).abs() < 1e-6);
}

#[test]
fn test_batch_matches_pairwise_in_order() {
    let kernel = DistanceKernel::default();
    let evaluator = BatchEvaluator::new(kernel);
    let query: Vec<f32> = (0..48).map(|i| (i as f32 * 0.2).sin()).collect();
    let cands = candidates(37, 48);

    let euclid = evaluator.batch_euclidean(&query, &cands).unwrap();
    let cos = evaluator.batch_cosine(&query, &cands).unwrap();
    for (i, c) in cands.iter().enumerate() {
        assert_eq!(euclid[i], kernel.euclidean(&query, c).unwrap());
        assert_eq!(cos[i], kernel.cosine(&query, c).unwrap());
    }
}

#[test]
fn test_batch_empty_candidates() {
    let evaluator = BatchEvaluator::default();
    let none: Vec<Vec<f32>> = Vec::new();
    assert!(evaluator.batch_euclidean(&[1.0, 2.0], &none).unwrap().is_empty());
    assert!(evaluator.batch_cosine(&[1.0, 2.0], &none).unwrap().is_empty());
}

#[test]
fn test_batch_fails_fast_on_first_bad_candidate() {
    let evaluator = BatchEvaluator::default();
    let cands = vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0], vec![1.0]];
    let err = evaluator.batch_euclidean(&[0.0, 0.0], &cands).unwrap_err();
    assert_eq!(err, Error::candidate_dimension(1, 2, 3));
}

#[test]
fn test_batch_empty_query() {
    let evaluator = BatchEvaluator::default();
    let cands = vec![vec![1.0_f32]];
    assert_eq!(
        evaluator.batch_cosine(&[], &cands),
        Err(Error::EmptyVector)
    );
}

#[test]
fn test_batch_accepts_borrowed_slices() {
    let a = [3.0_f32, 4.0];
    let b = [6.0_f32, 8.0];
    let cands: [&[f32]; 2] = [&a, &b];
    let result = BatchEvaluator::default()
        .batch_euclidean(&[0.0, 0.0], &cands)
        .unwrap();
    assert!((result[0] - 5.0).abs() < 1e-6);
    assert!((result[1] - 10.0).abs() < 1e-6);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let kernel = DistanceKernel::default();
    let parallel = BatchEvaluator::new(kernel).with_parallel_threshold(1);
    let sequential = BatchEvaluator::new(kernel).sequential();
    let query: Vec<f32> = (0..128).map(|i| i as f32 * 0.01).collect();
    let cands = candidates(1000, 128);

    for metric in [DistanceMetric::Euclidean, DistanceMetric::Cosine] {
        let p = parallel.batch(metric, &query, &cands).unwrap();
        let s = sequential.batch(metric, &query, &cands).unwrap();
        assert_eq!(p, s, "{metric} results differ between paths");
    }
}

#[test]
fn test_runs_parallel_threshold() {
    let evaluator = BatchEvaluator::default().with_parallel_threshold(10);
    assert!(!evaluator.runs_parallel(9));
    assert_eq!(evaluator.runs_parallel(10), cfg!(feature = "parallel"));
    assert!(!evaluator.sequential().runs_parallel(10_000));
}

#[test]
fn test_from_config_clamps_zero_threshold() {
    let config = BatchConfig {
        parallel: true,
        parallel_threshold: 0,
        prefetch: false,
    };
    let evaluator = BatchEvaluator::from_config(DistanceKernel::scalar(), &config);
    assert_eq!(evaluator.runs_parallel(1), cfg!(feature = "parallel"));
    assert!(!evaluator.runs_parallel(0));
}

#[test]
fn test_batch_into_writes_caller_buffer() {
    let evaluator = BatchEvaluator::default();
    let cands = vec![vec![3.0, 4.0], vec![0.0, 1.0]];
    let mut out = [0.0_f32; 2];
    evaluator
        .batch_euclidean_into(&[0.0, 0.0], &cands, &mut out)
        .unwrap();
    assert!((out[0] - 5.0).abs() < 1e-6);
    assert!((out[1] - 1.0).abs() < 1e-6);

    evaluator
        .batch_cosine_into(&[1.0, 0.0], &cands, &mut out)
        .unwrap();
    assert!((out[1] - 1.0).abs() < 1e-6);
}

#[test]
fn test_batch_into_rejects_wrong_output_length() {
    let evaluator = BatchEvaluator::default();
    let cands = vec![vec![3.0, 4.0], vec![0.0, 1.0]];
    let mut out = [7.0_f32; 3];
    let err = evaluator
        .batch_euclidean_into(&[0.0, 0.0], &cands, &mut out)
        .unwrap_err();
    assert_eq!(
        err,
        Error::OutputLengthMismatch {
            expected: 2,
            actual: 3
        }
    );
    assert_eq!(out, [7.0; 3]);
}

#[test]
fn test_batch_into_leaves_buffer_on_validation_error() {
    let evaluator = BatchEvaluator::default();
    let cands = vec![vec![3.0, 4.0], vec![0.0]];
    let mut out = [7.0_f32; 2];
    assert!(evaluator
        .batch_cosine_into(&[0.0, 0.0], &cands, &mut out)
        .is_err());
    assert_eq!(out, [7.0; 2]);
}

#[test]
fn test_prefetch_disabled_gives_same_results() {
    let kernel = DistanceKernel::default();
    let with = BatchEvaluator::from_config(
        kernel,
        &BatchConfig {
            parallel: false,
            parallel_threshold: 1,
            prefetch: true,
        },
    );
    let without = BatchEvaluator::from_config(
        kernel,
        &BatchConfig {
            parallel: false,
            parallel_threshold: 1,
            prefetch: false,
        },
    );
    let query = vec![0.5_f32; 64];
    let cands = candidates(50, 64);
    assert_eq!(
        with.batch_euclidean(&query, &cands).unwrap(),
        without.batch_euclidean(&query, &cands).unwrap()
    );
}

#[test]
fn test_batch_accepts_vector_buffers() {
    let storage = candidates(6, 24);
    let query = VectorBuffer::owned(storage[0].clone()).unwrap();

    // Mix borrowed rows with owned copies; both are plain operands to the batch.
    let operands: Vec<VectorBuffer<'_>> = storage
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let borrowed = VectorBuffer::with_dim(row, query.dim()).unwrap();
            if i % 2 == 0 {
                borrowed
            } else {
                borrowed.into_owned()
            }
        })
        .collect();
    assert!(operands.iter().any(VectorBuffer::is_owned));
    assert!(operands.iter().any(|v| !v.is_owned()));

    let kernel = DistanceKernel::default();
    let evaluator = BatchEvaluator::new(kernel).with_parallel_threshold(2);
    for metric in [DistanceMetric::Euclidean, DistanceMetric::Cosine] {
        let from_buffers = evaluator.batch(metric, &query, &operands).unwrap();
        let from_rows = evaluator.batch(metric, &query, &storage).unwrap();
        assert_eq!(from_buffers, from_rows);
        for (d, operand) in from_buffers.iter().zip(&operands) {
            assert_eq!(*d, kernel.distance(metric, &query, operand).unwrap());
        }
    }
    assert_eq!(evaluator.batch_euclidean(&query, &operands).unwrap()[0], 0.0);
}
