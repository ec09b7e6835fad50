//! Error types for the distance engine.

use thiserror::Error;

/// Distance engine error types.
///
/// Every variant is a usage error the caller can fix by correcting its
/// inputs. Kernels are deterministic, so retrying an identical call is
/// never useful.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand lengths disagree with each other or with the declared dimension.
    ///
    /// `candidate` names the offending index when raised by a batch call.
    #[error("Dimension mismatch: expected {expected}, got {actual}{}", at_candidate(.candidate))]
    DimensionMismatch {
        /// Dimension required by the operation.
        expected: usize,
        /// Dimension actually supplied.
        actual: usize,
        /// Batch index of the malformed candidate, if any.
        candidate: Option<usize>,
    },

    /// Zero-length operand.
    #[error("Empty vector: distance requires dimension > 0")]
    EmptyVector,

    /// An externally supplied memory region is obviously invalid.
    #[error("Invalid external region: {0}")]
    InvalidExternalRegion(String),

    /// A caller-provided result buffer has the wrong length.
    #[error("Output length mismatch: {expected} candidates, buffer holds {actual}")]
    OutputLengthMismatch {
        /// Number of candidates in the batch.
        expected: usize,
        /// Length of the supplied output buffer.
        actual: usize,
    },
}

fn at_candidate(candidate: &Option<usize>) -> String {
    match candidate {
        Some(index) => format!(" at candidate {index}"),
        None => String::new(),
    }
}

impl Error {
    /// Pairwise dimension mismatch (no batch index).
    #[must_use]
    pub fn dimension(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected,
            actual,
            candidate: None,
        }
    }

    /// Dimension mismatch of batch candidate `index`.
    #[must_use]
    pub fn candidate_dimension(index: usize, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected,
            actual,
            candidate: Some(index),
        }
    }

    /// Short machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::EmptyVector => "EMPTY_VECTOR",
            Self::InvalidExternalRegion(_) => "INVALID_EXTERNAL_REGION",
            Self::OutputLengthMismatch { .. } => "OUTPUT_LENGTH_MISMATCH",
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
