//! Fixed-dimension vector operands.
//!
//! [`VectorBuffer`] wraps a contiguous `f32` buffer that is either owned or
//! borrowed. Construction rejects empty buffers, so every `VectorBuffer` has
//! `dim() > 0`.

use std::borrow::Cow;
use std::ops::Deref;

use crate::error::{Error, Result};

/// Contiguous, non-empty `f32` vector, owned or borrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBuffer<'a> {
    data: Cow<'a, [f32]>,
}

impl<'a> VectorBuffer<'a> {
    /// Takes ownership of `data`.
    pub fn owned(data: Vec<f32>) -> Result<VectorBuffer<'static>> {
        if data.is_empty() {
            return Err(Error::EmptyVector);
        }
        Ok(VectorBuffer {
            data: Cow::Owned(data),
        })
    }

    /// Borrows `data` without copying.
    pub fn borrowed(data: &'a [f32]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::EmptyVector);
        }
        Ok(Self {
            data: Cow::Borrowed(data),
        })
    }

    /// Borrows `data` and checks it against a declared dimension.
    pub fn with_dim(data: &'a [f32], dim: usize) -> Result<Self> {
        let buffer = Self::borrowed(data)?;
        buffer.check_dim(dim)?;
        Ok(buffer)
    }

    /// Number of components.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer owns its storage.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self.data, Cow::Owned(_))
    }

    /// Components as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Fails with `DimensionMismatch` unless `dim() == expected`.
    pub fn check_dim(&self, expected: usize) -> Result<()> {
        if self.dim() == expected {
            Ok(())
        } else {
            Err(Error::dimension(expected, self.dim()))
        }
    }

    /// Converts into an owned buffer, copying only if currently borrowed.
    #[must_use]
    pub fn into_owned(self) -> VectorBuffer<'static> {
        VectorBuffer {
            data: Cow::Owned(self.data.into_owned()),
        }
    }

    /// Consumes the buffer and returns its components.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data.into_owned()
    }
}

impl Deref for VectorBuffer<'_> {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[f32]> for VectorBuffer<'_> {
    #[inline]
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}

impl TryFrom<Vec<f32>> for VectorBuffer<'static> {
    type Error = Error;

    fn try_from(data: Vec<f32>) -> Result<Self> {
        VectorBuffer::owned(data)
    }
}

impl<'a> TryFrom<&'a [f32]> for VectorBuffer<'a> {
    type Error = Error;

    fn try_from(data: &'a [f32]) -> Result<Self> {
        VectorBuffer::borrowed(data)
    }
}

/// Checks that two operands share a positive dimension.
///
/// The empty check comes first so `([], [1.0])` reports `EmptyVector`.
#[inline]
pub(crate) fn check_pair(a: &[f32], b: &[f32]) -> Result<usize> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::EmptyVector);
    }
    if a.len() != b.len() {
        return Err(Error::dimension(a.len(), b.len()));
    }
    Ok(a.len())
}
