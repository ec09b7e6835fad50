//! Zero-copy distance over externally owned memory.
//!
//! [`ExternalRegion`] is a borrowed view of `f32` data that lives outside the
//! engine: a caller buffer, a memory-mapped file, or a raw pointer handed over
//! an FFI boundary. Distances are computed directly over that memory through
//! the same resolved kernel as the copying path, so results are bitwise
//! identical for identical contents.
//!
//! # Safety model
//!
//! The only `unsafe` surface is [`ExternalRegion::from_raw_parts`]. The engine
//! checks what it can (null, zero length, alignment, size overflow); it cannot
//! check that the memory is live, readable, and not mutated while the region
//! exists. Violating that contract is undefined behavior.

use crate::distance::DistanceKernel;
use crate::error::{Error, Result};

/// Borrowed, non-empty view of externally owned `f32` memory.
#[derive(Debug, Clone, Copy)]
pub struct ExternalRegion<'a> {
    data: &'a [f32],
}

impl<'a> ExternalRegion<'a> {
    /// Wraps a raw `(ptr, len)` pair without copying.
    ///
    /// # Errors
    ///
    /// `InvalidExternalRegion` if `ptr` is null or misaligned for `f32`,
    /// `len` is zero, or `len * 4` exceeds `isize::MAX`.
    ///
    /// # Safety
    ///
    /// For the whole lifetime `'a`, the caller must guarantee that:
    /// - `ptr` points to `len` consecutive, initialized `f32` values inside a
    ///   single allocation
    /// - the memory stays readable and is not freed or unmapped
    /// - nothing writes to the memory
    ///
    /// The lifetime `'a` is chosen by the caller and is not tied to any Rust
    /// borrow; keep the region strictly scoped to the call that uses it.
    pub unsafe fn from_raw_parts(ptr: *const f32, len: usize) -> Result<Self> {
        if ptr.is_null() {
            return Err(Error::InvalidExternalRegion("null pointer".to_string()));
        }
        if len == 0 {
            return Err(Error::InvalidExternalRegion("zero length".to_string()));
        }
        if !ptr.is_aligned() {
            return Err(Error::InvalidExternalRegion(format!(
                "address {ptr:p} is not aligned to {} bytes",
                std::mem::align_of::<f32>()
            )));
        }
        let too_large = len
            .checked_mul(std::mem::size_of::<f32>())
            .map_or(true, |bytes| isize::try_from(bytes).is_err());
        if too_large {
            return Err(Error::InvalidExternalRegion(format!(
                "length {len} exceeds the addressable range"
            )));
        }
        // SAFETY: `from_raw_parts` requires a valid pointer/len pair.
        // - Condition 1: non-null, aligned and size-bounded, checked above.
        // - Condition 2: validity, initialization and immutability for 'a are the
        //   caller's obligation per this function's contract.
        Ok(Self {
            data: std::slice::from_raw_parts(ptr, len),
        })
    }

    /// Wraps a borrowed slice.
    pub fn from_slice(data: &'a [f32]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InvalidExternalRegion("zero length".to_string()));
        }
        Ok(Self { data })
    }

    /// Reinterprets a byte region (for example a memory-mapped file) as `f32`
    /// values in native byte order, without copying.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidExternalRegion("zero length".to_string()));
        }
        let data: &[f32] = bytemuck::try_cast_slice(bytes).map_err(|err| {
            Error::InvalidExternalRegion(format!(
                "{} bytes at {:p} cannot be viewed as f32: {err:?}",
                bytes.len(),
                bytes.as_ptr()
            ))
        })?;
        Ok(Self { data })
    }

    /// Number of `f32` values in the region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; construction rejects empty regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Start address of the region.
    #[must_use]
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    /// The region as a slice, borrowing the external memory.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Splits a row-major matrix of `dim`-wide vectors into rows.
    ///
    /// Only row slices are allocated; vector data is never copied.
    pub fn rows(&self, dim: usize) -> Result<Vec<&'a [f32]>> {
        if dim == 0 {
            return Err(Error::EmptyVector);
        }
        if self.data.len() % dim != 0 {
            // Report the length of the trailing partial row.
            return Err(Error::dimension(dim, self.data.len() % dim));
        }
        Ok(self.data.chunks_exact(dim).collect())
    }
}

impl AsRef<[f32]> for ExternalRegion<'_> {
    #[inline]
    fn as_ref(&self) -> &[f32] {
        self.data
    }
}

impl DistanceKernel {
    /// Euclidean distance between external memory and `b`.
    pub fn euclidean_direct(&self, region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
        self.euclidean(region.data, b)
    }

    /// Cosine distance between external memory and `b`.
    pub fn cosine_direct(&self, region: &ExternalRegion<'_>, b: &[f32]) -> Result<f32> {
        self.cosine(region.data, b)
    }
}
