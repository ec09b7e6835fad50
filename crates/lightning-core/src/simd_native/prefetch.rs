//! CPU cache prefetch utilities for batch evaluation.
//!
//! Provides software prefetching hints to warm up CPU caches before
//! the next candidate is scanned, reducing memory latency in batch loops.

/// L2 cache line size in bytes (standard for modern x86_64 and ARM64 CPUs).
pub const L2_CACHE_LINE_BYTES: usize = 64;

/// Calculates how many candidates ahead to prefetch for a given dimension.
///
/// `distance = (vector_bytes / L2_CACHE_LINE).clamp(4, 16)`
/// - Minimum 4: enough lookahead for out-of-order execution
/// - Maximum 16: prevents cache pollution from over-prefetching
#[inline]
#[must_use]
pub const fn calculate_prefetch_distance(dimension: usize) -> usize {
    let vector_bytes = dimension * std::mem::size_of::<f32>();
    let raw_distance = vector_bytes / L2_CACHE_LINE_BYTES;
    // Manual clamp for const fn
    if raw_distance < 4 {
        4
    } else if raw_distance > 16 {
        16
    } else {
        raw_distance
    }
}

/// Prefetches the head of a vector into L1 cache.
///
/// # Platform Support
///
/// - **x86_64**: `_mm_prefetch` with `_MM_HINT_T0`
/// - **aarch64**: `prfm pldl1keep`
/// - **Other**: no-op
#[inline]
pub fn prefetch_vector(vector: &[f32]) {
    if vector.is_empty() {
        return;
    }

    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: _mm_prefetch is a hint instruction that cannot cause memory faults.
        // - Condition 1: The pointer is derived from a valid slice reference (non-empty check above)
        // - Condition 2: x86_64 guarantees SSE, hence _mm_prefetch availability
        unsafe {
            use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
            _mm_prefetch(vector.as_ptr().cast::<i8>(), _MM_HINT_T0);
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: PRFM is a hint; it never faults and has no architectural side effects.
        unsafe {
            std::arch::asm!(
                "prfm pldl1keep, [{ptr}]",
                ptr = in(reg) vector.as_ptr(),
                options(nostack, preserves_flags, readonly)
            );
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        let _ = vector;
    }
}
