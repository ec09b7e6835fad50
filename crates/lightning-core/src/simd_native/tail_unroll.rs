//! Remainder/tail handling for SIMD loops.
//!
//! Generates unrolled code for the last 1-7 elements that don't fill a
//! full 8-wide lane.

/// Unrolled squared L2 remainder (1-7 elements) with 4->2->1 unrolling.
macro_rules! sum_squared_remainder_unrolled_8 {
    ($a:expr, $b:expr, $base:expr, $remainder:expr, $result:expr) => {
        if $remainder >= 4 {
            let d0 = $a[$base] - $b[$base];
            let d1 = $a[$base + 1] - $b[$base + 1];
            let d2 = $a[$base + 2] - $b[$base + 2];
            let d3 = $a[$base + 3] - $b[$base + 3];
            $result += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
            if $remainder >= 5 {
                let d4 = $a[$base + 4] - $b[$base + 4];
                $result += d4 * d4;
            }
            if $remainder >= 6 {
                let d5 = $a[$base + 5] - $b[$base + 5];
                $result += d5 * d5;
            }
            if $remainder == 7 {
                let d6 = $a[$base + 6] - $b[$base + 6];
                $result += d6 * d6;
            }
        } else if $remainder >= 2 {
            let d0 = $a[$base] - $b[$base];
            let d1 = $a[$base + 1] - $b[$base + 1];
            $result += d0 * d0 + d1 * d1;
            if $remainder == 3 {
                let d2 = $a[$base + 2] - $b[$base + 2];
                $result += d2 * d2;
            }
        } else if $remainder == 1 {
            let d = $a[$base] - $b[$base];
            $result += d * d;
        }
    };
}

/// Unrolled fused cosine remainder (1-7 elements): dot and both squared norms.
macro_rules! sum_cosine_remainder {
    ($a:expr, $b:expr, $base:expr, $len:expr, $dot:expr, $na:expr, $nb:expr) => {
        let mut i = $base;
        while i + 2 <= $len {
            let (x0, y0) = ($a[i], $b[i]);
            let (x1, y1) = ($a[i + 1], $b[i + 1]);
            $dot += x0 * y0 + x1 * y1;
            $na += x0 * x0 + x1 * x1;
            $nb += y0 * y0 + y1 * y1;
            i += 2;
        }
        if i < $len {
            let (x, y) = ($a[i], $b[i]);
            $dot += x * y;
            $na += x * x;
            $nb += y * y;
        }
    };
}

#[allow(unused_imports)]
pub(crate) use sum_cosine_remainder;
#[allow(unused_imports)]
pub(crate) use sum_squared_remainder_unrolled_8;
