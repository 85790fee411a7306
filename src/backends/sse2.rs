//! SSE2 backend implementation (x86_64 baseline SIMD)
//!
//! This backend uses SSE2 intrinsics for 128-bit SIMD operations.
//! SSE2 is available on all x86_64 CPUs.
//!
//! # Performance
//!
//! 8 x i16 lanes per chunk. SSE2 has no sign-extending load, so the widening
//! step is built from `mullo`/`mulhi` pairs and interleaves.
//!
//! # Safety
//!
//! All SSE2 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::AxpyBackend;

/// SSE2 backend (128-bit SIMD for x86_64)
pub struct Sse2Backend;

const LANES: usize = 8;

/// One full chunk: widen `alpha * b`, widen-add `a`, saturate-narrow, store
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn axpy_lanes(a: *const i16, b: *const i16, valpha: __m128i, y: *mut i16) {
    let va = _mm_loadu_si128(a as *const __m128i);
    let vb = _mm_loadu_si128(b as *const __m128i);

    // Full 32-bit products: interleave the low and high halves of each i16 x i16
    let prod_lo16 = _mm_mullo_epi16(vb, valpha);
    let prod_hi16 = _mm_mulhi_epi16(vb, valpha);
    let prod_lo = _mm_unpacklo_epi16(prod_lo16, prod_hi16);
    let prod_hi = _mm_unpackhi_epi16(prod_lo16, prod_hi16);

    // Sign-extend a: duplicate each lane into both halves, then shift down
    let a_lo = _mm_srai_epi32(_mm_unpacklo_epi16(va, va), 16);
    let a_hi = _mm_srai_epi32(_mm_unpackhi_epi16(va, va), 16);

    let sum_lo = _mm_add_epi32(prod_lo, a_lo);
    let sum_hi = _mm_add_epi32(prod_hi, a_hi);

    // Saturating narrow i32 -> i16 (no shift, no rounding)
    let vy = _mm_packs_epi32(sum_lo, sum_hi);
    _mm_storeu_si128(y as *mut __m128i, vy);
}

impl AxpyBackend for Sse2Backend {
    const LANES: usize = LANES;

    #[target_feature(enable = "sse2")]
    // SAFETY: Pointer arithmetic and SIMD intrinsics are safe because:
    // 1. Full chunks are only issued when `offset + LANES <= len`
    // 2. Partial chunks read and write lane-sized stack buffers, never the slices directly
    // 3. Unaligned loads/stores used (_mm_loadu_si128/_mm_storeu_si128) - no alignment requirement
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        let valpha = _mm_set1_epi16(alpha);
        let mut offset = 0;
        let mut remaining = a.len();

        while remaining > 0 {
            let vl = remaining.min(LANES);

            if vl == LANES {
                axpy_lanes(
                    a.as_ptr().add(offset),
                    b.as_ptr().add(offset),
                    valpha,
                    y.as_mut_ptr().add(offset),
                );
            } else {
                let mut lane_a = [0i16; LANES];
                let mut lane_b = [0i16; LANES];
                let mut lane_y = [0i16; LANES];
                lane_a[..vl].copy_from_slice(&a[offset..offset + vl]);
                lane_b[..vl].copy_from_slice(&b[offset..offset + vl]);
                axpy_lanes(lane_a.as_ptr(), lane_b.as_ptr(), valpha, lane_y.as_mut_ptr());
                y[offset..offset + vl].copy_from_slice(&lane_y[..vl]);
            }

            offset += vl;
            remaining -= vl;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support;

    #[test]
    fn test_sse2_edge_cases() {
        let cases: [(i16, i16, i16, i16); 4] = [
            (32767, 1, 1, 32767),
            (-32768, 1, -1, -32768),
            (0, 32767, 32767, 32767),
            (100, 200, 5, 1100),
        ];
        for (a, b, alpha, expected) in cases {
            let mut y = [0i16; 1];
            unsafe {
                Sse2Backend::axpy(&[a], &[b], alpha, &mut y);
            }
            assert_eq!(y[0], expected, "a={a} b={b} alpha={alpha}");
        }
    }

    #[test]
    fn test_sse2_full_chunk() {
        let a = [0, 1, -1, 100, -100, 32767, -32768, 12345];
        let b = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut result = [0i16; 8];

        unsafe {
            Sse2Backend::axpy(&a, &b, 10, &mut result);
        }

        assert_eq!(result, [10, 21, 29, 140, -50, 32767, -32698, 12425]);
    }

    #[test]
    fn test_sse2_min_times_min() {
        // -32768 * -32768 = 2^30; checks the mulhi/mullo recombination
        let a = [0i16; 9];
        let b = [-32768i16; 9];
        let mut result = [0i16; 9];

        unsafe {
            Sse2Backend::axpy(&a, &b, -32768, &mut result);
        }

        assert_eq!(result, [32767; 9]);
    }

    #[test]
    fn test_sse2_matches_scalar() {
        unsafe {
            test_support::assert_matches_scalar::<Sse2Backend>();
        }
    }

    #[test]
    fn test_sse2_leaves_nothing_past_len() {
        let a = [1i16; 5];
        let b = [1i16; 5];
        let mut result = [99i16; 7];

        unsafe {
            Sse2Backend::axpy(&a, &b, 1, &mut result[..5]);
        }

        assert_eq!(result, [2, 2, 2, 2, 2, 99, 99]);
    }
}
