//! AVX2 backend implementation (x86_64 advanced SIMD)
//!
//! This backend uses AVX2 intrinsics for 256-bit SIMD operations.
//! AVX2 is available on Intel Haswell (2013+) and AMD Excavator (2015+) CPUs.
//!
//! # Performance
//!
//! 16 x i16 lanes per chunk: two sign-extending widens to 8 x i32, a 32-bit
//! multiply-add each, then one saturating pack.
//!
//! # Safety
//!
//! All AVX2 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::AxpyBackend;

/// AVX2 backend (256-bit SIMD for x86_64)
pub struct Avx2Backend;

const LANES: usize = 16;

/// `_mm256_packs_epi32` packs per 128-bit lane; this restores element order
const PACK_ORDER: i32 = 0b11_01_10_00;

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn axpy_lanes(a: *const i16, b: *const i16, valpha: __m256i, y: *mut i16) {
    let va = _mm256_loadu_si256(a as *const __m256i);
    let vb = _mm256_loadu_si256(b as *const __m256i);

    // Widen both halves to 8 x i32
    let a_lo = _mm256_cvtepi16_epi32(_mm256_castsi256_si128(va));
    let a_hi = _mm256_cvtepi16_epi32(_mm256_extracti128_si256(va, 1));
    let b_lo = _mm256_cvtepi16_epi32(_mm256_castsi256_si128(vb));
    let b_hi = _mm256_cvtepi16_epi32(_mm256_extracti128_si256(vb, 1));

    // alpha * b + a in 32-bit, cannot overflow for i16 operands
    let sum_lo = _mm256_add_epi32(_mm256_mullo_epi32(b_lo, valpha), a_lo);
    let sum_hi = _mm256_add_epi32(_mm256_mullo_epi32(b_hi, valpha), a_hi);

    // Saturating narrow, then undo the per-lane interleave
    let packed = _mm256_packs_epi32(sum_lo, sum_hi);
    let vy = _mm256_permute4x64_epi64(packed, PACK_ORDER);
    _mm256_storeu_si256(y as *mut __m256i, vy);
}

impl AxpyBackend for Avx2Backend {
    const LANES: usize = LANES;

    #[target_feature(enable = "avx2")]
    // SAFETY: Pointer arithmetic and SIMD intrinsics are safe because:
    // 1. Full chunks are only issued when `offset + LANES <= len`
    // 2. Partial chunks read and write lane-sized stack buffers, never the slices directly
    // 3. Unaligned loads/stores used (_mm256_loadu_si256/_mm256_storeu_si256)
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        let valpha = _mm256_set1_epi32(alpha as i32);
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
