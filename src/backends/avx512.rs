//! AVX-512 backend implementation (x86_64 AVX-512F)
//!
//! AVX-512 is available on Intel Skylake-X/Sapphire Rapids (2017+) and AMD Zen 4 (2022+) CPUs.
//! Only the foundation subset (`avx512f`) is required.
//!
//! # Performance
//!
//! 16 x i16 lanes per chunk, widened into a single 512-bit register of i32
//! accumulators. `vpmovsdw` (`_mm512_cvtsepi32_epi16`) performs the saturating
//! narrow in one instruction, the closest x86 match to a fused
//! widening-saturating multiply-accumulate.
//!
//! # Safety
//!
//! All AVX-512 intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::AxpyBackend;

/// AVX-512 backend (512-bit accumulators for x86_64)
pub struct Avx512Backend;

const LANES: usize = 16;

#[inline]
#[target_feature(enable = "avx512f")]
unsafe fn axpy_lanes(a: *const i16, b: *const i16, valpha: __m512i, y: *mut i16) {
    let a32 = _mm512_cvtepi16_epi32(_mm256_loadu_si256(a as *const __m256i));
    let b32 = _mm512_cvtepi16_epi32(_mm256_loadu_si256(b as *const __m256i));

    let sum = _mm512_add_epi32(_mm512_mullo_epi32(b32, valpha), a32);

    let vy = _mm512_cvtsepi32_epi16(sum);
    _mm256_storeu_si256(y as *mut __m256i, vy);
}

impl AxpyBackend for Avx512Backend {
    const LANES: usize = LANES;

    #[target_feature(enable = "avx512f")]
    // SAFETY: Pointer arithmetic and SIMD intrinsics are safe because:
    // 1. Full chunks are only issued when `offset + LANES <= len`
    // 2. Partial chunks read and write lane-sized stack buffers, never the slices directly
    // 3. Unaligned 256-bit loads/stores used - no alignment requirement
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        let valpha = _mm512_set1_epi32(alpha as i32);
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
