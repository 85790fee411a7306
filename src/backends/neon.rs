//! ARM NEON backend implementation (AArch64 128-bit SIMD)
//!
//! NEON is mandatory on ARMv8/AArch64, so this backend is selected on every
//! AArch64 CPU. 32-bit ARM falls back to the scalar backend.
//!
//! # Performance
//!
//! 8 x i16 lanes per chunk. NEON has native widening multiply (`smull`),
//! widening add (`saddw`) and saturating narrow (`sqxtn`), so each chunk maps
//! onto the widen, multiply, widen-add, saturate decomposition directly.
//!
//! # Safety
//!
//! All NEON intrinsics are marked `unsafe` by Rust. This module carefully isolates
//! all unsafe code and verifies correctness through comprehensive testing.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use super::AxpyBackend;

/// ARM NEON backend (128-bit SIMD)
pub struct NeonBackend;

const LANES: usize = 8;

#[inline]
#[target_feature(enable = "neon")]
unsafe fn axpy_lanes(a: *const i16, b: *const i16, alpha: i16, y: *mut i16) {
    let va = vld1q_s16(a);
    let vb = vld1q_s16(b);

    // smull / smull2 by scalar alpha
    let prod_lo = vmull_n_s16(vget_low_s16(vb), alpha);
    let prod_hi = vmull_high_n_s16(vb, alpha);

    // saddw / saddw2
    let sum_lo = vaddw_s16(prod_lo, vget_low_s16(va));
    let sum_hi = vaddw_high_s16(prod_hi, va);

    // sqxtn / sqxtn2
    let vy = vqmovn_high_s32(vqmovn_s32(sum_lo), sum_hi);
    vst1q_s16(y, vy);
}

impl AxpyBackend for NeonBackend {
    const LANES: usize = LANES;

    #[target_feature(enable = "neon")]
    // SAFETY: Pointer arithmetic and SIMD intrinsics are safe because:
    // 1. Full chunks are only issued when `offset + LANES <= len`
    // 2. Partial chunks read and write lane-sized stack buffers, never the slices directly
    // 3. vld1q/vst1q have no alignment requirement beyond the element type
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        let mut offset = 0;
        let mut remaining = a.len();

        while remaining > 0 {
            let vl = remaining.min(LANES);

            if vl == LANES {
                axpy_lanes(
                    a.as_ptr().add(offset),
                    b.as_ptr().add(offset),
                    alpha,
                    y.as_mut_ptr().add(offset),
                );
            } else {
                let mut lane_a = [0i16; LANES];
                let mut lane_b = [0i16; LANES];
                let mut lane_y = [0i16; LANES];
                lane_a[..vl].copy_from_slice(&a[offset..offset + vl]);
                lane_b[..vl].copy_from_slice(&b[offset..offset + vl]);
                axpy_lanes(lane_a.as_ptr(), lane_b.as_ptr(), alpha, lane_y.as_mut_ptr());
                y[offset..offset + vl].copy_from_slice(&lane_y[..vl]);
            }

            offset += vl;
            remaining -= vl;
        }
    }
}
