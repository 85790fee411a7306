//! Scalar (non-SIMD) backend implementation
//!
//! This is the reference implementation that works on all platforms and defines
//! the numeric semantics every other backend must reproduce bit-for-bit.
//! It is also the fallback bound on targets without a SIMD backend (e.g. RISC-V).
//!
//! # Performance
//!
//! One element per iteration. The compiler may auto-vectorize the loop, but no
//! guarantee is made.

use super::AxpyBackend;
use crate::q15::widening_saturating_mac;

/// Scalar backend (portable, no SIMD)
pub struct ScalarBackend;

impl AxpyBackend for ScalarBackend {
    const LANES: usize = 1;

    // SAFETY: This function is safe because:
    // 1. All slice accesses go through bounds-checked iterators
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match AxpyBackend trait interface
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        for ((out, &x), &z) in y.iter_mut().zip(a).zip(b) {
            *out = widening_saturating_mac(x, z, alpha);
        }
    }
}
