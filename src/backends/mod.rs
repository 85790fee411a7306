//! Backend implementations for different SIMD instruction sets
//!
//! This module contains the actual AXPY implementations for each backend.
//! All backends implement the same trait-based interface so the dispatcher in
//! [`crate::kernel`] can bind any of them behind one function pointer.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The public API
//! remains 100% safe.
//!
//! # Backends
//!
//! - `scalar`: Reference implementation (no SIMD), defines correctness
//! - `sse2`: x86_64 baseline SIMD (128-bit, 8 lanes)
//! - `avx2`: x86_64 advanced SIMD (256-bit, 16 lanes)
//! - `avx512`: x86_64 AVX-512F (16 lanes, 512-bit accumulators)
//! - `neon`: AArch64 SIMD (128-bit, 8 lanes)
//!
//! # Chunking
//!
//! SIMD backends walk the input in chunks of `min(remaining, LANES)` until
//! nothing remains. A final chunk shorter than `LANES` is staged through
//! zero-filled lane buffers so it runs through the exact same vector sequence
//! as a full chunk; only the live lanes are written back.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(target_arch = "x86_64")]
pub mod avx512;

#[cfg(target_arch = "aarch64")]
pub mod neon;

/// Backend trait for the saturating Q15 AXPY
///
/// Computes `y[i] = saturate(a[i] + alpha * b[i])` for every index, with
/// results bit-identical to [`scalar::ScalarBackend`].
///
/// # Safety
///
/// Implementations may use unsafe SIMD intrinsics. Callers must ensure:
/// - `a`, `b` and `y` have the same length
/// - The CPU supports the target features the backend was compiled for
pub trait AxpyBackend {
    /// Elements processed per full chunk
    const LANES: usize;

    /// Saturating AXPY: `y[i] = saturate(a[i] + alpha * b[i])`
    ///
    /// # Safety
    ///
    /// - `a`, `b` and `y` must have the same length
    /// - The backend's target features must be available at runtime
    unsafe fn axpy(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]);
}
