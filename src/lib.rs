//! Trueno-Q15: Saturating Fixed-Point AXPY with Verified SIMD Backends
//!
//! Computes `y[i] = saturate(a[i] + alpha * b[i])` over Q15 (`i16`) samples and
//! proves that every data-parallel backend is bit-identical to the scalar
//! reference before any throughput number is trusted.
//!
//! 1. **Scalar reference** - defines the exact numeric semantics, including saturation
//! 2. **CPU SIMD** - x86_64 (SSE2/AVX2/AVX-512F), AArch64 (NEON)
//! 3. **Verification harness** - edge-case battery, element-wise equivalence, cycle timing
//!
//! # Design Principles
//!
//! - **Reference first**: the scalar kernel defines correct output
//! - **Runtime dispatch**: the best backend is probed once and bound behind a function pointer
//! - **Zero unsafe in public API**: `unsafe` is isolated in backends
//! - **Exact, not approximate**: any nonzero difference fails verification
//!
//! # Quick Start
//!
//! ```rust
//! use trueno_q15::{compare, parallel_axpy, scalar_axpy};
//!
//! let a = [32767, -32768, 0, 100];
//! let b = [1, 1, 32767, 200];
//! let mut y_ref = [0i16; 4];
//! let mut y_simd = [0i16; 4];
//!
//! scalar_axpy(&a, &b, 4, 5, &mut y_ref).unwrap();
//! parallel_axpy(&a, &b, 4, 5, &mut y_simd).unwrap();
//!
//! assert_eq!(y_ref, [32767, -32763, 32767, 1100]);
//! assert!(compare(&y_ref, &y_simd, 4).unwrap().exact_match);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub mod backends;
pub mod bench;
pub mod counter;
pub mod edge_cases;
pub mod error;
pub mod kernel;
pub mod output;
pub mod q15;
pub mod verify;

pub use bench::{run_benchmark, run_benchmark_with, BenchConfig, BenchReport};
pub use counter::{CycleCounter, InstantCounter, PlatformCounter};
pub use edge_cases::{run_edge_cases, EdgeCase, EdgeCaseReport, EDGE_CASES};
pub use error::{Q15Error, Result};
pub use kernel::{checked_len, parallel_axpy, scalar_axpy, AxpyKernel};
pub use q15::{saturate_q15, widening_saturating_mac, Q15_MAX, Q15_MIN};
pub use verify::{compare, Comparison};

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Backend {
    /// Scalar reference (no SIMD)
    Scalar,
    /// SSE2 (x86_64 baseline, 8 x i16)
    SSE2,
    /// AVX2 (256-bit, 16 x i16)
    AVX2,
    /// AVX-512F (16 x i16 widened into 512-bit accumulators)
    AVX512,
    /// ARM NEON (AArch64, 8 x i16)
    NEON,
    /// Auto-select best available
    Auto,
}

impl Backend {
    /// Select the best available backend for the current platform
    ///
    /// This is a convenience wrapper around `select_best_available_backend()`
    pub fn select_best() -> Self {
        select_best_available_backend()
    }

    /// Whether this backend can execute on the current CPU
    ///
    /// `Scalar` and `Auto` are always available.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar | Backend::Auto => true,
            #[cfg(target_arch = "x86_64")]
            Backend::SSE2 => is_x86_feature_detected!("sse2"),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX512 => is_x86_feature_detected!("avx512f"),
            #[cfg(target_arch = "aarch64")]
            Backend::NEON => std::arch::is_aarch64_feature_detected!("neon"),
            _ => false,
        }
    }

    /// Human-readable name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "Scalar",
            Backend::SSE2 => "SSE2",
            Backend::AVX2 => "AVX2",
            Backend::AVX512 => "AVX-512",
            Backend::NEON => "NEON",
            Backend::Auto => "Auto",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Q15Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Backend::Scalar),
            "sse2" => Ok(Backend::SSE2),
            "avx2" => Ok(Backend::AVX2),
            "avx512" | "avx-512" => Ok(Backend::AVX512),
            "neon" => Ok(Backend::NEON),
            "auto" => Ok(Backend::Auto),
            other => Err(Q15Error::InvalidInput(format!(
                "unknown backend '{other}' (expected scalar, sse2, avx2, avx512, neon or auto)"
            ))),
        }
    }
}

/// Detect best SIMD backend for x86_64 platforms
#[cfg(target_arch = "x86_64")]
fn detect_x86_backend() -> Backend {
    if is_x86_feature_detected!("avx512f") {
        return Backend::AVX512;
    }
    if is_x86_feature_detected!("avx2") {
        return Backend::AVX2;
    }
    if is_x86_feature_detected!("sse2") {
        return Backend::SSE2;
    }
    Backend::Scalar
}

/// Detect best SIMD backend for AArch64 platforms
#[cfg(target_arch = "aarch64")]
fn detect_arm_backend() -> Backend {
    if std::arch::is_aarch64_feature_detected!("neon") {
        Backend::NEON
    } else {
        Backend::Scalar
    }
}

/// Select the best available backend for the current platform
///
/// This function performs runtime CPU feature detection and selects the most
/// optimized backend available. The selection follows this priority:
///
/// **x86_64**:
/// 1. AVX-512 (if `avx512f` feature detected)
/// 2. AVX2 (if `avx2` feature detected)
/// 3. SSE2 (baseline for x86_64)
/// 4. Scalar (fallback)
///
/// **AArch64**: NEON (if available), else Scalar
///
/// **Other platforms** (including RISC-V): Scalar
///
/// # Examples
///
/// ```
/// use trueno_q15::select_best_available_backend;
///
/// let backend = select_best_available_backend();
/// println!("Using backend: {:?}", backend);
/// ```
pub fn select_best_available_backend() -> Backend {
    #[cfg(target_arch = "x86_64")]
    {
        detect_x86_backend()
    }

    #[cfg(target_arch = "aarch64")]
    {
        detect_arm_backend()
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        Backend::Scalar
    }
}
