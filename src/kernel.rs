//! Capability-checked kernel selection
//!
//! The CPU is probed once and the chosen backend is bound behind a plain
//! function pointer, so call sites never branch on the platform. Operand
//! validation lives here as well; backends only ever see trimmed, equal-length
//! slices.

use std::sync::OnceLock;

#[cfg(feature = "tracing-spans")]
use tracing::instrument;

#[cfg(target_arch = "x86_64")]
use crate::backends::avx2::Avx2Backend;
#[cfg(target_arch = "x86_64")]
use crate::backends::avx512::Avx512Backend;
#[cfg(target_arch = "aarch64")]
use crate::backends::neon::NeonBackend;
use crate::backends::scalar::ScalarBackend;
#[cfg(target_arch = "x86_64")]
use crate::backends::sse2::Sse2Backend;
use crate::backends::AxpyBackend;
use crate::{Backend, Q15Error, Result};

/// Raw backend entry point: `(a, b, alpha, y)` over equal-length slices
pub type AxpyFn = unsafe fn(&[i16], &[i16], i16, &mut [i16]);

/// Process-wide kernel for [`parallel_axpy`], resolved on first use
static PARALLEL_KERNEL: OnceLock<AxpyKernel> = OnceLock::new();

/// A saturating Q15 AXPY bound to one backend
///
/// # Examples
///
/// ```
/// use trueno_q15::{AxpyKernel, Backend};
///
/// let kernel = AxpyKernel::detect();
/// let mut y = [0i16; 3];
/// kernel.axpy(&[1, 2, 3], &[10, 10, 10], 3, 2, &mut y).unwrap();
/// assert_eq!(y, [21, 22, 23]);
///
/// assert_eq!(AxpyKernel::scalar().backend(), Backend::Scalar);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AxpyKernel {
    backend: Backend,
    lanes: usize,
    func: AxpyFn,
}

impl AxpyKernel {
    fn of<B: AxpyBackend>(backend: Backend) -> Self {
        // SAFETY: `bind` only reaches here after `backend.is_available()`.
        unsafe { Self::from_raw(backend, B::LANES, B::axpy) }
    }

    /// Bind an arbitrary entry point under a backend label
    ///
    /// # Safety
    ///
    /// `func` must be callable on the running CPU for any equal-length slices.
    pub unsafe fn from_raw(backend: Backend, lanes: usize, func: AxpyFn) -> Self {
        Self {
            backend,
            lanes,
            func,
        }
    }

    /// The scalar reference kernel
    pub fn scalar() -> Self {
        Self::of::<ScalarBackend>(Backend::Scalar)
    }

    /// Bind the best backend the current CPU supports
    ///
    /// Falls back to the scalar kernel when no SIMD backend is available.
    pub fn detect() -> Self {
        let backend = crate::select_best_available_backend();
        match Self::bind(backend) {
            Some(kernel) => {
                tracing::debug!(backend = %backend, lanes = kernel.lanes, "bound Q15 AXPY kernel");
                kernel
            }
            None => {
                tracing::debug!(probed = %backend, "no SIMD AXPY backend available, using scalar fallback");
                Self::scalar()
            }
        }
    }

    /// Bind a specific backend
    ///
    /// `Backend::Auto` resolves like [`AxpyKernel::detect`].
    ///
    /// # Errors
    ///
    /// Returns [`Q15Error::UnsupportedBackend`] if the backend cannot run on this CPU.
    pub fn for_backend(backend: Backend) -> Result<Self> {
        if backend == Backend::Auto {
            return Ok(Self::detect());
        }
        Self::bind(backend).ok_or(Q15Error::UnsupportedBackend(backend))
    }

    fn bind(backend: Backend) -> Option<Self> {
        if !backend.is_available() {
            return None;
        }
        match backend {
            Backend::Scalar => Some(Self::scalar()),
            #[cfg(target_arch = "x86_64")]
            Backend::SSE2 => Some(Self::of::<Sse2Backend>(backend)),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX2 => Some(Self::of::<Avx2Backend>(backend)),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX512 => Some(Self::of::<Avx512Backend>(backend)),
            #[cfg(target_arch = "aarch64")]
            Backend::NEON => Some(Self::of::<NeonBackend>(backend)),
            _ => None,
        }
    }

    /// Backend this kernel is bound to
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Elements per full chunk (1 for the scalar kernel)
    pub fn lane_width(&self) -> usize {
        self.lanes
    }

    /// Compute `y[i] = saturate(a[i] + alpha * b[i])` for `i < n`
    ///
    /// `n = 0` is a no-op. Only the first `n` elements of each buffer are used,
    /// so the buffers may differ in length. Elements of `y` at or past `n` are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Q15Error::InvalidLength`] if `n` exceeds `a`, `b` or `y`.
    #[cfg_attr(feature = "tracing-spans", instrument(skip(self, a, b, y), fields(backend = %self.backend)))]
    pub fn axpy(&self, a: &[i16], b: &[i16], n: usize, alpha: i16, y: &mut [i16]) -> Result<()> {
        let available = a.len().min(b.len()).min(y.len());
        if n > available {
            return Err(Q15Error::InvalidLength {
                n: i64::try_from(n).unwrap_or(i64::MAX),
                available,
            });
        }
        if n == 0 {
            return Ok(());
        }

        // SAFETY: the backend was bound only after its CPU features were
        // detected, and all three slices are trimmed to exactly `n` elements.
        unsafe { (self.func)(&a[..n], &b[..n], alpha, &mut y[..n]) };
        Ok(())
    }
}

/// Kernel used by [`parallel_axpy`], probed once per process
pub fn parallel_kernel() -> &'static AxpyKernel {
    PARALLEL_KERNEL.get_or_init(AxpyKernel::detect)
}

/// Scalar reference AXPY; defines correct output for every other kernel
///
/// # Errors
///
/// Same as [`AxpyKernel::axpy`].
pub fn scalar_axpy(a: &[i16], b: &[i16], n: usize, alpha: i16, y: &mut [i16]) -> Result<()> {
    AxpyKernel::scalar().axpy(a, b, n, alpha, y)
}

/// Data-parallel AXPY on the best available backend
///
/// Bit-identical to [`scalar_axpy`] for every input.
///
/// # Errors
///
/// Same as [`AxpyKernel::axpy`].
pub fn parallel_axpy(a: &[i16], b: &[i16], n: usize, alpha: i16, y: &mut [i16]) -> Result<()> {
    parallel_kernel().axpy(a, b, n, alpha, y)
}

/// Convert an externally supplied signed length into an element count
///
/// # Errors
///
/// Returns [`Q15Error::InvalidLength`] for negative `n`.
///
/// # Examples
///
/// ```
/// use trueno_q15::checked_len;
///
/// assert_eq!(checked_len(4096).unwrap(), 4096);
/// assert_eq!(checked_len(0).unwrap(), 0);
/// assert!(checked_len(-1).is_err());
/// ```
pub fn checked_len(n: i64) -> Result<usize> {
    usize::try_from(n).map_err(|_| Q15Error::InvalidLength { n, available: 0 })
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn operands() -> impl Strategy<Value = (Vec<i16>, Vec<i16>)> {
        (0usize..200).prop_flat_map(|len| {
            (
                prop::collection::vec(any::<i16>(), len),
                prop::collection::vec(any::<i16>(), len),
            )
        })
    }

    // Property test: parallel kernel is bit-identical to the scalar reference
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_parallel_matches_scalar((a, b) in operands(), alpha in any::<i16>()) {
            let n = a.len();
            let mut y_ref = vec![0i16; n];
            let mut y_par = vec![0i16; n];

            scalar_axpy(&a, &b, n, alpha, &mut y_ref).unwrap();
            parallel_axpy(&a, &b, n, alpha, &mut y_par).unwrap();

            prop_assert_eq!(y_ref, y_par);
        }
    }

    // Property test: every output equals the clamped 64-bit exact result
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_output_is_clamped_exact((a, b) in operands(), alpha in any::<i16>()) {
            let n = a.len();
            let mut y = vec![0i16; n];
            parallel_axpy(&a, &b, n, alpha, &mut y).unwrap();

            for i in 0..n {
                let exact = a[i] as i64 + alpha as i64 * b[i] as i64;
                prop_assert_eq!(y[i] as i64, exact.clamp(i16::MIN as i64, i16::MAX as i64));
            }
        }
    }

    // Property test: kernels never mutate their inputs
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn test_inputs_untouched((a, b) in operands(), alpha in any::<i16>()) {
            let (a0, b0) = (a.clone(), b.clone());
            let mut y = vec![0i16; a.len()];
            parallel_axpy(&a, &b, a.len(), alpha, &mut y).unwrap();
            prop_assert_eq!(a, a0);
            prop_assert_eq!(b, b0);
        }
    }
}
