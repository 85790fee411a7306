//! Benchmark driver
//!
//! One run fills two input buffers from an explicit random generator, runs the
//! edge-case battery, times the scalar reference and the selected kernel over
//! the full buffers, and compares the two outputs element by element.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use trueno_q15::{run_benchmark, BenchConfig, InstantCounter};
//!
//! let config = BenchConfig::new().with_len(1000).with_alpha(-7);
//! let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
//!
//! let report = run_benchmark(&config, &InstantCounter::new(), &mut rng).unwrap();
//! assert!(report.passed());
//! assert_eq!(report.comparison.max_abs_diff, 0);
//! ```

use std::hint::black_box;

use rand::Rng;
use serde::Serialize;

use crate::counter::CycleCounter;
use crate::edge_cases::{run_edge_cases, EdgeCaseReport};
use crate::kernel::AxpyKernel;
use crate::verify::{compare, Comparison};
use crate::{Backend, Q15Error, Result};

/// Default buffer length
pub const DEFAULT_LEN: usize = 4096;

/// Default generator seed
pub const DEFAULT_SEED: u64 = 1234;

/// Default scale factor
pub const DEFAULT_ALPHA: i16 = 3;

/// Benchmark run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchConfig {
    /// Elements per input buffer
    pub len: usize,
    /// Seed for the input generator
    pub seed: u64,
    /// Scale factor applied to `b`
    pub alpha: i16,
    /// Backend for the data-parallel kernel
    pub backend: Backend,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            seed: DEFAULT_SEED,
            alpha: DEFAULT_ALPHA,
            backend: Backend::Auto,
        }
    }
}

impl BenchConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set buffer length
    ///
    /// # Examples
    ///
    /// ```
    /// use trueno_q15::BenchConfig;
    ///
    /// let config = BenchConfig::new().with_len(8192);
    /// assert_eq!(config.len, 8192);
    /// ```
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Set generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set scale factor
    pub fn with_alpha(mut self, alpha: i16) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the backend for the data-parallel kernel
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Finalize configuration (for builder pattern consistency)
    pub fn build(self) -> Self {
        self
    }
}

/// Timing for one kernel over the full buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KernelTiming {
    /// Backend that ran
    pub backend: Backend,
    /// Elements per chunk
    pub lanes: usize,
    /// Counter ticks between the two samples
    pub ticks: u64,
    /// `ticks / len`, or 0 for an empty buffer
    pub per_element: f64,
}

/// Everything observed during one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Configuration the run used
    pub config: BenchConfig,
    /// Unit of the timing ticks
    pub counter_unit: &'static str,
    /// Whether the counter produced real timings
    pub counter_meaningful: bool,
    /// Edge-case battery outcomes
    pub edge_cases: EdgeCaseReport,
    /// Scalar reference timing
    pub scalar: KernelTiming,
    /// Data-parallel kernel timing
    pub parallel: KernelTiming,
    /// Full-buffer equivalence check
    pub comparison: Comparison,
}

impl BenchReport {
    /// The edge-case battery passed and the full outputs match exactly
    pub fn passed(&self) -> bool {
        self.edge_cases.passed() && self.comparison.exact_match
    }

    /// Scalar ticks divided by parallel ticks, if both are nonzero
    pub fn speedup(&self) -> Option<f64> {
        if !self.counter_meaningful || self.scalar.ticks == 0 || self.parallel.ticks == 0 {
            return None;
        }
        Some(self.scalar.ticks as f64 / self.parallel.ticks as f64)
    }
}

/// Reserve a sample buffer without aborting on allocation failure
fn try_alloc(len: usize) -> Result<Vec<i16>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Q15Error::AllocationFailed { elements: len })?;
    Ok(buf)
}

/// Zero-filled output buffer of `len` samples
pub fn zeroed_samples(len: usize) -> Result<Vec<i16>> {
    let mut buf = try_alloc(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// `len` samples drawn uniformly from the full `i16` range
pub fn random_samples<R: Rng>(rng: &mut R, len: usize) -> Result<Vec<i16>> {
    let mut buf = try_alloc(len)?;
    buf.extend((0..len).map(|_| rng.random::<i16>()));
    Ok(buf)
}

fn time_kernel<C: CycleCounter + ?Sized>(
    kernel: &AxpyKernel,
    counter: &C,
    a: &[i16],
    b: &[i16],
    alpha: i16,
    y: &mut [i16],
) -> Result<KernelTiming> {
    let n = a.len();

    let t0 = counter.now();
    kernel.axpy(black_box(a), black_box(b), n, black_box(alpha), y)?;
    let t1 = counter.now();
    black_box(&*y);

    let ticks = t1.saturating_sub(t0);
    let per_element = if n == 0 { 0.0 } else { ticks as f64 / n as f64 };

    tracing::debug!(backend = %kernel.backend(), ticks, per_element, "timed kernel");

    Ok(KernelTiming {
        backend: kernel.backend(),
        lanes: kernel.lane_width(),
        ticks,
        per_element,
    })
}

/// Run one full benchmark
///
/// A numeric mismatch does not abort the run; it is recorded in the report
/// and makes [`BenchReport::passed`] false.
///
/// # Errors
///
/// - [`Q15Error::UnsupportedBackend`] if `config.backend` cannot run here
/// - [`Q15Error::AllocationFailed`] if a buffer cannot be reserved
pub fn run_benchmark<C, R>(config: &BenchConfig, counter: &C, rng: &mut R) -> Result<BenchReport>
where
    C: CycleCounter + ?Sized,
    R: Rng,
{
    let kernel = AxpyKernel::for_backend(config.backend)?;
    run_benchmark_with(config, kernel, counter, rng)
}

/// Run one full benchmark against an already-bound kernel
///
/// `config.backend` is ignored; the report names `kernel`'s backend.
///
/// # Errors
///
/// Returns [`Q15Error::AllocationFailed`] if a buffer cannot be reserved.
pub fn run_benchmark_with<C, R>(
    config: &BenchConfig,
    kernel: AxpyKernel,
    counter: &C,
    rng: &mut R,
) -> Result<BenchReport>
where
    C: CycleCounter + ?Sized,
    R: Rng,
{
    let reference = AxpyKernel::scalar();
    let len = config.len;

    tracing::info!(
        len,
        alpha = config.alpha,
        seed = config.seed,
        backend = %kernel.backend(),
        "starting Q15 AXPY benchmark"
    );

    let a = random_samples(rng, len)?;
    let b = random_samples(rng, len)?;
    let mut y_ref = zeroed_samples(len)?;
    let mut y_par = zeroed_samples(len)?;

    let edge_cases = run_edge_cases(&kernel)?;

    let scalar = time_kernel(&reference, counter, &a, &b, config.alpha, &mut y_ref)?;
    let parallel = time_kernel(&kernel, counter, &a, &b, config.alpha, &mut y_par)?;

    let comparison = compare(&y_ref, &y_par, len)?;
    if !comparison.exact_match {
        tracing::warn!(
            max_abs_diff = comparison.max_abs_diff,
            mismatches = comparison.mismatches,
            first_mismatch = ?comparison.first_mismatch,
            backend = %kernel.backend(),
            "parallel output diverges from scalar reference"
        );
    }

    let report = BenchReport {
        config: config.clone(),
        counter_unit: counter.unit(),
        counter_meaningful: counter.is_meaningful(),
        edge_cases,
        scalar,
        parallel,
        comparison,
    };

    tracing::info!(passed = report.passed(), speedup = ?report.speedup(), "benchmark finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;

    /// Advances by a fixed step on every read
    struct StepCounter {
        next: Cell<u64>,
        step: u64,
    }

    impl StepCounter {
        fn new(step: u64) -> Self {
            Self {
                next: Cell::new(0),
                step,
            }
        }
    }

    impl CycleCounter for StepCounter {
        fn now(&self) -> u64 {
            let value = self.next.get();
            self.next.set(value + self.step);
            value
        }
    }

    /// Counter of a platform without a tick register
    struct ZeroCounter;

    impl CycleCounter for ZeroCounter {
        fn now(&self) -> u64 {
            0
        }

        fn is_meaningful(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.len, 4096);
        assert_eq!(config.seed, 1234);
        assert_eq!(config.alpha, 3);
        assert_eq!(config.backend, Backend::Auto);
    }

    #[test]
    fn test_builder() {
        let config = BenchConfig::new()
            .with_len(17)
            .with_seed(9)
            .with_alpha(-2)
            .with_backend(Backend::Scalar)
            .build();
        assert_eq!(
            config,
            BenchConfig {
                len: 17,
                seed: 9,
                alpha: -2,
                backend: Backend::Scalar
            }
        );
    }

    #[test]
    fn test_random_samples_reproducible() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(1234);
        let mut rng2 = ChaCha8Rng::seed_from_u64(1234);
        let x = random_samples(&mut rng1, 512).unwrap();
        let y = random_samples(&mut rng2, 512).unwrap();
        assert_eq!(x, y);
        assert_eq!(x.len(), 512);
        // full-range data has both signs
        assert!(x.iter().any(|&v| v < 0) && x.iter().any(|&v| v > 0));
    }

    #[test]
    fn test_allocation_failure_reported() {
        assert_eq!(
            zeroed_samples(usize::MAX).unwrap_err(),
            Q15Error::AllocationFailed {
                elements: usize::MAX
            }
        );
    }

    #[test]
    fn test_run_benchmark_passes() {
        let config = BenchConfig::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let counter = StepCounter::new(4096);

        let report = run_benchmark(&config, &counter, &mut rng).unwrap();

        assert!(report.passed());
        assert!(report.edge_cases.passed());
        assert_eq!(report.comparison.max_abs_diff, 0);
        assert_eq!(report.scalar.backend, Backend::Scalar);
        assert_eq!(report.parallel.backend, crate::select_best_available_backend());
        assert_eq!(report.scalar.ticks, 4096);
        assert_eq!(report.scalar.per_element, 1.0);
        assert_eq!(report.speedup(), Some(1.0));
    }

    #[test]
    fn test_run_benchmark_empty_buffers() {
        let config = BenchConfig::new().with_len(0);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let report = run_benchmark(&config, &StepCounter::new(1), &mut rng).unwrap();

        assert!(report.passed());
        assert_eq!(report.scalar.per_element, 0.0);
    }

    #[test]
    fn test_meaningless_counter_has_no_speedup() {
        let config = BenchConfig::new().with_len(64);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let report = run_benchmark(&config, &ZeroCounter, &mut rng).unwrap();

        assert!(report.passed());
        assert!(!report.counter_meaningful);
        assert_eq!(report.speedup(), None);
    }

    /// Scalar result with the low bit flipped, so every element is off by one
    unsafe fn off_by_one(a: &[i16], b: &[i16], alpha: i16, y: &mut [i16]) {
        for i in 0..y.len() {
            y[i] = crate::widening_saturating_mac(a[i], b[i], alpha) ^ 1;
        }
    }

    #[test]
    fn test_divergent_kernel_fails_but_completes() {
        let config = BenchConfig::new().with_len(1000).with_backend(Backend::Scalar);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let kernel = unsafe { AxpyKernel::from_raw(Backend::Scalar, 1, off_by_one) };

        let report = run_benchmark_with(&config, kernel, &StepCounter::new(10), &mut rng).unwrap();

        assert!(!report.passed());
        assert!(!report.comparison.exact_match);
        assert_eq!(report.comparison.max_abs_diff, 1);
        assert_eq!(report.comparison.mismatches, 1000);
        assert_eq!(report.comparison.first_mismatch, Some(0));

        // the run still finished every phase
        assert_eq!(report.scalar.ticks, 10);
        assert_eq!(report.parallel.ticks, 10);
        assert_eq!(report.edge_cases.outcomes.len(), 4);
        assert!(!report.edge_cases.passed());
    }

    #[test]
    fn test_run_benchmark_with_reports_kernel_backend() {
        let config = BenchConfig::new().with_len(100).with_backend(Backend::NEON);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let report = run_benchmark_with(&config, AxpyKernel::scalar(), &ZeroCounter, &mut rng).unwrap();

        assert!(report.passed());
        assert_eq!(report.parallel.backend, Backend::Scalar);
    }

    #[cfg(not(target_arch = "aarch64"))]
    #[test]
    fn test_unsupported_backend_is_error() {
        let config = BenchConfig::new().with_backend(Backend::NEON);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        assert_eq!(
            run_benchmark(&config, &ZeroCounter, &mut rng).unwrap_err(),
            Q15Error::UnsupportedBackend(Backend::NEON)
        );
    }
}
