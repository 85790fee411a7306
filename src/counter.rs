//! Monotonic cycle counters for timing kernels
//!
//! The benchmark driver samples a counter immediately before and after each
//! kernel call. [`PlatformCounter`] reads the hardware tick register where one
//! is exposed to user space and returns `0` elsewhere, in which case derived
//! throughput numbers are meaningless. [`InstantCounter`] uses the OS
//! monotonic clock instead and reports nanoseconds.

use std::time::Instant;

/// A monotonic tick source
pub trait CycleCounter {
    /// Current tick value; non-decreasing between two reads in one timed region
    fn now(&self) -> u64;

    /// Unit of one tick, for reports
    fn unit(&self) -> &'static str {
        "cycles"
    }

    /// False when `now` is a constant and timings carry no information
    fn is_meaningful(&self) -> bool {
        true
    }
}

/// Hardware tick register of the current platform
///
/// - x86_64: `rdtsc`
/// - AArch64: `cntvct_el0` (virtual counter, fixed frequency)
/// - RISC-V 64: `rdcycle`
/// - anything else: always `0`
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformCounter;

impl CycleCounter for PlatformCounter {
    #[inline(always)]
    fn now(&self) -> u64 {
        read_ticks()
    }

    fn is_meaningful(&self) -> bool {
        cfg!(any(
            target_arch = "x86_64",
            target_arch = "aarch64",
            target_arch = "riscv64"
        ))
    }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_ticks() -> u64 {
    // SAFETY: rdtsc has no preconditions on x86_64
    unsafe { std::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_ticks() -> u64 {
    let ticks: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on all mainstream AArch64 kernels
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) ticks, options(nomem, nostack, preserves_flags));
    }
    ticks
}

#[cfg(target_arch = "riscv64")]
#[inline(always)]
fn read_ticks() -> u64 {
    let ticks: u64;
    // SAFETY: reads the user-mode cycle CSR; no memory is touched
    unsafe {
        std::arch::asm!("rdcycle {}", out(reg) ticks, options(nomem, nostack, preserves_flags));
    }
    ticks
}

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64"
)))]
#[inline(always)]
fn read_ticks() -> u64 {
    0
}

/// Nanoseconds since construction, from [`std::time::Instant`]
#[derive(Debug, Clone, Copy)]
pub struct InstantCounter {
    origin: Instant,
}

impl InstantCounter {
    /// Start a new counter at zero
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleCounter for InstantCounter {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn unit(&self) -> &'static str {
        "ns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_counter_monotonic() {
        let counter = InstantCounter::new();
        let t0 = counter.now();
        let t1 = counter.now();
        assert!(t1 >= t0);
        assert_eq!(counter.unit(), "ns");
        assert!(counter.is_meaningful());
    }

    #[test]
    fn test_platform_counter_non_decreasing() {
        let counter = PlatformCounter;
        let t0 = counter.now();
        let t1 = counter.now();
        assert!(t1 >= t0);
        assert_eq!(counter.unit(), "cycles");
    }

    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )))]
    #[test]
    fn test_platform_counter_constant_without_hardware() {
        assert_eq!(PlatformCounter.now(), 0);
        assert!(!PlatformCounter.is_meaningful());
    }
}
