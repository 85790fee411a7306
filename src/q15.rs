//! Q15 fixed-point primitives
//!
//! A Q15 sample is a signed 16-bit integer in `[-32768, 32767]`. Arithmetic on
//! samples is carried out in an `i32` accumulator and clamped back into range
//! by [`saturate_q15`], which is the only place outputs are bounded.
//!
//! The worst-case accumulator for `a + alpha * b` is
//! `32767 + (-32768 * -32768) = 1_073_774_591`, comfortably inside `i32`.

/// Largest representable Q15 sample
pub const Q15_MAX: i16 = i16::MAX;

/// Smallest representable Q15 sample
pub const Q15_MIN: i16 = i16::MIN;

/// Clamp a wide accumulator into the Q15 range
///
/// Values above `32767` become `32767`, values below `-32768` become
/// `-32768`, everything else narrows losslessly. Total over all of `i32`.
///
/// # Examples
///
/// ```
/// use trueno_q15::saturate_q15;
///
/// assert_eq!(saturate_q15(32768), 32767);
/// assert_eq!(saturate_q15(-32769), -32768);
/// assert_eq!(saturate_q15(1100), 1100);
/// ```
#[inline(always)]
pub fn saturate_q15(v: i32) -> i16 {
    if v > Q15_MAX as i32 {
        Q15_MAX
    } else if v < Q15_MIN as i32 {
        Q15_MIN
    } else {
        v as i16
    }
}

/// Widening saturating multiply-accumulate: `saturate(a + alpha * b)`
///
/// This is the per-lane operation every backend implements. Targets with a
/// fused instruction use it; everywhere else it decomposes into
///
/// 1. widen `a`, `b` and `alpha` to `i32`
/// 2. multiply `alpha * b`
/// 3. add the widened `a`
/// 4. saturate back to `i16` (no shift, so no rounding step)
///
/// # Examples
///
/// ```
/// use trueno_q15::widening_saturating_mac;
///
/// assert_eq!(widening_saturating_mac(100, 200, 5), 1100);
/// assert_eq!(widening_saturating_mac(0, 32767, 32767), 32767);
/// ```
#[inline(always)]
pub fn widening_saturating_mac(a: i16, b: i16, alpha: i16) -> i16 {
    let acc = a as i32 + alpha as i32 * b as i32;
    saturate_q15(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturate_in_range() {
        assert_eq!(saturate_q15(0), 0);
        assert_eq!(saturate_q15(32767), 32767);
        assert_eq!(saturate_q15(-32768), -32768);
        assert_eq!(saturate_q15(-1), -1);
    }

    #[test]
    fn test_saturate_clamps_high() {
        assert_eq!(saturate_q15(32768), Q15_MAX);
        assert_eq!(saturate_q15(1 << 30), Q15_MAX);
        assert_eq!(saturate_q15(i32::MAX), Q15_MAX);
    }

    #[test]
    fn test_saturate_clamps_low() {
        assert_eq!(saturate_q15(-32769), Q15_MIN);
        assert_eq!(saturate_q15(-(1 << 30)), Q15_MIN);
        assert_eq!(saturate_q15(i32::MIN), Q15_MIN);
    }

    #[test]
    fn test_mac_extreme_accumulators() {
        // -32768 * -32768 = 2^30, the largest product magnitude
        assert_eq!(widening_saturating_mac(32767, -32768, -32768), Q15_MAX);
        assert_eq!(widening_saturating_mac(-32768, -32768, 32767), Q15_MIN);
        assert_eq!(widening_saturating_mac(-32768, 32767, 32767), Q15_MAX);
    }

    #[test]
    fn test_mac_zero_alpha_is_identity() {
        for a in [Q15_MIN, -1, 0, 1, Q15_MAX] {
            assert_eq!(widening_saturating_mac(a, Q15_MIN, 0), a);
        }
    }
}
