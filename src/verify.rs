//! Element-wise equivalence checking between kernel outputs

use serde::Serialize;

use crate::{Q15Error, Result};

/// Outcome of comparing a reference output against a test output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// True only when every compared element is identical
    pub exact_match: bool,
    /// Largest `|reference[i] - test[i]|` over all compared elements
    pub max_abs_diff: i32,
    /// Number of differing elements
    pub mismatches: usize,
    /// Index of the first differing element, if any
    pub first_mismatch: Option<usize>,
}

impl Comparison {
    fn identical() -> Self {
        Self {
            exact_match: true,
            max_abs_diff: 0,
            mismatches: 0,
            first_mismatch: None,
        }
    }
}

/// Compare the first `n` elements of two outputs
///
/// Scans every element even after the first mismatch, so `max_abs_diff` is
/// the true maximum. Differences are taken in `i32`, which holds the full
/// `65535` span of two `i16` values.
///
/// # Errors
///
/// - [`Q15Error::SizeMismatch`] if the outputs differ in length
/// - [`Q15Error::InvalidLength`] if `n` exceeds their length
///
/// # Examples
///
/// ```
/// use trueno_q15::compare;
///
/// let cmp = compare(&[1, 2, 3], &[1, 5, 3], 3).unwrap();
/// assert!(!cmp.exact_match);
/// assert_eq!(cmp.max_abs_diff, 3);
/// ```
pub fn compare(reference: &[i16], test: &[i16], n: usize) -> Result<Comparison> {
    if reference.len() != test.len() {
        return Err(Q15Error::SizeMismatch {
            expected: reference.len(),
            actual: test.len(),
        });
    }
    if n > reference.len() {
        return Err(Q15Error::InvalidLength {
            n: i64::try_from(n).unwrap_or(i64::MAX),
            available: reference.len(),
        });
    }

    let mut result = Comparison::identical();
    for (i, (&r, &t)) in reference[..n].iter().zip(&test[..n]).enumerate() {
        let diff = (r as i32 - t as i32).abs();
        if diff != 0 {
            result.exact_match = false;
            result.mismatches += 1;
            result.first_mismatch.get_or_insert(i);
        }
        result.max_abs_diff = result.max_abs_diff.max(diff);
    }
    Ok(result)
}
