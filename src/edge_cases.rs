//! Fixed edge-case battery
//!
//! Single-element inputs that exercise overflow, underflow, the largest
//! product and a no-saturation baseline. Every case runs through both the
//! scalar reference and the kernel under test, and both must produce the
//! expected value exactly.

use serde::Serialize;

use crate::kernel::AxpyKernel;
use crate::Result;

/// One single-element AXPY with its known answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeCase {
    /// Short label used in reports
    pub name: &'static str,
    /// Addend
    pub a: i16,
    /// Multiplicand
    pub b: i16,
    /// Scale factor
    pub alpha: i16,
    /// Required output
    pub expected: i16,
}

/// The battery, in report order
pub const EDGE_CASES: [EdgeCase; 4] = [
    // 32767 + 1 saturates high
    EdgeCase {
        name: "Overflow",
        a: 32767,
        b: 1,
        alpha: 1,
        expected: 32767,
    },
    // -32768 - 1 saturates low
    EdgeCase {
        name: "Underflow",
        a: -32768,
        b: 1,
        alpha: -1,
        expected: -32768,
    },
    // 32767 * 32767 is ~2^30
    EdgeCase {
        name: "Big positive",
        a: 0,
        b: 32767,
        alpha: 32767,
        expected: 32767,
    },
    EdgeCase {
        name: "Normal case",
        a: 100,
        b: 200,
        alpha: 5,
        expected: 1100,
    },
];

/// Observed results for one edge case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeCaseOutcome {
    /// The case that was run
    pub case: EdgeCase,
    /// Scalar reference output
    pub scalar: i16,
    /// Output of the kernel under test
    pub parallel: i16,
}

impl EdgeCaseOutcome {
    /// Both kernels produced the expected value
    pub fn passed(&self) -> bool {
        self.scalar == self.case.expected && self.parallel == self.case.expected
    }
}

/// Outcomes for the whole battery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeCaseReport {
    /// Outcomes in [`EDGE_CASES`] order
    pub outcomes: Vec<EdgeCaseOutcome>,
}

impl EdgeCaseReport {
    /// Every case passed for both kernels
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(EdgeCaseOutcome::passed)
    }
}

/// Run one case through the scalar reference and `kernel`
pub fn run_edge_case(case: &EdgeCase, kernel: &AxpyKernel) -> Result<EdgeCaseOutcome> {
    let mut scalar = [0i16; 1];
    let mut parallel = [0i16; 1];

    AxpyKernel::scalar().axpy(&[case.a], &[case.b], 1, case.alpha, &mut scalar)?;
    kernel.axpy(&[case.a], &[case.b], 1, case.alpha, &mut parallel)?;

    Ok(EdgeCaseOutcome {
        case: *case,
        scalar: scalar[0],
        parallel: parallel[0],
    })
}

/// Run the full battery against `kernel`
///
/// # Examples
///
/// ```
/// use trueno_q15::{run_edge_cases, AxpyKernel};
///
/// let report = run_edge_cases(&AxpyKernel::detect()).unwrap();
/// assert!(report.passed());
/// assert_eq!(report.outcomes.len(), 4);
/// ```
pub fn run_edge_cases(kernel: &AxpyKernel) -> Result<EdgeCaseReport> {
    let outcomes = EDGE_CASES
        .iter()
        .map(|case| run_edge_case(case, kernel))
        .collect::<Result<Vec<_>>>()?;

    for outcome in outcomes.iter().filter(|o| !o.passed()) {
        tracing::warn!(
            case = outcome.case.name,
            expected = outcome.case.expected,
            scalar = outcome.scalar,
            parallel = outcome.parallel,
            backend = %kernel.backend(),
            "edge case failed"
        );
    }

    Ok(EdgeCaseReport { outcomes })
}
