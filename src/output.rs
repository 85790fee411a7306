//! Report formatters for benchmark runs
//!
//! Supports plain text (terminal) and JSON (tooling and CI).

use std::fmt::Write;

use crate::bench::{BenchReport, KernelTiming};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text for terminal
    #[default]
    Text,
    /// JSON for tooling and CI
    Json,
}

fn timing_line(label: &str, timing: &KernelTiming, unit: &str) -> String {
    format!(
        "{:<7} {} {} ({:.2} per element)\n",
        format!("{label}:"),
        timing.ticks,
        unit,
        timing.per_element
    )
}

/// Format a benchmark report as text for terminal
#[must_use]
pub fn format_text(report: &BenchReport) -> String {
    let mut out = String::new();

    out.push_str("Edge case tests:\n");
    for outcome in &report.edge_cases.outcomes {
        let status = if outcome.passed() { "ok" } else { "FAIL" };
        let _ = writeln!(out, "  {}: {}", outcome.case.name, status);
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Benchmark (N={}, alpha={}, backend={}, {} lanes)\n",
        report.config.len, report.config.alpha, report.parallel.backend, report.parallel.lanes
    );

    out.push_str(&timing_line("Scalar", &report.scalar, report.counter_unit));
    out.push_str(&timing_line(
        report.parallel.backend.name(),
        &report.parallel,
        report.counter_unit,
    ));

    match report.speedup() {
        Some(speedup) => {
            let _ = writeln!(out, "Speedup: {speedup:.2}x");
        }
        None if !report.counter_meaningful => {
            out.push_str("Speedup: n/a (no cycle counter on this platform)\n");
        }
        None => out.push_str("Speedup: n/a\n"),
    }

    let verdict = if report.comparison.exact_match { "PASS" } else { "FAIL" };
    let _ = write!(
        out,
        "Verify: {} (max diff = {}",
        verdict, report.comparison.max_abs_diff
    );
    if let Some(index) = report.comparison.first_mismatch {
        let _ = write!(
            out,
            ", {} mismatches, first at index {}",
            report.comparison.mismatches, index
        );
    }
    out.push_str(")\n");

    out
}

/// Format a benchmark report as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_json(report: &BenchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Format a benchmark report in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &BenchReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(report)),
        OutputFormat::Json => format_json(report).map(|json| json + "\n"),
    }
}
