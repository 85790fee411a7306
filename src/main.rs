//! trueno-q15 CLI
//!
//! Runs the edge-case battery, times the scalar reference against the best
//! (or requested) SIMD backend, and verifies the outputs are bit-identical.
//! Exits non-zero on any mismatch or fatal error.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trueno_q15::bench::{DEFAULT_ALPHA, DEFAULT_LEN, DEFAULT_SEED};
use trueno_q15::output::{self, OutputFormat};
use trueno_q15::{
    checked_len, run_benchmark_with, AxpyKernel, Backend, BenchConfig, CycleCounter,
    InstantCounter, PlatformCounter,
};

#[derive(Parser)]
#[command(name = "trueno-q15")]
#[command(author, version, about = "Saturating Q15 AXPY: SIMD vs scalar equivalence and timing")]
struct Cli {
    /// Elements per input buffer
    #[arg(short = 'n', long, env = "Q15_LEN", default_value_t = DEFAULT_LEN as i64, allow_negative_numbers = true)]
    len: i64,

    /// Seed for the input generator
    #[arg(short, long, env = "Q15_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Scale factor applied to b
    #[arg(short, long, env = "Q15_ALPHA", default_value_t = DEFAULT_ALPHA, allow_negative_numbers = true)]
    alpha: i16,

    /// Backend for the data-parallel kernel (scalar, sse2, avx2, avx512, neon, auto)
    #[arg(short, long, env = "Q15_BACKEND", default_value = "auto")]
    backend: Backend,

    /// Tick source for timing
    #[arg(long, env = "Q15_COUNTER", value_enum, default_value_t = CounterKind::Platform)]
    counter: CounterKind,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CounterKind {
    /// Hardware tick register (rdtsc / cntvct_el0 / rdcycle)
    Platform,
    /// OS monotonic clock, nanoseconds
    Instant,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trueno_q15=info")))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run one benchmark and print the report; `Ok(false)` means a verification failure
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = bench_config(&cli)?;
    let kernel = AxpyKernel::for_backend(config.backend)
        .with_context(|| format!("cannot bind backend {}", config.backend))?;
    run_with_kernel(&cli, &config, kernel)
}

fn bench_config(cli: &Cli) -> anyhow::Result<BenchConfig> {
    Ok(BenchConfig::new()
        .with_len(checked_len(cli.len)?)
        .with_seed(cli.seed)
        .with_alpha(cli.alpha)
        .with_backend(cli.backend)
        .build())
}

fn run_with_kernel(cli: &Cli, config: &BenchConfig, kernel: AxpyKernel) -> anyhow::Result<bool> {
    let counter: Box<dyn CycleCounter> = match cli.counter {
        CounterKind::Platform => Box::new(PlatformCounter),
        CounterKind::Instant => Box::new(InstantCounter::new()),
    };
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let report = run_benchmark_with(config, kernel, counter.as_ref(), &mut rng)
        .with_context(|| format!("benchmark run failed (N={}, backend={})", config.len, kernel.backend()))?;

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print!("{}", output::format_report(&report, format)?);

    Ok(report.passed())
}
