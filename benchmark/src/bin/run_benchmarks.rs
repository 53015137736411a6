// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the strategy sweep and generate reports.

use clap::Parser;
use dateformat_benchmark::{BenchmarkReport, JsonReporter, LatencyMetrics, Sweep, ThroughputMetrics};
use dateformat_core::{BenchConfig, BenchSuiteConfig, ConfigLoader, Strategy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Benchmark date formatter sharing strategies and generate JSON reports")]
struct Args {
    /// YAML configuration file (built-in defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for benchmark data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Thread counts to sweep, comma separated
    #[arg(short, long, value_delimiter = ',')]
    threads: Option<Vec<usize>>,

    /// Strategies to run (all configured strategies if not specified)
    #[arg(short, long)]
    strategy: Option<Vec<Strategy>>,

    /// Measurement iterations per fork
    #[arg(short, long)]
    iterations: Option<u64>,

    /// Independent repetitions per measurement
    #[arg(short, long)]
    forks: Option<u32>,

    /// Run in quick mode (fewer iterations, one fork)
    #[arg(long)]
    quick: bool,

    /// Omit raw per-batch samples from the report
    #[arg(long)]
    no_raw_samples: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let config = build_config(&args)?;

    println!("Dateformat Benchmark Suite");
    println!("==========================");
    println!("Output directory: {:?}", args.output);
    println!("Pattern: {}", config.format.pattern);
    println!("Instant: {}", config.format.instant);
    println!("Thread counts: {:?}", config.benchmark.thread_counts);
    println!(
        "Forks: {}, warmup: {}, measurement: {}, batch: {}",
        config.benchmark.fork_count,
        config.benchmark.warmup_iterations,
        config.benchmark.measurement_iterations,
        config.benchmark.batch_size
    );
    println!();

    let reporter = JsonReporter::new(&args.output)?;
    let report = Sweep::new(&config)
        .keep_raw_samples(!args.no_raw_samples)
        .run();

    let path = reporter.save(&report)?;
    println!();
    println!("Benchmark report saved to: {:?}", path);
    println!();

    print_summary(&report);

    Ok(())
}

/// Merge the configuration file (or defaults) with command-line overrides.
fn build_config(args: &Args) -> anyhow::Result<BenchSuiteConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => BenchSuiteConfig::default(),
    };

    if args.quick {
        config.benchmark = BenchConfig {
            thread_counts: config.benchmark.thread_counts.clone(),
            time_unit: config.benchmark.time_unit,
            pin_workers: config.benchmark.pin_workers,
            ..BenchConfig::quick()
        };
    }
    if let Some(threads) = &args.threads {
        config.benchmark.thread_counts = threads.clone();
    }
    if let Some(iterations) = args.iterations {
        config.benchmark.measurement_iterations = iterations;
    }
    if let Some(forks) = args.forks {
        config.benchmark.fork_count = forks;
    }
    if let Some(strategies) = &args.strategy {
        let mut strategies = strategies.clone();
        strategies.sort();
        strategies.dedup();
        config.strategies = strategies;
    }

    config.benchmark.validate()?;
    Ok(config)
}

fn print_summary(report: &BenchmarkReport) {
    let unit = report.config.benchmark.time_unit;

    println!("Summary (average time per call)");
    println!("-------------------------------");
    println!();
    println!(
        "{:<20} {:>7} {:>14} {:>12} {:>16}",
        "strategy",
        "threads",
        format!("avg ({})", unit.suffix()),
        "p99",
        "throughput"
    );

    for result in &report.results {
        let throughput = result
            .throughput
            .as_ref()
            .map(|t| ThroughputMetrics::format_calls_per_sec(t.calls_per_sec))
            .unwrap_or_default();
        println!(
            "{:<20} {:>7} {:>14.4} {:>12} {:>16}",
            result.strategy.as_str(),
            result.threads,
            result.latency.mean_in(unit),
            LatencyMetrics::format_latency(result.latency.p99_ns),
            throughput
        );
    }
}
