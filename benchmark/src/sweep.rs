// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Strategy × thread-count sweep.
//!
//! Every fork rebuilds the shared formatter state from scratch, so state
//! warmed by one fork never leaks into the next.

use dateformat_core::{
    BenchSuiteConfig, DateFormat, FormatInput, ImmutableFormatter, SharedFormatter, Strategy,
};

use crate::harness::{measure, BenchmarkHarness};
use crate::metrics::{BenchmarkReport, BenchmarkResult, LatencyMetrics};

/// Runs the configured sweep and folds samples into results.
pub struct Sweep<'a> {
    config: &'a BenchSuiteConfig,
    harness: BenchmarkHarness,
    input: FormatInput,
}

impl<'a> Sweep<'a> {
    /// Prepare a sweep over `config`.
    pub fn new(config: &'a BenchSuiteConfig) -> Self {
        Self {
            config,
            harness: BenchmarkHarness::from_config(&config.benchmark),
            input: FormatInput::new(config.format.instant),
        }
    }

    /// Set whether results carry the raw per-batch samples.
    pub fn keep_raw_samples(self, keep: bool) -> Self {
        Self {
            harness: self.harness.keep_samples(keep),
            ..self
        }
    }

    /// Run every configured strategy at every configured thread count.
    pub fn run(&self) -> BenchmarkReport {
        let mut report = BenchmarkReport::new(self.config.clone());

        tracing::info!(
            strategies = self.config.strategies.len(),
            thread_counts = ?self.config.benchmark.thread_counts,
            forks = self.config.benchmark.fork_count,
            "Starting sweep"
        );

        for &strategy in &self.config.strategies {
            for &threads in &self.config.benchmark.thread_counts {
                report.add_result(self.run_one(strategy, threads));
            }
        }

        report
    }

    /// Measure one strategy at one thread count, across all forks.
    pub fn run_one(&self, strategy: Strategy, threads: usize) -> BenchmarkResult {
        let expected = ImmutableFormatter::new(self.config.format.pattern.clone())
            .format(self.input.instant());
        let mut samples = Vec::new();

        let (_, elapsed) = measure(|| {
            for fork in 0..self.config.benchmark.fork_count {
                let shared = SharedFormatter::new(strategy, &self.config.format.pattern);

                let check = shared.worker().format_input(&self.input);
                if check != expected {
                    tracing::warn!(
                        strategy = %strategy,
                        expected = %expected,
                        actual = %check,
                        "Formatter output differs from reference"
                    );
                }

                let fork_samples = self.harness.run_concurrent(
                    threads,
                    || shared.worker(),
                    |worker| worker.format_input(&self.input),
                );
                tracing::debug!(
                    strategy = %strategy,
                    threads = threads,
                    fork = fork,
                    samples = fork_samples.len(),
                    "Fork complete"
                );
                samples.extend(fork_samples);
            }
        });

        let result = BenchmarkResult::latency(
            strategy,
            threads,
            samples,
            self.harness.should_keep_samples(),
        )
        .with_throughput(self.harness.calls_per_sample())
        .with_metadata("forks", self.config.benchmark.fork_count)
        .with_metadata("batch_size", self.harness.calls_per_sample())
        .with_metadata("pattern", self.config.format.pattern.as_str())
        .with_metadata("shares_handle", strategy.shares_handle());

        tracing::info!(
            name = %result.name,
            mean = %LatencyMetrics::format_latency(result.latency.mean_ns as u64),
            wall_ms = elapsed.as_millis() as u64,
            "Measurement complete"
        );

        result
    }
}
