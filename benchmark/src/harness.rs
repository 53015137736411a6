// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness for running and timing operations.
//!
//! Each sample is the average latency of one call over a batch of calls,
//! the same "average time" figure annotation-driven JVM harnesses report.

use std::hint::black_box;
use std::sync::Barrier;
use std::thread;
use std::time::{Duration, Instant};

use dateformat_core::BenchConfig;

use crate::affinity::CpuAllocator;

/// A benchmark harness for measuring per-call latency across worker threads.
pub struct BenchmarkHarness {
    /// Number of warmup iterations before measurement
    warmup_iterations: u64,
    /// Number of measurement iterations
    measurement_iterations: u64,
    /// Calls timed together to produce one sample
    batch_size: u64,
    /// Whether to pin each worker to its own CPU
    pin_workers: bool,
    /// Whether to keep raw sample data
    keep_raw_samples: bool,
}

impl BenchmarkHarness {
    /// Create a new benchmark harness with default settings.
    pub fn new() -> Self {
        Self {
            warmup_iterations: 5,
            measurement_iterations: 5,
            batch_size: 10_000,
            pin_workers: false,
            keep_raw_samples: true,
        }
    }

    /// Create a harness from validated sweep settings.
    pub fn from_config(config: &BenchConfig) -> Self {
        Self::new()
            .warmup(config.warmup_iterations)
            .iterations(config.measurement_iterations)
            .batch_size(config.batch_size)
            .pin_workers(config.pin_workers)
    }

    /// Set the number of warmup iterations.
    pub fn warmup(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Set the number of measurement iterations.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    /// Set the number of calls per sample. Zero is treated as one.
    pub fn batch_size(mut self, calls: u64) -> Self {
        self.batch_size = calls.max(1);
        self
    }

    /// Set whether workers are pinned to CPUs.
    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.pin_workers = pin;
        self
    }

    /// Set whether to keep raw sample data.
    pub fn keep_samples(mut self, keep: bool) -> Self {
        self.keep_raw_samples = keep;
        self
    }

    /// Run a benchmark on `threads` workers and collect latency samples.
    ///
    /// Every worker builds its own state with `make_worker`, waits until all
    /// workers are ready, then runs the warmup and measurement iterations,
    /// calling `operation` `batch_size` times per iteration.
    ///
    /// Returns per-call latency samples in nanoseconds, one per worker per
    /// measurement iteration.
    pub fn run_concurrent<W, T, M, O>(&self, threads: usize, make_worker: M, operation: O) -> Vec<u64>
    where
        M: Fn() -> W + Sync,
        O: Fn(&W) -> T + Sync,
    {
        let threads = threads.max(1);
        let barrier = Barrier::new(threads);
        let allocator = self.pin_workers.then(CpuAllocator::new);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|index| {
                    let barrier = &barrier;
                    let allocator = allocator.as_ref();
                    let make_worker = &make_worker;
                    let operation = &operation;

                    scope.spawn(move || {
                        if let Some(allocator) = allocator {
                            if let Err(e) = allocator.pin_current_thread() {
                                tracing::warn!(worker = index, error = %e, "Failed to pin worker");
                            }
                        }

                        let worker = make_worker();
                        barrier.wait();
                        self.run_worker(&worker, operation)
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Warm up, then measure, on the calling thread.
    fn run_worker<W, T, O>(&self, worker: &W, operation: &O) -> Vec<u64>
    where
        O: Fn(&W) -> T,
    {
        // Warmup phase
        for _ in 0..self.warmup_iterations {
            for _ in 0..self.batch_size {
                black_box(operation(worker));
            }
        }

        // Measurement phase
        let mut samples = Vec::with_capacity(self.measurement_iterations as usize);
        for _ in 0..self.measurement_iterations {
            let start = Instant::now();
            for _ in 0..self.batch_size {
                black_box(operation(black_box(worker)));
            }
            let elapsed = start.elapsed();
            samples.push((elapsed.as_nanos() / self.batch_size as u128) as u64);
        }

        samples
    }

    /// Check if raw samples should be kept.
    pub fn should_keep_samples(&self) -> bool {
        self.keep_raw_samples
    }

    /// Calls timed together per sample.
    pub fn calls_per_sample(&self) -> u64 {
        self.batch_size
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Measure the execution time of a closure.
pub fn measure<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    (result, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[test]
    fn test_harness_sample_count() {
        let harness = BenchmarkHarness::new().warmup(1).iterations(4).batch_size(10);

        let samples = harness.run_concurrent(3, || (), |_| 1u32);
        assert_eq!(samples.len(), 12);
    }

    #[test]
    fn test_harness_call_count() {
        let calls = AtomicU64::new(0);
        let harness = BenchmarkHarness::new().warmup(2).iterations(3).batch_size(7);

        harness.run_concurrent(
            2,
            || (),
            |_| calls.fetch_add(1, Ordering::Relaxed),
        );

        // (warmup + measurement) * batch * threads
        assert_eq!(calls.load(Ordering::Relaxed), (2 + 3) * 7 * 2);
    }

    #[test]
    fn test_harness_builds_one_worker_per_thread() {
        let built = AtomicUsize::new(0);
        let harness = BenchmarkHarness::new().warmup(0).iterations(1).batch_size(1);

        harness.run_concurrent(
            4,
            || built.fetch_add(1, Ordering::Relaxed),
            |id| *id,
        );

        assert_eq!(built.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_harness_sample_is_per_call_average() {
        let harness = BenchmarkHarness::new().warmup(0).iterations(2).batch_size(5);

        let samples = harness.run_concurrent(
            1,
            || (),
            |_| thread::sleep(Duration::from_micros(200)),
        );

        assert_eq!(samples.len(), 2);
        for sample in &samples {
            assert!(*sample >= 200_000, "Sample {} < 200μs", sample);
        }
    }

    #[test]
    fn test_zero_batch_size_clamped() {
        let harness = BenchmarkHarness::new().batch_size(0);
        assert_eq!(harness.calls_per_sample(), 1);
    }

    #[test]
    fn test_from_config() {
        let harness = BenchmarkHarness::from_config(&BenchConfig::quick());
        assert_eq!(harness.calls_per_sample(), 1_000);
        assert!(harness.should_keep_samples());
    }

    #[test]
    fn test_keep_samples_toggle() {
        let harness = BenchmarkHarness::new().keep_samples(false);
        assert!(!harness.should_keep_samples());
        assert!(harness.keep_samples(true).should_keep_samples());
    }

    #[test]
    fn test_measure() {
        let (result, duration) = measure(|| {
            thread::sleep(Duration::from_millis(5));
            42
        });

        assert_eq!(result, 42);
        assert!(duration >= Duration::from_millis(5));
    }
}
