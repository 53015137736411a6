// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Standardized metrics types for benchmark results.
//!
//! This module defines the data structures used to capture and serialize
//! per-strategy, per-thread-count measurements.

use chrono::{DateTime, Utc};
use dateformat_core::{BenchSuiteConfig, Strategy, TimeUnit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::System;
use uuid::Uuid;

/// Latency metrics with statistical analysis.
///
/// Samples are average nanoseconds per call over one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// Minimum observed latency in nanoseconds
    pub min_ns: u64,
    /// Maximum observed latency in nanoseconds
    pub max_ns: u64,
    /// Arithmetic mean latency in nanoseconds
    pub mean_ns: f64,
    /// Median (p50) latency in nanoseconds
    pub median_ns: u64,
    /// 95th percentile latency in nanoseconds
    pub p95_ns: u64,
    /// 99th percentile latency in nanoseconds
    pub p99_ns: u64,
    /// Standard deviation in nanoseconds
    pub std_dev_ns: f64,
    /// Raw sample data for visualization (optional, may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<u64>>,
}

impl LatencyMetrics {
    /// Calculate metrics from a vector of latency samples (in nanoseconds).
    pub fn from_samples(mut samples: Vec<u64>, keep_raw: bool) -> Self {
        if samples.is_empty() {
            return Self {
                min_ns: 0,
                max_ns: 0,
                mean_ns: 0.0,
                median_ns: 0,
                p95_ns: 0,
                p99_ns: 0,
                std_dev_ns: 0.0,
                samples: None,
            };
        }

        samples.sort_unstable();
        let len = samples.len();

        let min_ns = samples[0];
        let max_ns = samples[len - 1];
        let sum: u64 = samples.iter().sum();
        let mean_ns = sum as f64 / len as f64;
        let median_ns = samples[len / 2];
        let p95_ns = samples[((len as f64 * 0.95) as usize).min(len - 1)];
        let p99_ns = samples[((len as f64 * 0.99) as usize).min(len - 1)];

        let variance: f64 = samples
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean_ns;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;
        let std_dev_ns = variance.sqrt();

        // Optionally keep raw samples (truncate if too large for visualization)
        let raw_samples = if keep_raw {
            if len > 10000 {
                Some(samples.iter().step_by(len / 1000).copied().collect())
            } else {
                Some(samples)
            }
        } else {
            None
        };

        Self {
            min_ns,
            max_ns,
            mean_ns,
            median_ns,
            p95_ns,
            p99_ns,
            std_dev_ns,
            samples: raw_samples,
        }
    }

    /// Mean latency expressed in `unit`.
    pub fn mean_in(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.mean_ns)
    }

    /// Format latency in human-readable form (auto-selects ns/μs/ms).
    pub fn format_latency(ns: u64) -> String {
        if ns < 1_000 {
            format!("{}ns", ns)
        } else if ns < 1_000_000 {
            format!("{:.2}μs", ns as f64 / 1_000.0)
        } else if ns < 1_000_000_000 {
            format!("{:.2}ms", ns as f64 / 1_000_000.0)
        } else {
            format!("{:.2}s", ns as f64 / 1_000_000_000.0)
        }
    }
}

/// Aggregate call throughput across all workers of a measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputMetrics {
    /// Format calls completed per second, summed over workers
    pub calls_per_sec: f64,
    /// Total measured format calls
    pub total_calls: u64,
}

impl ThroughputMetrics {
    /// Derive throughput from the mean per-call latency of `threads` workers.
    pub fn from_mean(mean_ns: f64, threads: usize, total_calls: u64) -> Self {
        let calls_per_sec = if mean_ns > 0.0 {
            threads as f64 * 1_000_000_000.0 / mean_ns
        } else {
            0.0
        };
        Self {
            calls_per_sec,
            total_calls,
        }
    }

    /// Format throughput in human-readable form.
    pub fn format_calls_per_sec(cps: f64) -> String {
        if cps < 1_000.0 {
            format!("{:.2} ops/s", cps)
        } else if cps < 1_000_000.0 {
            format!("{:.2} Kops/s", cps / 1_000.0)
        } else {
            format!("{:.2} Mops/s", cps / 1_000_000.0)
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Result of one strategy at one thread count, folded over all forks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Name of the benchmark, e.g. `locked_4`
    pub name: String,
    /// Sharing strategy measured
    pub strategy: Strategy,
    /// Concurrent worker threads
    pub threads: usize,
    /// Latency metrics
    pub latency: LatencyMetrics,
    /// Throughput metrics (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput: Option<ThroughputMetrics>,
    /// Number of samples
    pub iterations: u64,
    /// Additional metadata specific to this benchmark
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl BenchmarkResult {
    /// Create a new latency-focused benchmark result.
    pub fn latency(
        strategy: Strategy,
        threads: usize,
        samples: Vec<u64>,
        keep_raw_samples: bool,
    ) -> Self {
        let iterations = samples.len() as u64;
        Self {
            name: format!("{}_{}", strategy, threads),
            strategy,
            threads,
            latency: LatencyMetrics::from_samples(samples, keep_raw_samples),
            throughput: None,
            iterations,
            metadata: HashMap::new(),
        }
    }

    /// Attach throughput derived from the mean latency.
    pub fn with_throughput(mut self, calls_per_sample: u64) -> Self {
        self.throughput = Some(ThroughputMetrics::from_mean(
            self.latency.mean_ns,
            self.threads,
            self.iterations * calls_per_sample,
        ));
        self
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.metadata.insert(key.into(), value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping unserializable metadata"),
        }
        self
    }
}

/// Complete benchmark suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Configuration the run used
    pub config: BenchSuiteConfig,
    /// Individual benchmark results
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Create a new, empty report for `config`.
    pub fn new(config: BenchSuiteConfig) -> Self {
        Self {
            benchmark_suite: "dateformat-benchmarks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            config,
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Look up the result for one strategy and thread count.
    pub fn result(&self, strategy: Strategy, threads: usize) -> Option<&BenchmarkResult> {
        self.results
            .iter()
            .find(|r| r.strategy == strategy && r.threads == threads)
    }
}
