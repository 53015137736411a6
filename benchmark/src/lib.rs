// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Dateformat Benchmarking Framework
//!
//! Measures the average per-call latency of each formatter sharing strategy
//! at several worker-thread counts.
//!
//! # Sweep
//!
//! For every strategy × thread count, `fork_count` independent repetitions
//! are run, each with freshly built formatter state. Each repetition warms up,
//! then records one sample per worker per measurement iteration.
//!
//! # Data Output
//!
//! Runs are written as JSON files with standardized metrics for visualization.

pub mod affinity;
pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod sweep;

pub use harness::BenchmarkHarness;
pub use metrics::{BenchmarkReport, BenchmarkResult, LatencyMetrics, SystemInfo, ThroughputMetrics};
pub use reporter::{JsonReporter, ReporterError};
pub use sweep::Sweep;
