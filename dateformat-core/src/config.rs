// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML benchmark configuration with strict validation.
//!
//! Replaces per-benchmark annotations with one explicit description of the
//! sweep. Any out-of-range field is rejected before a measurement starts.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigValidationError, DateFormatError, DateFormatResult};
use crate::strategy::Strategy;
use crate::types::{Instant, Pattern, MONTH_YEAR};

/// Upper bound on worker threads per measurement.
const MAX_THREADS: usize = 256;

/// Unit used when reporting average time per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Nanoseconds,
    #[default]
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Convert a nanosecond quantity into this unit.
    pub fn convert(&self, ns: f64) -> f64 {
        match self {
            TimeUnit::Nanoseconds => ns,
            TimeUnit::Microseconds => ns / 1_000.0,
            TimeUnit::Milliseconds => ns / 1_000_000.0,
            TimeUnit::Seconds => ns / 1_000_000_000.0,
        }
    }

    /// Short unit suffix for display.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "μs",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }
}

/// Raw sweep settings as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    #[serde(default = "default_thread_counts")]
    thread_counts: Vec<usize>,
    #[serde(default = "default_iterations")]
    warmup_iterations: u64,
    #[serde(default = "default_iterations")]
    measurement_iterations: u64,
    #[serde(default = "default_fork_count")]
    fork_count: u32,
    #[serde(default = "default_batch_size")]
    batch_size: u64,
    #[serde(default)]
    time_unit: TimeUnit,
    #[serde(default)]
    pin_workers: bool,
}

fn default_thread_counts() -> Vec<usize> {
    vec![1, 2, 4, 8]
}

fn default_iterations() -> u64 {
    5
}

fn default_fork_count() -> u32 {
    5
}

fn default_batch_size() -> u64 {
    10_000
}

impl Default for RawBenchConfig {
    fn default() -> Self {
        Self {
            thread_counts: default_thread_counts(),
            warmup_iterations: default_iterations(),
            measurement_iterations: default_iterations(),
            fork_count: default_fork_count(),
            batch_size: default_batch_size(),
            time_unit: TimeUnit::default(),
            pin_workers: false,
        }
    }
}

/// Raw formatting input settings.
#[derive(Debug, Deserialize)]
struct RawFormatConfig {
    #[serde(default = "default_pattern")]
    pattern: String,
    /// RFC 3339; omitted means "process start time".
    #[serde(default)]
    instant: Option<String>,
}

fn default_pattern() -> String {
    MONTH_YEAR.to_string()
}

impl Default for RawFormatConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            instant: None,
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    benchmark: RawBenchConfig,
    #[serde(default)]
    format: RawFormatConfig,
    #[serde(default = "default_strategies")]
    strategies: Vec<Strategy>,
}

fn default_strategies() -> Vec<Strategy> {
    Strategy::ALL.to_vec()
}

/// Validated sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub thread_counts: Vec<usize>,
    pub warmup_iterations: u64,
    pub measurement_iterations: u64,
    pub fork_count: u32,
    /// Format calls timed together to produce one sample.
    pub batch_size: u64,
    pub time_unit: TimeUnit,
    pub pin_workers: bool,
}

impl BenchConfig {
    /// Settings for a fast smoke run.
    pub fn quick() -> Self {
        Self {
            thread_counts: default_thread_counts(),
            warmup_iterations: 1,
            measurement_iterations: 2,
            fork_count: 1,
            batch_size: 1_000,
            time_unit: TimeUnit::default(),
            pin_workers: false,
        }
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.thread_counts.is_empty() {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "thread_counts",
                value: "[]".to_string(),
                reason: "At least one thread count is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for &threads in &self.thread_counts {
            if threads == 0 || threads > MAX_THREADS {
                return Err(ConfigValidationError::InvalidFieldValue {
                    field: "thread_counts",
                    value: threads.to_string(),
                    reason: format!("Must be between 1 and {}", MAX_THREADS),
                });
            }
            if !seen.insert(threads) {
                return Err(ConfigValidationError::InvalidFieldValue {
                    field: "thread_counts",
                    value: threads.to_string(),
                    reason: "Thread count listed more than once".to_string(),
                });
            }
        }

        if self.measurement_iterations == 0 {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "measurement_iterations",
                value: "0".to_string(),
                reason: "At least one measurement iteration is required".to_string(),
            });
        }

        if self.fork_count == 0 {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "fork_count",
                value: "0".to_string(),
                reason: "At least one fork is required".to_string(),
            });
        }

        if self.batch_size == 0 {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "batch_size",
                value: "0".to_string(),
                reason: "Batch size must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        let raw = RawBenchConfig::default();
        Self {
            thread_counts: raw.thread_counts,
            warmup_iterations: raw.warmup_iterations,
            measurement_iterations: raw.measurement_iterations,
            fork_count: raw.fork_count,
            batch_size: raw.batch_size,
            time_unit: raw.time_unit,
            pin_workers: raw.pin_workers,
        }
    }
}

/// Validated formatting input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    pub pattern: Pattern,
    pub instant: Instant,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            pattern: Pattern::month_year(),
            instant: Instant::now(),
        }
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchSuiteConfig {
    pub benchmark: BenchConfig,
    pub format: FormatConfig,
    pub strategies: Vec<Strategy>,
}

impl Default for BenchSuiteConfig {
    fn default() -> Self {
        Self {
            benchmark: BenchConfig::default(),
            format: FormatConfig::default(),
            strategies: default_strategies(),
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> DateFormatResult<BenchSuiteConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DateFormatError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DateFormatError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> DateFormatResult<BenchSuiteConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| DateFormatError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> DateFormatResult<BenchSuiteConfig> {
        let benchmark = BenchConfig {
            thread_counts: raw.benchmark.thread_counts,
            warmup_iterations: raw.benchmark.warmup_iterations,
            measurement_iterations: raw.benchmark.measurement_iterations,
            fork_count: raw.benchmark.fork_count,
            batch_size: raw.benchmark.batch_size,
            time_unit: raw.benchmark.time_unit,
            pin_workers: raw.benchmark.pin_workers,
        };
        benchmark.validate()?;

        let pattern = Pattern::new(raw.format.pattern)?;
        let instant = match raw.format.instant {
            Some(value) => Instant::parse_rfc3339(&value)?,
            None => Instant::now(),
        };

        if raw.strategies.is_empty() {
            return Err(ConfigValidationError::InvalidFieldValue {
                field: "strategies",
                value: "[]".to_string(),
                reason: "At least one strategy is required".to_string(),
            }
            .into());
        }

        let mut strategies = raw.strategies;
        strategies.sort();
        strategies.dedup();

        Ok(BenchSuiteConfig {
            benchmark,
            format: FormatConfig { pattern, instant },
            strategies,
        })
    }
}
