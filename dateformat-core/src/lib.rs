// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Dateformat Core Library
//!
//! Formatter handles and the four strategies for sharing them across
//! concurrent callers: unsynchronized (thread-confined), locked, lazily
//! cached per worker, and immutable. Also hosts the benchmark configuration
//! parser used by `dateformat-benchmark`.

pub mod config;
pub mod error;
pub mod formatter;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use config::{BenchConfig, BenchSuiteConfig, ConfigLoader, FormatConfig, TimeUnit};
pub use error::{ConfigValidationError, DateFormatError, DateFormatResult, PatternError};
pub use formatter::{CalendarFormatter, DateFormat, ImmutableFormatter};
pub use strategy::{FormatInput, SharedFormatter, Strategy, WorkerContext, WorkerFormatter};
pub use types::{CalendarInstant, HandleId, Instant, Pattern, MONTH_YEAR};
