// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Formatter sharing strategies.
//!
//! Each strategy is split into two scopes:
//!
//! - [`SharedFormatter`]: built once per measurement and shared by every worker.
//! - [`WorkerFormatter`]: built by each worker thread from the shared state.
//!
//! | Strategy         | Shared scope            | Worker scope                     |
//! |------------------|-------------------------|----------------------------------|
//! | `Unsynchronized` | pattern only            | private `CalendarFormatter`      |
//! | `Locked`         | one mutex-guarded handle| clone of the `Arc`               |
//! | `ThreadLocal`    | pattern only            | handle created lazily on first use |
//! | `Immutable`      | one `ImmutableFormatter`| clone of the `Arc`               |

use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::DateFormatError;
use crate::formatter::{CalendarFormatter, DateFormat, ImmutableFormatter};
use crate::types::{CalendarInstant, HandleId, Instant, Pattern};

/// How a formatter handle is shared across concurrent callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One stateful handle per worker, no synchronization.
    Unsynchronized,
    /// One stateful handle behind a mutex.
    Locked,
    /// One stateful handle per worker context, created on first use.
    ThreadLocal,
    /// One stateless handle shared by everyone.
    Immutable,
}

impl Strategy {
    /// Every strategy, in reporting order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Unsynchronized,
        Strategy::Locked,
        Strategy::ThreadLocal,
        Strategy::Immutable,
    ];

    /// Stable name used in configuration, reports and benchmark ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Unsynchronized => "unsynchronized",
            Strategy::Locked => "locked",
            Strategy::ThreadLocal => "thread_local",
            Strategy::Immutable => "immutable",
        }
    }

    /// Whether all workers use a single handle instance.
    pub fn shares_handle(&self) -> bool {
        matches!(self, Strategy::Locked | Strategy::Immutable)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| DateFormatError::UnknownStrategy {
                name: s.to_string(),
            })
    }
}

/// Input handed to every `format` call of a measurement.
///
/// The immutable strategy formats the pre-resolved calendar variant; the
/// others format the plain instant.
#[derive(Debug, Clone, Copy)]
pub struct FormatInput {
    instant: Instant,
    calendar: CalendarInstant,
}

impl FormatInput {
    /// Capture `instant` and its calendar resolution.
    pub fn new(instant: Instant) -> Self {
        Self {
            instant,
            calendar: instant.to_calendar(),
        }
    }

    /// The plain instant.
    pub fn instant(&self) -> &Instant {
        &self.instant
    }
}

/// Benchmark-scoped formatter state.
#[derive(Debug)]
pub enum SharedFormatter {
    Unsynchronized { pattern: Pattern },
    Locked(Arc<Mutex<CalendarFormatter>>),
    ThreadLocal { pattern: Pattern },
    Immutable(Arc<ImmutableFormatter>),
}

impl SharedFormatter {
    /// Build the shared state for `strategy`.
    pub fn new(strategy: Strategy, pattern: &Pattern) -> Self {
        tracing::debug!(strategy = %strategy, pattern = %pattern, "Building shared formatter state");

        match strategy {
            Strategy::Unsynchronized => SharedFormatter::Unsynchronized {
                pattern: pattern.clone(),
            },
            Strategy::Locked => SharedFormatter::Locked(Arc::new(Mutex::new(
                CalendarFormatter::new(pattern.clone()),
            ))),
            Strategy::ThreadLocal => SharedFormatter::ThreadLocal {
                pattern: pattern.clone(),
            },
            Strategy::Immutable => {
                SharedFormatter::Immutable(Arc::new(ImmutableFormatter::new(pattern.clone())))
            }
        }
    }

    /// The strategy this state implements.
    pub fn strategy(&self) -> Strategy {
        match self {
            SharedFormatter::Unsynchronized { .. } => Strategy::Unsynchronized,
            SharedFormatter::Locked(_) => Strategy::Locked,
            SharedFormatter::ThreadLocal { .. } => Strategy::ThreadLocal,
            SharedFormatter::Immutable(_) => Strategy::Immutable,
        }
    }

    /// Build the state one worker thread uses for its calls.
    pub fn worker(&self) -> WorkerFormatter {
        match self {
            SharedFormatter::Unsynchronized { pattern } => {
                WorkerFormatter::Confined(CalendarFormatter::new(pattern.clone()))
            }
            SharedFormatter::Locked(shared) => WorkerFormatter::Locked(Arc::clone(shared)),
            SharedFormatter::ThreadLocal { pattern } => {
                WorkerFormatter::ThreadLocal(WorkerContext::new(pattern.clone()))
            }
            SharedFormatter::Immutable(shared) => WorkerFormatter::Immutable(Arc::clone(shared)),
        }
    }
}

/// Per-worker cache holding a lazily created formatter.
///
/// `!Sync`: a context belongs to exactly one worker thread.
#[derive(Debug)]
pub struct WorkerContext {
    pattern: Pattern,
    formatter: OnceCell<CalendarFormatter>,
}

impl WorkerContext {
    /// Create an empty context; the handle is built on the first call.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            formatter: OnceCell::new(),
        }
    }

    /// The worker's formatter, created on first access.
    pub fn formatter(&self) -> &CalendarFormatter {
        self.formatter
            .get_or_init(|| CalendarFormatter::new(self.pattern.clone()))
    }

    /// Whether the formatter has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.formatter.get().is_some()
    }
}

/// Worker-scoped formatter state.
#[derive(Debug)]
pub enum WorkerFormatter {
    Confined(CalendarFormatter),
    Locked(Arc<Mutex<CalendarFormatter>>),
    ThreadLocal(WorkerContext),
    Immutable(Arc<ImmutableFormatter>),
}

impl WorkerFormatter {
    /// Render `instant`.
    pub fn format(&self, instant: &Instant) -> String {
        match self {
            WorkerFormatter::Confined(formatter) => formatter.format(instant),
            WorkerFormatter::Locked(shared) => {
                // Every call rewrites the scratch slot, so a poisoned guard is still usable.
                let formatter = shared.lock().unwrap_or_else(PoisonError::into_inner);
                formatter.format(instant)
            }
            WorkerFormatter::ThreadLocal(context) => context.formatter().format(instant),
            WorkerFormatter::Immutable(formatter) => formatter.format(instant),
        }
    }

    /// Render the measurement input, using the calendar variant where the
    /// strategy benchmarks it.
    pub fn format_input(&self, input: &FormatInput) -> String {
        match self {
            WorkerFormatter::Immutable(formatter) => formatter.format_calendar(&input.calendar),
            _ => self.format(&input.instant),
        }
    }

    /// Identity of the handle serving this worker.
    ///
    /// `None` for a thread-local context whose handle has not been created.
    pub fn handle_id(&self) -> Option<HandleId> {
        match self {
            WorkerFormatter::Confined(formatter) => Some(formatter.handle_id()),
            WorkerFormatter::Locked(shared) => Some(
                shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle_id(),
            ),
            WorkerFormatter::ThreadLocal(context) => context
                .is_initialized()
                .then(|| context.formatter().handle_id()),
            WorkerFormatter::Immutable(formatter) => Some(formatter.handle_id()),
        }
    }
}
