// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Formatter handles.
//!
//! Two handle flavours are provided:
//!
//! - [`CalendarFormatter`] keeps a mutable calendar scratch slot. Every call
//!   stores the instant into the slot and renders whatever it reads back, the
//!   way classic stateful date formatters do. The slot is built from relaxed
//!   atomics, so sharing one handle across threads is memory-safe but lets a
//!   call render another caller's instant.
//! - [`ImmutableFormatter`] holds only the compiled pattern.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use chrono::{DateTime, Utc};

use crate::types::{CalendarInstant, HandleId, Instant, Pattern};

/// Common surface of every formatter handle.
pub trait DateFormat {
    /// Render `instant` according to the handle's pattern.
    fn format(&self, instant: &Instant) -> String;

    /// Identity of this handle.
    fn handle_id(&self) -> HandleId;

    /// The pattern this handle was built with.
    fn pattern(&self) -> &Pattern;
}

/// Calendar scratch slot written and then read back on every call.
#[derive(Debug, Default)]
struct CalendarScratch {
    secs: AtomicI64,
    nanos: AtomicU32,
}

impl CalendarScratch {
    fn set(&self, instant: &Instant) {
        self.secs.store(instant.timestamp(), Ordering::Relaxed);
        self.nanos.store(instant.subsec_nanos(), Ordering::Relaxed);
    }

    fn resolve(&self) -> DateTime<Utc> {
        let secs = self.secs.load(Ordering::Relaxed);
        let nanos = self.nanos.load(Ordering::Relaxed);
        // A torn pair is still a representable timestamp unless secs is garbage.
        DateTime::from_timestamp(secs, nanos).unwrap_or_default()
    }
}

/// Stateful formatter handle.
///
/// Not logically thread-safe: concurrent callers of one handle race on the
/// calendar scratch slot. Confine each instance to one thread, or guard it.
#[derive(Debug)]
pub struct CalendarFormatter {
    id: HandleId,
    pattern: Pattern,
    calendar: CalendarScratch,
}

impl CalendarFormatter {
    /// Create a handle for `pattern`.
    pub fn new(pattern: Pattern) -> Self {
        let id = HandleId::next();
        tracing::trace!(handle = %id, pattern = %pattern, "CalendarFormatter created");
        Self {
            id,
            pattern,
            calendar: CalendarScratch::default(),
        }
    }
}

impl DateFormat for CalendarFormatter {
    fn format(&self, instant: &Instant) -> String {
        self.calendar.set(instant);
        let resolved = self.calendar.resolve();
        resolved
            .format_with_items(self.pattern.items().iter())
            .to_string()
    }

    fn handle_id(&self) -> HandleId {
        self.id
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Formatter handle with no mutable state; safe to share freely.
#[derive(Debug)]
pub struct ImmutableFormatter {
    id: HandleId,
    pattern: Pattern,
}

impl ImmutableFormatter {
    /// Create a handle for `pattern`.
    pub fn new(pattern: Pattern) -> Self {
        let id = HandleId::next();
        tracing::trace!(handle = %id, pattern = %pattern, "ImmutableFormatter created");
        Self { id, pattern }
    }

    /// Render an instant that is already resolved into calendar fields.
    pub fn format_calendar(&self, calendar: &CalendarInstant) -> String {
        calendar
            .as_datetime()
            .format_with_items(self.pattern.items().iter())
            .to_string()
    }
}

impl DateFormat for ImmutableFormatter {
    fn format(&self, instant: &Instant) -> String {
        instant
            .as_datetime()
            .format_with_items(self.pattern.items().iter())
            .to_string()
    }

    fn handle_id(&self) -> HandleId {
        self.id
    }

    fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}
