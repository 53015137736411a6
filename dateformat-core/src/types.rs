// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for formatter inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! A `Pattern` is compiled once when it is created and never changes afterwards.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DateFormatError, DateFormatResult, PatternError};

/// Month-name and year pattern used throughout the suite ("January, 2024").
pub const MONTH_YEAR: &str = "%B, %Y";

/// Immutable, calendar-independent point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// Capture the current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build an instant from a Unix timestamp.
    /// Returns `None` when the timestamp is outside chrono's representable range.
    pub fn from_timestamp(secs: i64, nanos: u32) -> Option<Self> {
        DateTime::from_timestamp(secs, nanos).map(Self)
    }

    /// Build an instant from UTC calendar fields.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> DateFormatResult<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .map(Self)
            .ok_or_else(|| DateFormatError::InvalidInstant {
                value: format!(
                    "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                    year, month, day, hour, minute, second
                ),
                reason: "Not a valid UTC calendar date".to_string(),
            })
    }

    /// Parse an RFC 3339 timestamp, normalising it to UTC.
    pub fn parse_rfc3339(value: &str) -> DateFormatResult<Self> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| DateFormatError::InvalidInstant {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Nanoseconds past the last whole second.
    pub fn subsec_nanos(&self) -> u32 {
        self.0.timestamp_subsec_nanos()
    }

    /// Borrow the underlying chrono value.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Resolve this instant into UTC calendar fields.
    pub fn to_calendar(&self) -> CalendarInstant {
        CalendarInstant(self.0)
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// An instant already broken down into calendar fields.
///
/// Holds the resolved UTC fields together with their offset, so offset and
/// timestamp specifiers (`%z`, `%Z`, `%s`) render the same as for an `Instant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarInstant(DateTime<Utc>);

impl CalendarInstant {
    /// Borrow the resolved date-time.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

/// Validated, pre-compiled format pattern (strftime syntax).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    items: Vec<Item<'static>>,
}

impl Pattern {
    /// Compile a pattern, rejecting empty input and unknown specifiers.
    pub fn new(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();

        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let items = StrftimeItems::new(&source)
            .parse_to_owned()
            .map_err(|_| PatternError::InvalidSpecifier {
                pattern: source.clone(),
            })?;

        Ok(Self { source, items })
    }

    /// The month-name/year pattern.
    pub fn month_year() -> Self {
        // MONTH_YEAR is a literal known to compile
        match Self::new(MONTH_YEAR) {
            Ok(pattern) => pattern,
            Err(e) => unreachable!("built-in pattern rejected: {e}"),
        }
    }

    /// Get the pattern source text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiled items, in order.
    pub fn items(&self) -> &[Item<'static>] {
        &self.items
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::month_year()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl TryFrom<String> for Pattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

/// Process-unique identity of a formatter handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

impl HandleId {
    /// Allocate the next identity.
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the inner value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_valid() {
        let pattern = Pattern::new("%B, %Y").unwrap();
        assert_eq!(pattern.as_str(), "%B, %Y");
        assert!(!pattern.items().is_empty());
    }

    #[test]
    fn test_pattern_empty() {
        assert_eq!(Pattern::new("").unwrap_err(), PatternError::Empty);
    }

    #[test]
    fn test_pattern_invalid_specifier() {
        let err = Pattern::new("%Q, %Y").unwrap_err();
        assert!(matches!(err, PatternError::InvalidSpecifier { .. }));
    }

    #[test]
    fn test_pattern_default_is_month_year() {
        assert_eq!(Pattern::default().as_str(), MONTH_YEAR);
    }

    #[test]
    fn test_pattern_serde_roundtrip() {
        let yaml = serde_yaml::to_string(&Pattern::month_year()).unwrap();
        let pattern: Pattern = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(pattern, Pattern::month_year());

        let bad: Result<Pattern, _> = serde_yaml::from_str("\"%Q\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_instant_from_ymd_hms() {
        let instant = Instant::from_ymd_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(instant.timestamp(), 1_705_320_000);
        assert_eq!(instant.subsec_nanos(), 0);
    }

    #[test]
    fn test_instant_invalid_date() {
        assert!(Instant::from_ymd_hms(2024, 2, 30, 0, 0, 0).is_err());
    }

    #[test]
    fn test_instant_parse_rfc3339_normalises_offset() {
        let instant = Instant::parse_rfc3339("2024-01-15T13:00:00+01:00").unwrap();
        assert_eq!(instant, Instant::from_ymd_hms(2024, 1, 15, 12, 0, 0).unwrap());
        assert!(Instant::parse_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_instant_timestamp_roundtrip() {
        let instant = Instant::from_timestamp(1_705_320_000, 250).unwrap();
        assert_eq!(instant.timestamp(), 1_705_320_000);
        assert_eq!(instant.subsec_nanos(), 250);
    }

    #[test]
    fn test_handle_ids_unique() {
        let a = HandleId::next();
        let b = HandleId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }
}
