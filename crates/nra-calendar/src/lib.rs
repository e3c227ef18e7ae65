//! nra-calendar
//!
//! Event calendar: which announcement happened on which date.
//!
//! The calendar is read-only input to the reaction engine. The engine only
//! looks at `date`; `time` is carried for reporting and CSV round trips.

pub mod directory_csv;
pub mod kind;
pub mod reference;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub use directory_csv::CsvEventSource;
pub use kind::EventKind;
pub use reference::{reference_calendar, ReferenceCalendar};

/// One announcement on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventOccurrence {
    // Field order drives the derived `Ord`: date, then time, then kind.
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub kind: EventKind,
}

impl EventOccurrence {
    pub fn new(kind: EventKind, date: NaiveDate) -> Self {
        Self {
            date,
            time: None,
            kind,
        }
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }
}

/// Ordered collection of occurrences (by date, time, kind).
///
/// Several occurrences may share a date, across or within kinds; each one is
/// kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCalendar {
    occurrences: Vec<EventOccurrence>,
}

impl EventCalendar {
    pub fn new(mut occurrences: Vec<EventOccurrence>) -> Self {
        occurrences.sort();
        Self { occurrences }
    }

    pub fn occurrences(&self) -> &[EventOccurrence] {
        &self.occurrences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventOccurrence> {
        self.occurrences.iter()
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Every date hosting at least one occurrence, deduplicated by date.
    pub fn occurrence_dates(&self) -> BTreeSet<NaiveDate> {
        self.occurrences.iter().map(|o| o.date).collect()
    }

    pub fn dates_for(&self, kind: EventKind) -> Vec<NaiveDate> {
        self.occurrences
            .iter()
            .filter(|o| o.kind == kind)
            .map(|o| o.date)
            .collect()
    }

    /// Keep only occurrences dated within `[start, end]`.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> EventCalendar {
        EventCalendar {
            occurrences: self
                .occurrences
                .iter()
                .filter(|o| o.date >= start && o.date <= end)
                .copied()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventCalendar {
    type Item = &'a EventOccurrence;
    type IntoIter = std::slice::Iter<'a, EventOccurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.occurrences.iter()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum CalendarError {
    /// An I/O or CSV-library error.
    Io(String),
    MissingHeader(String),
    /// A row names an announcement type outside [`EventKind`].
    UnknownLabel { row: usize, label: String },
    InvalidTime { row: usize, raw: String },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::Io(msg) => write!(f, "calendar io error: {msg}"),
            CalendarError::MissingHeader(col) => {
                write!(f, "calendar csv missing required header column: '{col}'")
            }
            CalendarError::UnknownLabel { row, label } => {
                write!(f, "calendar row {row}: unknown event label '{label}'")
            }
            CalendarError::InvalidTime { row, raw } => {
                write!(f, "calendar row {row}: cannot parse time '{raw}'")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

impl From<csv::Error> for CalendarError {
    fn from(e: csv::Error) -> Self {
        CalendarError::Io(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can supply an [`EventCalendar`]: a static table, a file, an
/// API client.
pub trait EventSource {
    fn name(&self) -> &'static str;

    fn load(&self) -> Result<EventCalendar, CalendarError>;
}
