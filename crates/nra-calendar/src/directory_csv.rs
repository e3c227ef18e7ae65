//! Event directory CSV (`event,time`).
//!
//! ```text
//! event,time
//! Durable Goods Orders MoM,2021-01-27 08:30:00
//! ISM Manufacturing PMI,2021-02-01 10:00:00
//! ```
//!
//! `time` may also be a bare `YYYY-MM-DD`, in which case the occurrence has
//! no time of day. Unknown labels fail the whole load: a silently dropped
//! event date would leak into the "No News" baseline.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::{CalendarError, EventCalendar, EventKind, EventOccurrence, EventSource};

/// Parse an event directory from CSV text.
pub fn parse_directory_str(src: &str) -> Result<EventCalendar, CalendarError> {
    let src = src.trim_start_matches('\u{feff}');
    if src.trim().is_empty() {
        return Ok(EventCalendar::default());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(src.as_bytes());

    let headers = rdr.headers()?.clone();
    let find = |name: &str| -> Result<usize, CalendarError> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| CalendarError::MissingHeader(name.to_string()))
    };
    let col_event = find("event")?;
    let col_time = find("time")?;

    let mut out = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = i + 2; // 1-based, header = 1
        let label = rec.get(col_event).unwrap_or("");
        let raw_time = rec.get(col_time).unwrap_or("");

        let kind = EventKind::parse(label).ok_or_else(|| CalendarError::UnknownLabel {
            row,
            label: label.to_string(),
        })?;
        out.push(parse_when(kind, raw_time).ok_or_else(|| CalendarError::InvalidTime {
            row,
            raw: raw_time.to_string(),
        })?);
    }

    Ok(EventCalendar::new(out))
}

pub fn parse_directory_file(path: &Path) -> Result<EventCalendar, CalendarError> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| CalendarError::Io(format!("read '{}': {e}", path.display())))?;
    parse_directory_str(&src)
}

/// Write a calendar in the directory layout, in calendar order.
pub fn write_directory<W: Write>(out: W, calendar: &EventCalendar) -> Result<(), CalendarError> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["event", "time"])?;
    for o in calendar {
        let when = match o.time {
            Some(t) => o.date.and_time(t).format("%Y-%m-%d %H:%M:%S").to_string(),
            None => o.date.format("%Y-%m-%d").to_string(),
        };
        w.write_record([o.kind.as_str(), when.as_str()])?;
    }
    w.flush()
        .map_err(|e| CalendarError::Io(format!("flush: {e}")))?;
    Ok(())
}

fn parse_when(kind: EventKind, raw: &str) -> Option<EventOccurrence> {
    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(EventOccurrence::new(kind, dt.date()).with_time(dt.time()));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| EventOccurrence::new(kind, d))
}

/// [`EventSource`] reading an event directory CSV from disk.
#[derive(Debug, Clone)]
pub struct CsvEventSource {
    path: PathBuf,
}

impl CsvEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for CsvEventSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn load(&self) -> Result<EventCalendar, CalendarError> {
        parse_directory_file(&self.path)
    }
}
