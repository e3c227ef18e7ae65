//! Daily bar normalization.
//!
//! Converts [`RawBar`] rows into [`PriceBar`] values: the timestamp is reduced
//! to a calendar date, prices are coerced to finite `f64`, and the OHLC
//! relationship is validated. A row either normalizes completely or is
//! rejected; there is no partially valid bar.
//!
//! It does **not**:
//! - fetch data (no providers)
//! - read files
//! - perform data-quality reporting (that is `quality.rs`)

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::provider::RawBar;
use crate::PriceBar;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced during normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizerError {
    /// A required field was empty.
    EmptyField { field: &'static str },
    /// A price could not be parsed as a finite number.
    InvalidPrice { field: &'static str, raw: String },
    /// The timestamp matched none of the accepted layouts.
    InvalidTimestamp(String),
    /// OHLC sanity check failed.
    OhlcViolation(String),
    /// Volume is negative or not a number.
    InvalidVolume(String),
}

impl fmt::Display for NormalizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizerError::EmptyField { field } => {
                write!(f, "field '{field}' is empty")
            }
            NormalizerError::InvalidPrice { field, raw } => {
                write!(f, "price field '{field}' is not a finite number: '{raw}'")
            }
            NormalizerError::InvalidTimestamp(raw) => {
                write!(f, "timestamp could not be parsed: '{raw}'")
            }
            NormalizerError::OhlcViolation(msg) => {
                write!(f, "OHLC sanity violation: {msg}")
            }
            NormalizerError::InvalidVolume(raw) => {
                write!(f, "volume must be a number >= 0, got '{raw}'")
            }
        }
    }
}

impl std::error::Error for NormalizerError {}

// ---------------------------------------------------------------------------
// Field conversion
// ---------------------------------------------------------------------------

/// Parse a price string into a finite `f64`.
///
/// Rejects empty strings, non-numeric text, `NaN` and infinities.
pub fn parse_price(s: &str, field: &'static str) -> Result<f64, NormalizerError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NormalizerError::EmptyField { field });
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NormalizerError::InvalidPrice {
            field,
            raw: s.to_string(),
        }),
    }
}

/// Reduce a timestamp string to the calendar date it falls on.
///
/// Accepted layouts, tried in order:
/// - `YYYY-MM-DD` (taken as-is)
/// - `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (naive, already local: date part)
/// - RFC 3339 with offset (converted to `session_tz`, then date part)
/// - epoch seconds (UTC, converted to `session_tz`, then date part)
///
/// Two timestamps on the same session-local day always map to the same date.
pub fn normalize_date(s: &str, session_tz: Tz) -> Result<NaiveDate, NormalizerError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NormalizerError::EmptyField { field: "date" });
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&session_tz).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&session_tz).date_naive());
    }
    if let Ok(secs) = s.parse::<i64>() {
        if let Some(dt) = Utc.timestamp_opt(secs, 0).single() {
            return Ok(dt.with_timezone(&session_tz).date_naive());
        }
    }

    Err(NormalizerError::InvalidTimestamp(s.to_string()))
}

fn parse_volume(s: Option<&str>) -> Result<Option<f64>, NormalizerError> {
    let s = match s.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(NormalizerError::InvalidVolume(s.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a single [`RawBar`] into a [`PriceBar`].
pub fn normalize(bar: &RawBar, session_tz: Tz) -> Result<PriceBar, NormalizerError> {
    let date = normalize_date(&bar.timestamp, session_tz)?;
    let open = parse_price(&bar.open, "open")?;
    let high = parse_price(&bar.high, "high")?;
    let low = parse_price(&bar.low, "low")?;
    let close = parse_price(&bar.close, "close")?;
    let volume = parse_volume(bar.volume.as_deref())?;

    validate_ohlc(open, high, low, close)?;

    Ok(PriceBar {
        date,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// Normalize a batch, all-or-nothing. Use [`normalize`] per row for partial
/// success.
pub fn normalize_all(bars: &[RawBar], session_tz: Tz) -> Result<Vec<PriceBar>, NormalizerError> {
    bars.iter().map(|b| normalize(b, session_tz)).collect()
}

/// Sort bars by date ascending and drop duplicate dates, keeping the bar that
/// appeared **last** in the input for each date.
///
/// Returns the number of bars dropped.
pub fn sort_dedup(bars: &mut Vec<PriceBar>) -> usize {
    let before = bars.len();
    // Stable sort keeps input order within a date; reverse so the last
    // occurrence comes first, then keep the first of each run.
    bars.reverse();
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    before - bars.len()
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_ohlc(open: f64, high: f64, low: f64, close: f64) -> Result<(), NormalizerError> {
    if low > high {
        return Err(NormalizerError::OhlcViolation(format!(
            "low ({low}) > high ({high})"
        )));
    }
    if low > open {
        return Err(NormalizerError::OhlcViolation(format!(
            "low ({low}) > open ({open})"
        )));
    }
    if low > close {
        return Err(NormalizerError::OhlcViolation(format!(
            "low ({low}) > close ({close})"
        )));
    }
    if high < open {
        return Err(NormalizerError::OhlcViolation(format!(
            "high ({high}) < open ({open})"
        )));
    }
    if high < close {
        return Err(NormalizerError::OhlcViolation(format!(
            "high ({high}) < close ({close})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: &str, open: &str, high: &str, low: &str, close: &str) -> RawBar {
        RawBar {
            symbol: "EUR/USD".to_string(),
            timestamp: ts.to_string(),
            open: open.to_string(),
            high: high.to_string(),
            low: low.to_string(),
            close: close.to_string(),
            volume: None,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // --- parse_price ---

    #[test]
    fn price_parses_decimal() {
        assert_eq!(parse_price("1.1030", "close").unwrap(), 1.1030);
    }

    #[test]
    fn price_rejects_empty_and_text() {
        assert_eq!(
            parse_price("  ", "open"),
            Err(NormalizerError::EmptyField { field: "open" })
        );
        assert!(matches!(
            parse_price("n/a", "open"),
            Err(NormalizerError::InvalidPrice { field: "open", .. })
        ));
    }

    #[test]
    fn price_rejects_non_finite() {
        assert!(parse_price("NaN", "high").is_err());
        assert!(parse_price("inf", "high").is_err());
    }

    // --- normalize_date ---

    #[test]
    fn date_only_is_taken_as_is() {
        assert_eq!(normalize_date("2022-03-10", Tz::UTC).unwrap(), d(2022, 3, 10));
    }

    #[test]
    fn same_day_timestamps_map_to_same_date() {
        let a = normalize_date("2022-03-10 00:00:00", Tz::UTC).unwrap();
        let b = normalize_date("2022-03-10 08:30:00", Tz::UTC).unwrap();
        let c = normalize_date("2022-03-10T23:59:59", Tz::UTC).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn rfc3339_is_converted_to_session_tz() {
        // 02:00 UTC on the 11th is still the 10th in New York.
        let ny = normalize_date("2022-03-11T02:00:00Z", chrono_tz::America::New_York).unwrap();
        assert_eq!(ny, d(2022, 3, 10));
        let utc = normalize_date("2022-03-11T02:00:00Z", Tz::UTC).unwrap();
        assert_eq!(utc, d(2022, 3, 11));
    }

    #[test]
    fn space_separated_offset_layout_is_accepted() {
        let got = normalize_date("2022-03-10 00:00:00+00:00", Tz::UTC).unwrap();
        assert_eq!(got, d(2022, 3, 10));
    }

    #[test]
    fn epoch_seconds_are_accepted() {
        // 2022-03-10T00:00:00Z
        assert_eq!(normalize_date("1646870400", Tz::UTC).unwrap(), d(2022, 3, 10));
    }

    #[test]
    fn garbage_timestamp_rejected() {
        assert!(matches!(
            normalize_date("EURUSD=X", Tz::UTC),
            Err(NormalizerError::InvalidTimestamp(_))
        ));
    }

    // --- normalize ---

    #[test]
    fn normalize_valid_bar() {
        let bar = normalize(&raw("2022-03-10", "1.1000", "1.1050", "1.0990", "1.1030"), Tz::UTC)
            .unwrap();
        assert_eq!(bar.date, d(2022, 3, 10));
        assert_eq!(bar.high, 1.1050);
        assert_eq!(bar.volume, None);
    }

    #[test]
    fn normalize_rejects_low_above_close() {
        let err = normalize(&raw("2022-03-10", "1.10", "1.20", "1.15", "1.12"), Tz::UTC)
            .unwrap_err();
        assert!(matches!(err, NormalizerError::OhlcViolation(_)));
    }

    #[test]
    fn normalize_rejects_negative_volume() {
        let mut r = raw("2022-03-10", "1.10", "1.20", "1.05", "1.12");
        r.volume = Some("-1".to_string());
        assert!(matches!(
            normalize(&r, Tz::UTC),
            Err(NormalizerError::InvalidVolume(_))
        ));
    }

    #[test]
    fn blank_volume_is_absent() {
        let mut r = raw("2022-03-10", "1.10", "1.20", "1.05", "1.12");
        r.volume = Some(" ".to_string());
        assert_eq!(normalize(&r, Tz::UTC).unwrap().volume, None);
    }

    #[test]
    fn normalize_all_fails_on_first_bad_row() {
        let rows = vec![
            raw("2022-03-10", "1.10", "1.20", "1.05", "1.12"),
            raw("2022-03-11", "x", "1.20", "1.05", "1.12"),
        ];
        assert!(normalize_all(&rows, Tz::UTC).is_err());
    }

    // --- sort_dedup ---

    #[test]
    fn sort_dedup_orders_and_keeps_last_duplicate() {
        let mk = |day: u32, close: f64| PriceBar {
            date: d(2022, 3, day),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        };
        let mut bars = vec![mk(11, 1.0), mk(10, 2.0), mk(11, 3.0), mk(9, 4.0)];
        let dropped = sort_dedup(&mut bars);
        assert_eq!(dropped, 1);
        let dates: Vec<u32> = bars.iter().map(|b| chrono::Datelike::day(&b.date)).collect();
        assert_eq!(dates, vec![9, 10, 11]);
        assert_eq!(bars[2].close, 3.0);
    }
}
