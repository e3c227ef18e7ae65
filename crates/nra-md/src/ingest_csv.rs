//! CSV ingestion for daily price files.
//!
//! The **read** side only: CSV text → [`RawBar`] rows. Coercion to numbers,
//! OHLC sanity and deduplication happen in [`crate::normalizer`]; persistence
//! of fetched bars back to CSV lives in [`write_price_csv`].
//!
//! ## CSV column contract (case-insensitive, order-independent)
//!
//! | Column      | Example              | Notes                                  |
//! |-------------|----------------------|----------------------------------------|
//! | `date`      | `2022-03-10`         | Also accepted as `datetime`            |
//! | `open`      | `1.1000`             |                                        |
//! | `high`      | `1.1050`             |                                        |
//! | `low`       | `1.0990`             |                                        |
//! | `close`     | `1.1030`             |                                        |
//! | `volume`    | `0`                  | Optional                               |
//!
//! Any other column (e.g. `Adj Close`) is ignored.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::provider::RawBar;
use crate::PriceBar;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by CSV parsing in this module.
#[derive(Debug)]
pub enum CsvIngestError {
    /// An I/O or CSV-library error.
    Io(String),
    /// The header row is missing a required column.
    MissingHeader(String),
}

impl fmt::Display for CsvIngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvIngestError::Io(msg) => write!(f, "csv io error: {msg}"),
            CsvIngestError::MissingHeader(col) => {
                write!(f, "csv missing required header column: '{col}'")
            }
        }
    }
}

impl std::error::Error for CsvIngestError {}

impl From<csv::Error> for CsvIngestError {
    fn from(e: csv::Error) -> Self {
        CsvIngestError::Io(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a price CSV file at `path` into raw rows tagged with `symbol`.
///
/// Only structural / header errors are returned as `Err`; field-level
/// problems are left for the normalizer to reject row by row.
pub fn parse_csv_file(path: &Path, symbol: &str) -> Result<Vec<RawBar>, CsvIngestError> {
    let src = std::fs::read_to_string(path)
        .map_err(|e| CsvIngestError::Io(format!("read '{}': {e}", path.display())))?;
    parse_csv_str(&src, symbol)
}

/// Parse CSV from a string slice. See [`parse_csv_file`].
pub fn parse_csv_str(src: &str, symbol: &str) -> Result<Vec<RawBar>, CsvIngestError> {
    let src = src.trim_start_matches('\u{feff}');
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(src.as_bytes());

    let cols = ColumnIndex::from_headers(rdr.headers()?)?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        let field = |i: usize| rec.get(i).unwrap_or("").to_string();
        out.push(RawBar {
            symbol: symbol.to_string(),
            timestamp: field(cols.date),
            open: field(cols.open),
            high: field(cols.high),
            low: field(cols.low),
            close: field(cols.close),
            volume: cols.volume.map(field),
        });
    }

    Ok(out)
}

/// Write normalized bars as a price CSV (`date,open,high,low,close,volume`)
/// that [`parse_csv_str`] reads back.
pub fn write_price_csv<W: Write>(out: W, bars: &[PriceBar]) -> Result<(), CsvIngestError> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["date", "open", "high", "low", "close", "volume"])?;
    for b in bars {
        w.write_record([
            b.date.format("%Y-%m-%d").to_string(),
            b.open.to_string(),
            b.high.to_string(),
            b.low.to_string(),
            b.close.to_string(),
            b.volume.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }
    w.flush()
        .map_err(|e| CsvIngestError::Io(format!("flush: {e}")))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvIngestError> {
        let mut idx: HashMap<String, usize> = HashMap::new();
        for (i, col) in headers.iter().enumerate() {
            // First occurrence wins on duplicate names.
            idx.entry(col.trim().to_ascii_lowercase()).or_insert(i);
        }

        let required = |name: &str| -> Result<usize, CsvIngestError> {
            idx.get(name)
                .copied()
                .ok_or_else(|| CsvIngestError::MissingHeader(name.to_string()))
        };

        let date = match idx.get("date").or_else(|| idx.get("datetime")) {
            Some(i) => *i,
            None => return Err(CsvIngestError::MissingHeader("date".to_string())),
        };

        Ok(Self {
            date,
            open: required("open")?,
            high: required("high")?,
            low: required("low")?,
            close: required("close")?,
            volume: idx.get("volume").copied(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
