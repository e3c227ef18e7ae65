//! nra-md
//!
//! Daily price bars for the reaction engine.
//!
//! This crate owns the provider boundary, CSV ingestion, normalization of raw
//! rows into [`PriceBar`] values, and the data-quality report. It does **not**
//! index bars or compute reactions; callers hand the loaded series to
//! `nra-engine`.

pub mod ingest_csv;
pub mod normalizer;
pub mod provider;
pub mod quality;
pub mod twelvedata;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use provider::{FetchBarsRequest, HistoricalProvider, ProviderError, RawBar};
pub use quality::QualityReport;
pub use twelvedata::TwelveDataHistoricalProvider;

/// One calendar date's trading data.
///
/// Invariant (enforced by the normalizer): `low <= {open, close} <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// A normalized, date-sorted, deduplicated series plus its quality report.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub bars: Vec<PriceBar>,
    pub report: QualityReport,
}

/// Normalize raw rows, dropping (and counting) the ones that fail, then sort
/// and deduplicate by date.
pub fn normalize_rows(rows: &[RawBar], session_tz: Tz) -> LoadedSeries {
    let mut bars: Vec<PriceBar> = Vec::with_capacity(rows.len());
    let mut rejected = 0usize;

    for (i, row) in rows.iter().enumerate() {
        match normalizer::normalize(row, session_tz) {
            Ok(bar) => bars.push(bar),
            Err(e) => {
                rejected += 1;
                warn!(row = i + 1, symbol = %row.symbol, error = %e, "price row rejected");
            }
        }
    }

    let report = quality::build_quality_report(&bars, rejected);
    let dropped = normalizer::sort_dedup(&mut bars);
    if dropped > 0 {
        warn!(dropped, "duplicate price dates dropped (last row wins)");
    }
    debug!(
        accepted = report.rows_accepted,
        rejected = report.rows_rejected,
        bars = bars.len(),
        "price series normalized"
    );

    LoadedSeries { bars, report }
}

/// Read a daily price CSV from disk and normalize it.
pub fn load_price_csv(path: &Path, symbol: &str, session_tz: Tz) -> Result<LoadedSeries> {
    let rows = ingest_csv::parse_csv_file(path, symbol)
        .with_context(|| format!("price csv ingest failed: {}", path.display()))?;
    Ok(normalize_rows(&rows, session_tz))
}
