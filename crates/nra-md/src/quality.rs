//! Data-quality report for a daily price series.
//!
//! Accepts the normalized (pre-dedup) bars of one load plus the number of
//! rows the normalizer rejected, and produces a [`QualityReport`] covering:
//! - rows read / accepted / rejected
//! - duplicate dates
//! - earliest / latest date
//! - weekday gaps (weekdays with no bar between two consecutive bars)
//!
//! Weekends are not gaps. Holidays are reported as gaps: this is a
//! diagnostic, the engine never consults it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::PriceBar;

/// A date that appeared more than once in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateIssue {
    pub date: NaiveDate,
    /// Always >= 2.
    pub count: usize,
}

/// Weekdays missing between two consecutive bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapIssue {
    pub prev_date: NaiveDate,
    pub next_date: NaiveDate,
    pub missing_weekdays: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    /// Sorted by date.
    pub duplicates: Vec<DuplicateIssue>,
    /// Sorted by `prev_date`.
    pub gaps: Vec<GapIssue>,
}

impl QualityReport {
    /// `true` when nothing was rejected and there are no duplicates or gaps.
    pub fn is_clean(&self) -> bool {
        self.rows_rejected == 0 && self.duplicates.is_empty() && self.gaps.is_empty()
    }

    pub fn missing_weekdays_total(&self) -> u32 {
        self.gaps.iter().map(|g| g.missing_weekdays).sum()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |d: Option<NaiveDate>| {
            d.map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string())
        };
        writeln!(f, "QualityReport {{")?;
        writeln!(f, "  rows_read: {}", self.rows_read)?;
        writeln!(f, "  rows_accepted: {}", self.rows_accepted)?;
        writeln!(f, "  rows_rejected: {}", self.rows_rejected)?;
        writeln!(f, "  earliest_date: {}", opt(self.earliest_date))?;
        writeln!(f, "  latest_date: {}", opt(self.latest_date))?;
        writeln!(f, "  duplicates: {}", self.duplicates.len())?;
        for d in &self.duplicates {
            writeln!(f, "    date={} count={}", d.date, d.count)?;
        }
        writeln!(f, "  gaps: {}", self.gaps.len())?;
        for g in &self.gaps {
            writeln!(
                f,
                "    prev={} next={} missing_weekdays={}",
                g.prev_date, g.next_date, g.missing_weekdays
            )?;
        }
        write!(f, "}}")
    }
}

/// Build a [`QualityReport`].
///
/// Deterministic: the result does not depend on the order of `bars`.
pub fn build_quality_report(bars: &[PriceBar], rows_rejected: usize) -> QualityReport {
    let mut date_counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for bar in bars {
        *date_counts.entry(bar.date).or_insert(0) += 1;
    }

    let duplicates: Vec<DuplicateIssue> = date_counts
        .iter()
        .filter(|(_, count)| **count >= 2)
        .map(|(date, count)| DuplicateIssue {
            date: *date,
            count: *count,
        })
        .collect();

    let dates: Vec<NaiveDate> = date_counts.keys().copied().collect();
    let gaps: Vec<GapIssue> = dates
        .windows(2)
        .filter_map(|w| {
            let missing = weekdays_strictly_between(w[0], w[1]);
            (missing > 0).then_some(GapIssue {
                prev_date: w[0],
                next_date: w[1],
                missing_weekdays: missing,
            })
        })
        .collect();

    QualityReport {
        rows_read: bars.len() + rows_rejected,
        rows_accepted: bars.len(),
        rows_rejected,
        earliest_date: dates.first().copied(),
        latest_date: dates.last().copied(),
        duplicates,
        gaps,
    }
}

fn weekdays_strictly_between(prev: NaiveDate, next: NaiveDate) -> u32 {
    let mut count = 0u32;
    let mut d = prev.succ_opt();
    while let Some(day) = d {
        if day >= next {
            break;
        }
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        d = day.succ_opt();
    }
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
