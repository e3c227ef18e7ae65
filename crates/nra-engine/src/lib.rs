//! nra-engine
//!
//! Event-reaction analysis over a daily price series.
//!
//! Pipeline: PRICE INDEX + EVENT CALENDAR -> REACTIONS (event + baseline) -> GROUP SUMMARY
//!
//! - Pure: a run is a function of its two inputs, nothing is persisted
//! - Missing trading days are never faults (dropped record or `Unknown` field)
//! - Baseline days are selected by date exclusion, not by (date, label)
//! - Deterministic regardless of input order

pub mod aggregate;
pub mod baseline;
pub mod index;
pub mod reaction;

use nra_calendar::EventCalendar;
use serde::Serialize;
use tracing::{debug, info};

pub use aggregate::{aggregate, overall, GroupSummary, OverallSummary};
pub use baseline::{baseline_dates, baseline_reactions};
pub use index::PriceIndex;
pub use reaction::{compute_reaction, NextDayReversal, PipSize, ReactionLabel, ReactionRecord};

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub pip_size: PipSize,
    /// Event records in calendar order, then baseline records by date.
    pub records: Vec<ReactionRecord>,
    pub summaries: Vec<GroupSummary>,
    pub overall: Option<OverallSummary>,
    /// Event occurrences that produced no record.
    pub dropped_events: usize,
}

impl AnalysisReport {
    pub fn summary_for(&self, label: ReactionLabel) -> Option<&GroupSummary> {
        self.summaries.iter().find(|s| s.label == label)
    }

    pub fn event_records(&self) -> impl Iterator<Item = &ReactionRecord> {
        self.records
            .iter()
            .filter(|r| r.label != ReactionLabel::NoNews)
    }
}

/// One record per calendar occurrence that has both an anchor bar and a prior
/// bar. Occurrences sharing a date each get their own record. Returns the
/// records and the count of dropped occurrences.
pub fn event_reactions(
    index: &PriceIndex,
    calendar: &EventCalendar,
    pip: PipSize,
) -> (Vec<ReactionRecord>, usize) {
    let mut out = Vec::with_capacity(calendar.len());
    let mut dropped = 0usize;

    for occ in calendar {
        match compute_reaction(occ.date, occ.kind.into(), index, pip) {
            Some(rec) => out.push(rec),
            None => {
                dropped += 1;
                debug!(
                    date = %occ.date,
                    event = %occ.kind,
                    "event dropped: not a trading day or no prior bar"
                );
            }
        }
    }
    (out, dropped)
}

/// Run the full analysis.
pub fn analyze(index: &PriceIndex, calendar: &EventCalendar, pip: PipSize) -> AnalysisReport {
    let (mut records, dropped_events) = event_reactions(index, calendar, pip);
    let event_count = records.len();

    let event_dates = calendar.occurrence_dates();
    records.extend(baseline_reactions(index, &event_dates, pip));

    let summaries = aggregate(&records);
    let overall = overall(&records);

    info!(
        bars = index.len(),
        occurrences = calendar.len(),
        event_records = event_count,
        baseline_records = records.len() - event_count,
        dropped_events,
        groups = summaries.len(),
        "reaction analysis complete"
    );

    AnalysisReport {
        pip_size: pip,
        records,
        summaries,
        overall,
        dropped_events,
    }
}
