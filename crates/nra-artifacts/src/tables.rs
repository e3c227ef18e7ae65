//! CSV renderings of the record and summary tables.

use std::io::Write;

use anyhow::{Context, Result};
use nra_engine::{GroupSummary, NextDayReversal, ReactionRecord};

pub const RECORDS_HEADER: [&str; 8] = [
    "date",
    "label",
    "price_before",
    "price_after",
    "movement_pips",
    "range_pips",
    "next_day_reversal",
    "same_day_reversal",
];

pub const SUMMARY_HEADER: [&str; 9] = [
    "label",
    "sample_size",
    "reversal_sample_size",
    "mean_movement_pips",
    "mean_range_pips",
    "next_day_reversal_rate",
    "same_day_reversal_rate",
    "next_day_reversal_pct",
    "same_day_reversal_pct",
];

/// `42.857142…` -> `"42.86%"`.
pub fn format_pct(rate: f64) -> String {
    format!("{rate:.2}%")
}

fn tri_state(v: NextDayReversal) -> &'static str {
    match v {
        NextDayReversal::Reversed => "true",
        NextDayReversal::Held => "false",
        NextDayReversal::Unknown => "",
    }
}

/// One row per record. Unknown next-day reversal is an empty cell.
pub fn write_reaction_records<W: Write>(out: W, records: &[ReactionRecord]) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(RECORDS_HEADER)?;
    for r in records {
        w.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.label.to_string(),
            r.price_before.to_string(),
            r.price_after.to_string(),
            r.movement_pips.to_string(),
            r.range_pips.to_string(),
            tri_state(r.next_day_reversal).to_string(),
            r.same_day_reversal.to_string(),
        ])?;
    }
    w.flush().context("flush reaction records")?;
    Ok(())
}

/// Raw numeric rates plus their display percentages.
pub fn write_group_summary<W: Write>(out: W, summaries: &[GroupSummary]) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(SUMMARY_HEADER)?;
    for s in summaries {
        w.write_record([
            s.label.to_string(),
            s.sample_size.to_string(),
            s.reversal_sample_size.to_string(),
            s.mean_movement_pips.to_string(),
            s.mean_range_pips.to_string(),
            s.next_day_reversal_rate.to_string(),
            s.same_day_reversal_rate.to_string(),
            format_pct(s.next_day_reversal_rate),
            format_pct(s.same_day_reversal_rate),
        ])?;
    }
    w.flush().context("flush group summary")?;
    Ok(())
}
