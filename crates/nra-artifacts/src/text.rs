//! Plain-text report for terminals.

use std::io::Write;

use anyhow::Result;
use nra_engine::AnalysisReport;

use crate::tables::format_pct;
use crate::ReportSink;

/// Writes `key=value` overall lines followed by an aligned per-label table.
pub struct TextReportSink<W: Write> {
    out: W,
}

impl<W: Write> TextReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReportSink<W> {
    fn write_report(&mut self, report: &AnalysisReport) -> Result<()> {
        let out = &mut self.out;

        writeln!(out, "records={}", report.records.len())?;
        writeln!(out, "dropped_events={}", report.dropped_events)?;
        match &report.overall {
            Some(o) => {
                writeln!(out, "mean_movement_pips={:.2}", o.mean_movement_pips)?;
                writeln!(out, "mean_range_pips={:.2}", o.mean_range_pips)?;
                writeln!(out, "next_day_reversal_rate={}", format_pct(o.next_day_reversal_rate))?;
                writeln!(out, "same_day_reversal_rate={}", format_pct(o.same_day_reversal_rate))?;
            }
            None => writeln!(out, "no_data=true")?,
        }

        if report.summaries.is_empty() {
            return Ok(());
        }

        let width = report
            .summaries
            .iter()
            .map(|s| s.label.as_str().len())
            .max()
            .unwrap_or(0)
            .max("label".len());

        writeln!(out)?;
        writeln!(
            out,
            "{:<width$}  {:>6}  {:>10}  {:>10}  {:>10}  {:>10}",
            "label", "n", "move_pips", "range_pips", "next_rev", "same_rev"
        )?;
        for s in &report.summaries {
            writeln!(
                out,
                "{:<width$}  {:>6}  {:>10.2}  {:>10.2}  {:>10}  {:>10}",
                s.label.as_str(),
                s.sample_size,
                s.mean_movement_pips,
                s.mean_range_pips,
                format_pct(s.next_day_reversal_rate),
                format_pct(s.same_day_reversal_rate),
            )?;
        }
        out.flush()?;
        Ok(())
    }
}
