//! Per-label statistics over reaction records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::reaction::{NextDayReversal, ReactionLabel, ReactionRecord};

/// Statistics of one label's partition.
///
/// Rates are percentages in `[0, 100]`, unformatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: ReactionLabel,
    pub mean_movement_pips: f64,
    pub mean_range_pips: f64,
    /// Over records with a known next day only; 0 when there are none.
    pub next_day_reversal_rate: f64,
    pub same_day_reversal_rate: f64,
    /// Every record in the partition.
    pub sample_size: usize,
    /// Records with a known next day (denominator of `next_day_reversal_rate`).
    pub reversal_sample_size: usize,
}

/// Statistics over the whole record table regardless of label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub mean_movement_pips: f64,
    pub mean_range_pips: f64,
    pub next_day_reversal_rate: f64,
    pub same_day_reversal_rate: f64,
    pub records: usize,
}

struct Tally {
    n: usize,
    movement: f64,
    range: f64,
    next_known: usize,
    next_reversed: usize,
    same_reversed: usize,
}

// Sums in date order so the result does not depend on how records arrived.
fn tally(mut records: Vec<&ReactionRecord>) -> Tally {
    records.sort_by_key(|r| (r.date, r.label));

    let mut t = Tally {
        n: records.len(),
        movement: 0.0,
        range: 0.0,
        next_known: 0,
        next_reversed: 0,
        same_reversed: 0,
    };
    for r in records {
        t.movement += r.movement_pips;
        t.range += r.range_pips;
        match r.next_day_reversal {
            NextDayReversal::Reversed => {
                t.next_known += 1;
                t.next_reversed += 1;
            }
            NextDayReversal::Held => t.next_known += 1,
            NextDayReversal::Unknown => {}
        }
        if r.same_day_reversal {
            t.same_reversed += 1;
        }
    }
    t
}

fn mean(sum: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn pct(hits: usize, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        hits as f64 * 100.0 / n as f64
    }
}

/// One summary per distinct label, ordered by label display string.
pub fn aggregate(records: &[ReactionRecord]) -> Vec<GroupSummary> {
    let mut partitions: BTreeMap<ReactionLabel, Vec<&ReactionRecord>> = BTreeMap::new();
    for r in records {
        partitions.entry(r.label).or_default().push(r);
    }

    partitions
        .into_iter()
        .map(|(label, part)| {
            let t = tally(part);
            GroupSummary {
                label,
                mean_movement_pips: mean(t.movement, t.n),
                mean_range_pips: mean(t.range, t.n),
                next_day_reversal_rate: pct(t.next_reversed, t.next_known),
                same_day_reversal_rate: pct(t.same_reversed, t.n),
                sample_size: t.n,
                reversal_sample_size: t.next_known,
            }
        })
        .collect()
}

/// `None` when there are no records.
pub fn overall(records: &[ReactionRecord]) -> Option<OverallSummary> {
    if records.is_empty() {
        return None;
    }
    let t = tally(records.iter().collect());
    Some(OverallSummary {
        mean_movement_pips: mean(t.movement, t.n),
        mean_range_pips: mean(t.range, t.n),
        next_day_reversal_rate: pct(t.next_reversed, t.next_known),
        same_day_reversal_rate: pct(t.same_reversed, t.n),
        records: t.n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nra_calendar::EventKind;

    fn rec(
        day: u32,
        label: ReactionLabel,
        movement: f64,
        next: NextDayReversal,
        same: bool,
    ) -> ReactionRecord {
        ReactionRecord {
            date: NaiveDate::from_ymd_opt(2022, 3, day).unwrap(),
            label,
            price_before: 1.0,
            price_after: 1.0,
            movement_pips: movement,
            range_pips: movement * 2.0,
            next_day_reversal: next,
            same_day_reversal: same,
        }
    }

    const CPI: ReactionLabel = ReactionLabel::Event(EventKind::Cpi);

    #[test]
    fn unknown_next_day_is_outside_rate_but_inside_means() {
        let recs = vec![
            rec(1, CPI, 10.0, NextDayReversal::Reversed, false),
            rec(2, CPI, 20.0, NextDayReversal::Held, true),
            rec(3, CPI, 30.0, NextDayReversal::Unknown, false),
        ];
        let s = &aggregate(&recs)[0];
        assert_eq!(s.sample_size, 3);
        assert_eq!(s.reversal_sample_size, 2);
        assert_eq!(s.mean_movement_pips, 20.0);
        assert_eq!(s.mean_range_pips, 40.0);
        assert_eq!(s.next_day_reversal_rate, 50.0);
        assert!((s.same_day_reversal_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_known_next_day_gives_zero_rate() {
        let recs = vec![rec(1, CPI, 5.0, NextDayReversal::Unknown, false)];
        let s = &aggregate(&recs)[0];
        assert_eq!(s.next_day_reversal_rate, 0.0);
        assert!(!s.next_day_reversal_rate.is_nan());
        assert_eq!(s.reversal_sample_size, 0);
    }

    #[test]
    fn groups_are_ordered_by_label_text() {
        let recs = vec![
            rec(1, ReactionLabel::NoNews, 1.0, NextDayReversal::Held, false),
            rec(2, ReactionLabel::Event(EventKind::UnemploymentRate), 1.0, NextDayReversal::Held, false),
            rec(3, CPI, 1.0, NextDayReversal::Held, false),
            rec(4, ReactionLabel::Event(EventKind::InitialJoblessClaims), 1.0, NextDayReversal::Held, false),
        ];
        let labels: Vec<&str> = aggregate(&recs).iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["CPI (YoY)", "Initial Jobless Claims", "No News", "Unemployment Rate"]
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(aggregate(&[]).is_empty());
        assert!(overall(&[]).is_none());
    }

    #[test]
    fn overall_spans_all_labels() {
        let recs = vec![
            rec(1, CPI, 10.0, NextDayReversal::Reversed, false),
            rec(2, ReactionLabel::NoNews, 30.0, NextDayReversal::Held, false),
            rec(3, ReactionLabel::NoNews, 20.0, NextDayReversal::Unknown, true),
        ];
        let o = overall(&recs).unwrap();
        assert_eq!(o.records, 3);
        assert_eq!(o.mean_movement_pips, 20.0);
        assert_eq!(o.next_day_reversal_rate, 50.0);
    }
}
