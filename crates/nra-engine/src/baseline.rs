//! "No News" control days.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::index::PriceIndex;
use crate::reaction::{compute_reaction, PipSize, ReactionLabel, ReactionRecord};

/// Trading dates that host no event at all, ascending.
///
/// Exclusion is by date: a date carrying any event never becomes a control
/// day, whichever label it had.
pub fn baseline_dates<'a>(
    index: &'a PriceIndex,
    event_dates: &'a BTreeSet<NaiveDate>,
) -> impl Iterator<Item = NaiveDate> + 'a {
    index.dates().filter(move |d| !event_dates.contains(d))
}

/// Reaction records for every control day that has a prior bar.
pub fn baseline_reactions(
    index: &PriceIndex,
    event_dates: &BTreeSet<NaiveDate>,
    pip: PipSize,
) -> Vec<ReactionRecord> {
    baseline_dates(index, event_dates)
        .filter_map(|date| {
            let rec = compute_reaction(date, ReactionLabel::NoNews, index, pip);
            if rec.is_none() {
                debug!(%date, "baseline day has no prior bar, skipped");
            }
            rec
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nra_md::PriceBar;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 3, day).unwrap()
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: d(day),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    fn index() -> PriceIndex {
        PriceIndex::new(vec![
            bar(7, 1.10),
            bar(8, 1.11),
            bar(9, 1.12),
            bar(10, 1.13),
            bar(11, 1.14),
        ])
    }

    #[test]
    fn event_dates_are_excluded() {
        let ix = index();
        let events: BTreeSet<NaiveDate> = [d(8), d(10), d(12)].into_iter().collect();
        let got: Vec<NaiveDate> = baseline_dates(&ix, &events).collect();
        assert_eq!(got, vec![d(7), d(9), d(11)]);
    }

    #[test]
    fn first_trading_day_is_dropped_for_lack_of_prior() {
        let ix = index();
        let recs = baseline_reactions(&ix, &BTreeSet::new(), PipSize::FX_MAJOR);
        assert_eq!(recs.len(), 4);
        assert_eq!(recs[0].date, d(8));
        assert!(recs.iter().all(|r| r.label == ReactionLabel::NoNews));
    }

    #[test]
    fn all_days_are_events_yields_nothing() {
        let ix = index();
        let events: BTreeSet<NaiveDate> = ix.dates().collect();
        assert!(baseline_reactions(&ix, &events, PipSize::FX_MAJOR).is_empty());
    }
}
