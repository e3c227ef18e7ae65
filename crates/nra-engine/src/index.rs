//! Date index over a daily price series.

use chrono::NaiveDate;
use nra_md::PriceBar;

/// Daily bars sorted by date with unique dates.
///
/// `NaiveDate` carries no time of day, so two timestamps on the same calendar
/// day were already collapsed to one key by the normalizer. All lookups are
/// binary searches; none of them mutate.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    bars: Vec<PriceBar>,
}

impl PriceIndex {
    /// Build from bars in any order. Duplicate dates keep the bar that came
    /// last in `bars`.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        nra_md::normalizer::sort_dedup(&mut bars);
        Self { bars }
    }

    /// The bar dated exactly `date`.
    pub fn bar_on(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// The bar with the greatest date strictly before `date`.
    pub fn bar_before(&self, date: NaiveDate) -> Option<&PriceBar> {
        let i = self.bars.partition_point(|b| b.date < date);
        i.checked_sub(1).map(|j| &self.bars[j])
    }

    /// The bar with the least date strictly after `date`.
    pub fn bar_after(&self, date: NaiveDate) -> Option<&PriceBar> {
        let i = self.bars.partition_point(|b| b.date <= date);
        self.bars.get(i)
    }

    /// Trading dates, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
