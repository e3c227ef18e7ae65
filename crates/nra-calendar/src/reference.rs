//! Built-in release history: the last 24 known releases per announcement type
//! (2021 to early 2023), stamped with each type's typical release time.
//!
//! Stand-in for a real calendar feed. Anything implementing
//! [`EventSource`](crate::EventSource) can replace it.

use chrono::NaiveDate;

use crate::{CalendarError, EventCalendar, EventKind, EventOccurrence, EventSource};

const CPI: &[&str] = &[
    "2021-02-10", "2021-03-10", "2021-04-13", "2021-05-12", "2021-06-10", "2021-07-13",
    "2021-08-11", "2021-09-14", "2021-10-13", "2021-11-10", "2021-12-10", "2022-01-12",
    "2022-02-10", "2022-03-10", "2022-04-12", "2022-05-11", "2022-06-10", "2022-07-13",
    "2022-08-10", "2022-09-13", "2022-10-13", "2022-11-10", "2022-12-13", "2023-01-12",
];

// NFP and the unemployment rate come out in the same release.
const EMPLOYMENT_SITUATION: &[&str] = &[
    "2021-02-05", "2021-03-05", "2021-04-02", "2021-05-07", "2021-06-04", "2021-07-02",
    "2021-08-06", "2021-09-03", "2021-10-08", "2021-11-05", "2021-12-03", "2022-01-07",
    "2022-02-04", "2022-03-04", "2022-04-01", "2022-05-06", "2022-06-03", "2022-07-08",
    "2022-08-05", "2022-09-02", "2022-10-07", "2022-11-04", "2022-12-02", "2023-01-06",
];

const CRUDE_OIL_INVENTORIES: &[&str] = &[
    "2023-01-04", "2022-12-29", "2022-12-21", "2022-12-14", "2022-12-07", "2022-11-30",
    "2022-11-23", "2022-11-16", "2022-11-09", "2022-11-02", "2022-10-26", "2022-10-19",
    "2022-10-12", "2022-10-05", "2022-09-28", "2022-09-21", "2022-09-14", "2022-09-08",
    "2022-08-31", "2022-08-24", "2022-08-17", "2022-08-10", "2022-08-03", "2022-07-27",
];

const ISM_MANUFACTURING: &[&str] = &[
    "2023-01-03", "2022-12-01", "2022-11-01", "2022-10-03", "2022-09-01", "2022-08-01",
    "2022-07-01", "2022-06-01", "2022-05-02", "2022-04-01", "2022-03-01", "2022-02-01",
    "2022-01-04", "2021-12-01", "2021-11-01", "2021-10-01", "2021-09-01", "2021-08-02",
    "2021-07-01", "2021-06-01", "2021-05-03", "2021-04-01", "2021-03-01", "2021-02-01",
];

const ISM_NON_MANUFACTURING: &[&str] = &[
    "2023-01-05", "2022-12-05", "2022-11-03", "2022-10-05", "2022-09-06", "2022-08-03",
    "2022-07-06", "2022-06-03", "2022-05-04", "2022-04-05", "2022-03-03", "2022-02-03",
    "2022-01-06", "2021-12-03", "2021-11-03", "2021-10-05", "2021-09-03", "2021-08-04",
    "2021-07-06", "2021-06-03", "2021-05-05", "2021-04-05", "2021-03-03", "2021-02-03",
];

const DURABLE_GOODS: &[&str] = &[
    "2022-12-23", "2022-11-23", "2022-10-27", "2022-09-27", "2022-08-24", "2022-07-27",
    "2022-06-27", "2022-05-25", "2022-04-26", "2022-03-24", "2022-02-25", "2022-01-27",
    "2021-12-23", "2021-11-24", "2021-10-27", "2021-09-27", "2021-08-25", "2021-07-27",
    "2021-06-24", "2021-05-27", "2021-04-26", "2021-03-24", "2021-02-25", "2021-01-27",
];

const INITIAL_JOBLESS_CLAIMS: &[&str] = &[
    "2023-01-05", "2022-12-29", "2022-12-22", "2022-12-15", "2022-12-08", "2022-12-01",
    "2022-11-23", "2022-11-17", "2022-11-10", "2022-11-03", "2022-10-27", "2022-10-20",
    "2022-10-13", "2022-10-06", "2022-09-29", "2022-09-22", "2022-09-15", "2022-09-08",
    "2022-09-01", "2022-08-25", "2022-08-18", "2022-08-11", "2022-08-04", "2022-07-28",
];

fn release_dates(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Cpi => CPI,
        EventKind::NonFarmPayrolls | EventKind::UnemploymentRate => EMPLOYMENT_SITUATION,
        EventKind::CrudeOilInventories => CRUDE_OIL_INVENTORIES,
        EventKind::IsmManufacturingPmi => ISM_MANUFACTURING,
        EventKind::IsmNonManufacturingPmi => ISM_NON_MANUFACTURING,
        EventKind::DurableGoodsOrders => DURABLE_GOODS,
        EventKind::InitialJoblessClaims => INITIAL_JOBLESS_CLAIMS,
    }
}

/// The built-in release history as an ordered calendar.
pub fn reference_calendar() -> EventCalendar {
    let mut occurrences = Vec::new();
    for kind in EventKind::ALL {
        let time = kind.typical_release_time();
        for raw in release_dates(kind) {
            // Table entries are compile-time literals checked by the tests below.
            if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                occurrences.push(EventOccurrence::new(kind, date).with_time(time));
            }
        }
    }
    EventCalendar::new(occurrences)
}

/// [`EventSource`] over the built-in table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCalendar;

impl EventSource for ReferenceCalendar {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn load(&self) -> Result<EventCalendar, CalendarError> {
        Ok(reference_calendar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_parses() {
        for kind in EventKind::ALL {
            let dates = release_dates(kind);
            assert_eq!(dates.len(), 24, "{kind}");
            for raw in dates {
                assert!(
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok(),
                    "bad literal {raw} for {kind}"
                );
            }
        }
    }

    #[test]
    fn reference_calendar_has_all_releases_in_order() {
        let cal = reference_calendar();
        assert_eq!(cal.len(), 8 * 24);
        assert!(cal
            .occurrences()
            .windows(2)
            .all(|w| (w[0].date, w[0].time) <= (w[1].date, w[1].time)));
        assert_eq!(cal.occurrences()[0].kind, EventKind::DurableGoodsOrders);
    }

    #[test]
    fn nfp_and_unemployment_share_dates() {
        let cal = reference_calendar();
        let nfp = cal.dates_for(EventKind::NonFarmPayrolls);
        let ur = cal.dates_for(EventKind::UnemploymentRate);
        assert_eq!(nfp, ur);
    }
}
