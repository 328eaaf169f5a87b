//! Day-presence counting for the substantial presence paperwork.
//!
//! A visit covers the half-open interval `[entry, exit)`: the entry day counts
//! as a day present and the exit day does not. A visit that runs past the end
//! of the queried year counts through December 31. A visit with no exit date
//! means the filer is still in the country, so it counts through today (or
//! through December 31 for a year that is already over).
//!
//! Overlapping visits are merged before counting, so a calendar day is never
//! counted twice.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Visit, year_start};

/// Days present in one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPresence {
    pub year: i32,
    pub days: u32,
}

/// Days present in `year`, treating open-ended visits as running until today.
pub fn days_present(
    visits: &[Visit],
    year: i32,
) -> u32 {
    days_present_as_of(visits, year, Local::now().date_naive())
}

/// Days present in `year`, with `today` bounding open-ended visits.
pub fn days_present_as_of(
    visits: &[Visit],
    year: i32,
    today: NaiveDate,
) -> u32 {
    let mut spans: Vec<(NaiveDate, NaiveDate)> = visits
        .iter()
        .filter_map(|visit| clip_to_year(visit, year, today))
        .collect();
    spans.sort_unstable();

    let mut total: i64 = 0;
    let mut current: Option<(NaiveDate, NaiveDate)> = None;
    for (start, end) in spans {
        current = match current {
            Some((cur_start, cur_end)) if start <= cur_end => Some((cur_start, cur_end.max(end))),
            Some((cur_start, cur_end)) => {
                total += (cur_end - cur_start).num_days();
                Some((start, end))
            }
            None => Some((start, end)),
        };
    }
    if let Some((start, end)) = current {
        total += (end - start).num_days();
    }

    u32::try_from(total).unwrap_or(0)
}

/// Days present in `year` and the two years before it, most recent first.
pub fn presence_history(
    visits: &[Visit],
    year: i32,
    today: NaiveDate,
) -> [YearPresence; 3] {
    [year, year - 1, year - 2].map(|y| YearPresence {
        year: y,
        days: days_present_as_of(visits, y, today),
    })
}

/// Portion of `visit` inside `year` as a half-open `[start, end)` span.
fn clip_to_year(
    visit: &Visit,
    year: i32,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let entry = visit.entry_date?;
    let first_day = year_start(year);
    let next_year = year_start(year + 1);

    let end = match visit.exit_date {
        Some(exit) => exit,
        // Today counts as a day present.
        None => today.succ_opt().unwrap_or(NaiveDate::MAX),
    }
    .min(next_year);
    let start = entry.max(first_day);

    (start < end).then_some((start, end))
}
