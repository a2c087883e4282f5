//! Follow-up date generation for repeating entries.

use chrono::{Duration, NaiveDate};
use tracing::warn;

use hb_domain::{shift_month, shift_year, Repeat};

/// Upper bound on generated follow-up dates for a single entry line.
pub const MAX_OCCURRENCES: usize = 5000;

/// Returns the follow-up occurrence dates after `start`, up to and including `until`.
///
/// Monthly and yearly steps are measured from `start` so a month-end anchor
/// keeps landing on month ends instead of drifting.
pub fn repeat_dates(start: NaiveDate, repeat: Repeat, until: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if repeat.is_once() || until <= start {
        return dates;
    }

    for step in 1.. {
        let Some(candidate) = occurrence(start, repeat, step) else {
            break;
        };
        if candidate > until {
            break;
        }
        if dates.len() == MAX_OCCURRENCES {
            warn!(
                %start,
                %until,
                repeat = repeat.key(),
                "recurrence truncated at {MAX_OCCURRENCES} occurrences"
            );
            break;
        }
        dates.push(candidate);
    }
    dates
}

/// Date of the `step`-th occurrence after `start`.
pub fn occurrence(start: NaiveDate, repeat: Repeat, step: i32) -> Option<NaiveDate> {
    match repeat {
        Repeat::Once => None,
        Repeat::Daily => start.checked_add_signed(Duration::days(step as i64)),
        Repeat::Weekly => start.checked_add_signed(Duration::weeks(step as i64)),
        Repeat::Monthly => shift_month(start, step),
        Repeat::Yearly => shift_year(start, step),
    }
}
