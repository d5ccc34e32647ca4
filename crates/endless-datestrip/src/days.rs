//! Day sequence math for the strip.

use chrono::{Datelike, NaiveDate};

/// `count` consecutive days walking backwards from `origin`, `origin` first.
///
/// Crossing month and year boundaries is just calendar arithmetic; the only
/// way to get fewer than `count` days is running into the calendar's minimum
/// representable date.
pub fn descending_days(origin: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut cursor = origin;
    for _ in 0..count {
        days.push(cursor);
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    days
}

/// Stable `u64` key for a calendar day.
///
/// Derived from the day number, so distinct days always map to distinct
/// keys; days before the common era land in the upper half of the range.
pub fn epoch_day_key(date: NaiveDate) -> u64 {
    i64::from(date.num_days_from_ce()) as u64
}
