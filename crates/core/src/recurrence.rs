//! Weekly recurrence expansion.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Longest stretch, in days, one recurrence may schedule ahead.
pub const MAX_RECURRENCE_DAYS: i64 = 366;

pub const SPAN_TOO_LONG: &str = "Must be within a year of the start date";

/// Whether `start..=end` is a forward range no longer than
/// [`MAX_RECURRENCE_DAYS`].
pub fn within_span(start: NaiveDate, end: NaiveDate) -> bool {
    start <= end && (end - start).num_days() <= MAX_RECURRENCE_DAYS
}

/// Every date in `start..=end` that falls on `day_of_week` (Sunday = 0), at
/// `time`.
pub fn occurrences(
    day_of_week: i16,
    time: NaiveTime,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDateTime> {
    if !(0..=6).contains(&day_of_week) || !within_span(start, end) {
        return Vec::new();
    }

    let current = i64::from(start.weekday().num_days_from_sunday());
    let offset = (i64::from(day_of_week) - current).rem_euclid(7);
    let mut date = start + Duration::days(offset);

    let mut result = Vec::new();
    while date <= end {
        result.push(date.and_time(time));
        date += Duration::days(7);
    }
    result
}
