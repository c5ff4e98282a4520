//! Free time on a facility for one day.

use chrono::{Duration, NaiveTime};

use crate::models::location::OperationalHour;

/// Half-open interval `[start, end)` already taken on the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Busy {
    pub fn new(start: NaiveTime, duration: Duration) -> Self {
        Self {
            start,
            end: end_of(start, duration).unwrap_or_else(|| last_instant(start)),
        }
    }

    fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && self.start < end
    }
}

fn last_instant(fallback: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(fallback)
}

/// `start + duration` when it does not run past midnight.
fn end_of(start: NaiveTime, duration: Duration) -> Option<NaiveTime> {
    let (end, wrapped) = start.overflowing_add_signed(duration);
    (wrapped == 0 && end > start).then_some(end)
}

/// Whether a session of `duration` starting at `start` fits in one opening
/// window and clashes with nothing in `busy`.
pub fn fits_schedule(
    hours: &[OperationalHour],
    busy: &[Busy],
    start: NaiveTime,
    duration: Duration,
) -> bool {
    let Some(end) = end_of(start, duration) else {
        return false;
    };
    let open = hours
        .iter()
        .any(|h| h.open_time <= start && end <= h.close_time);
    open && !busy.iter().any(|b| b.overlaps(start, end))
}

/// Longest session or step, in minutes, a day can hold.
pub const MAX_SLOT_MINUTES: i64 = 24 * 60;

pub const SLOT_OUT_OF_RANGE: &str = "Duration and step must be between 1 and 1440 minutes";

/// Session length and step for a slot search, both within one day.
pub fn slot_lengths(
    duration_minutes: i64,
    step_minutes: i64,
) -> Result<(Duration, Duration), &'static str> {
    let within_day = |minutes: i64| (1..=MAX_SLOT_MINUTES).contains(&minutes);
    if !within_day(duration_minutes) || !within_day(step_minutes) {
        return Err(SLOT_OUT_OF_RANGE);
    }
    Ok((Duration::minutes(duration_minutes), Duration::minutes(step_minutes)))
}

/// Every start time, stepping by `step` from each opening, at which a session
/// of `duration` fits. Sorted and without duplicates.
pub fn available_slots(
    hours: &[OperationalHour],
    busy: &[Busy],
    duration: Duration,
    step: Duration,
) -> Vec<NaiveTime> {
    if duration <= Duration::zero() || step <= Duration::zero() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for window in hours.iter().filter(|h| h.is_valid()) {
        let mut start = window.open_time;
        while let Some(end) = end_of(start, duration) {
            if end > window.close_time {
                break;
            }
            if fits_schedule(hours, busy, start, duration) {
                slots.push(start);
            }
            match end_of(start, step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    slots.sort();
    slots.dedup();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn hours(open: NaiveTime, close: NaiveTime) -> OperationalHour {
        OperationalHour {
            day_of_week: 1,
            open_time: open,
            close_time: close,
        }
    }

    #[test]
    fn slots_fill_opening_window() {
        let slots = available_slots(
            &[hours(t(7, 0), t(10, 0))],
            &[],
            Duration::minutes(60),
            Duration::minutes(60),
        );
        assert_eq!(slots, vec![t(7, 0), t(8, 0), t(9, 0)]);
    }

    #[test]
    fn busy_sessions_block_overlapping_starts() {
        let busy = [Busy::new(t(8, 0), Duration::minutes(60))];
        let slots = available_slots(
            &[hours(t(7, 0), t(10, 0))],
            &busy,
            Duration::minutes(60),
            Duration::minutes(30),
        );
        assert_eq!(slots, vec![t(7, 0), t(9, 0)]);
    }

    #[test]
    fn split_windows_are_each_used() {
        let slots = available_slots(
            &[hours(t(17, 0), t(19, 0)), hours(t(7, 0), t(8, 0))],
            &[],
            Duration::minutes(60),
            Duration::minutes(60),
        );
        assert_eq!(slots, vec![t(7, 0), t(17, 0), t(18, 0)]);
    }

    #[test]
    fn closed_day_has_no_slots() {
        assert!(available_slots(&[], &[], Duration::minutes(60), Duration::minutes(60)).is_empty());
    }

    #[rstest]
    #[case(60, 30, true)]
    #[case(MAX_SLOT_MINUTES, 1, true)]
    #[case(0, 30, false)]
    #[case(60, -5, false)]
    #[case(MAX_SLOT_MINUTES + 1, 30, false)]
    #[case(i64::MAX, 30, false)]
    #[case(60, i64::MAX, false)]
    fn slot_lengths_stay_within_a_day(
        #[case] duration: i64,
        #[case] step: i64,
        #[case] accepted: bool,
    ) {
        let result = slot_lengths(duration, step);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert_eq!(result, Err(SLOT_OUT_OF_RANGE));
        }
    }

    #[test]
    fn session_must_end_before_closing() {
        let open = [hours(t(7, 0), t(8, 0))];
        assert!(fits_schedule(&open, &[], t(7, 0), Duration::minutes(60)));
        assert!(!fits_schedule(&open, &[], t(7, 30), Duration::minutes(60)));
        assert!(!fits_schedule(&open, &[], t(23, 30), Duration::minutes(60)));
    }

    #[test]
    fn back_to_back_sessions_do_not_clash() {
        let open = [hours(t(7, 0), t(12, 0))];
        let busy = [Busy::new(t(8, 0), Duration::minutes(60))];
        assert!(fits_schedule(&open, &busy, t(9, 0), Duration::minutes(45)));
        assert!(fits_schedule(&open, &busy, t(7, 0), Duration::minutes(60)));
        assert!(!fits_schedule(&open, &busy, t(8, 30), Duration::minutes(60)));
    }
}
