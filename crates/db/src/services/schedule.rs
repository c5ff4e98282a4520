//! Facility occupancy shared by agenda creation and availability lookups.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use eyre::Result;
use sqlx::PgConnection;
use studio_core::availability::{Busy, MAX_SLOT_MINUTES};
use studio_core::models::location::OperationalHour;

use crate::models::DbOccupiedSlot;
use crate::repositories::{agendas, locations};

/// Sunday = 0, matching `day_of_week` columns.
pub(crate) fn weekday_of(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Opening windows of the location on the weekday of `date`.
pub(crate) async fn hours_on(
    conn: &mut PgConnection,
    location_id: i64,
    date: NaiveDate,
) -> Result<Vec<OperationalHour>> {
    let day = weekday_of(date);
    let hours = locations::get_operational_hours(&mut *conn, location_id)
        .await?
        .into_iter()
        .filter(|h| h.day_of_week == day)
        .map(OperationalHour::from)
        .collect();
    Ok(hours)
}

/// Intervals of `date` taken by visible sessions on the facility, including
/// sessions that started the day before and run past midnight.
pub(crate) async fn busy_on(
    conn: &mut PgConnection,
    facility_id: i64,
    date: NaiveDate,
) -> Result<Vec<Busy>> {
    let day_start = date.and_time(NaiveTime::MIN);
    let from = day_start - Duration::minutes(MAX_SLOT_MINUTES);
    let to = day_start + Duration::days(1);
    let slots = agendas::occupied_slots(&mut *conn, facility_id, from, to).await?;
    Ok(clip_to_day(day_start, &slots))
}

pub(crate) fn clip_to_day(day_start: NaiveDateTime, slots: &[DbOccupiedSlot]) -> Vec<Busy> {
    let day_end = day_start + Duration::days(1);
    slots
        .iter()
        .filter_map(|slot| {
            let end = slot.starts_at + Duration::minutes(i64::from(slot.duration_minutes));
            if end <= day_start || slot.starts_at >= day_end {
                return None;
            }
            let start = slot.starts_at.max(day_start);
            Some(Busy::new(start.time(), end - start))
        })
        .collect()
}
