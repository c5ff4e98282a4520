use crate::models::{DbAgenda, DbAgendaListing, DbAgendaRecurrence, DbOccupiedSlot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use eyre::Result;
use sqlx::PgExecutor;

const AGENDA_COLUMNS: &str =
    "id, class_id, coach_id, location_facility_id, starts_at, recurrence_id, is_show, created_at";

const RECURRENCE_COLUMNS: &str = "id, class_id, coach_id, location_facility_id, day_of_week, \
     start_time, start_date, end_date, created_at";

pub async fn create_agenda<'e, E: PgExecutor<'e>>(
    executor: E,
    class_id: i64,
    coach_id: i64,
    location_facility_id: i64,
    starts_at: NaiveDateTime,
    recurrence_id: Option<i64>,
    is_show: bool,
) -> Result<DbAgenda> {
    tracing::debug!(
        "Creating agenda: class_id={}, facility_id={}, starts_at={}",
        class_id,
        location_facility_id,
        starts_at
    );

    let agenda = sqlx::query_as::<_, DbAgenda>(&format!(
        r#"
        INSERT INTO agendas (class_id, coach_id, location_facility_id, starts_at, recurrence_id, is_show)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {AGENDA_COLUMNS}
        "#
    ))
    .bind(class_id)
    .bind(coach_id)
    .bind(location_facility_id)
    .bind(starts_at)
    .bind(recurrence_id)
    .bind(is_show)
    .fetch_one(executor)
    .await?;

    Ok(agenda)
}

pub async fn get_agenda_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbAgenda>> {
    let agenda = sqlx::query_as::<_, DbAgenda>(&format!(
        "SELECT {AGENDA_COLUMNS} FROM agendas WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(agenda)
}

/// Locks the agenda row; seat counting for a booking happens under it.
pub async fn lock_agenda<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbAgenda>> {
    let agenda = sqlx::query_as::<_, DbAgenda>(&format!(
        "SELECT {AGENDA_COLUMNS} FROM agendas WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(agenda)
}

/// Visible agendas starting in `[from, to)`, with class, coach and facility
/// names and the number of seats taken.
pub async fn list_agendas_between<'e, E: PgExecutor<'e>>(
    executor: E,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DbAgendaListing>> {
    let listings = sqlx::query_as::<_, DbAgendaListing>(
        r#"
        SELECT a.id, a.starts_at,
               c.id AS class_id, c.name AS class_name, c.class_type_id, c.duration_minutes,
               co.id AS coach_id, co.name AS coach_name,
               f.id AS location_facility_id, f.name AS facility_name,
               c.capacity,
               (SELECT COUNT(*) FROM agenda_bookings b
                WHERE b.agenda_id = a.id AND b.status <> 'cancelled') AS booked
        FROM agendas a
        JOIN classes c ON c.id = a.class_id
        JOIN coaches co ON co.id = a.coach_id
        JOIN location_facilities f ON f.id = a.location_facility_id
        WHERE a.is_show AND a.starts_at >= $1 AND a.starts_at < $2
        ORDER BY a.starts_at ASC, a.id ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(listings)
}

/// Visible sessions on the facility that start in `[from, to)`. Callers widen the
/// window by the longest class so that sessions running over the start of
/// the window are included.
pub async fn occupied_slots<'e, E: PgExecutor<'e>>(
    executor: E,
    location_facility_id: i64,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DbOccupiedSlot>> {
    let slots = sqlx::query_as::<_, DbOccupiedSlot>(
        r#"
        SELECT a.starts_at, c.duration_minutes
        FROM agendas a
        JOIN classes c ON c.id = a.class_id
        WHERE a.location_facility_id = $1 AND a.is_show
          AND a.starts_at >= $2 AND a.starts_at < $3
        ORDER BY a.starts_at ASC
        "#,
    )
    .bind(location_facility_id)
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(slots)
}

pub async fn create_recurrence<'e, E: PgExecutor<'e>>(
    executor: E,
    class_id: i64,
    coach_id: i64,
    location_facility_id: i64,
    day_of_week: i16,
    start_time: NaiveTime,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<DbAgendaRecurrence> {
    let recurrence = sqlx::query_as::<_, DbAgendaRecurrence>(&format!(
        r#"
        INSERT INTO agenda_recurrences
            (class_id, coach_id, location_facility_id, day_of_week, start_time, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {RECURRENCE_COLUMNS}
        "#
    ))
    .bind(class_id)
    .bind(coach_id)
    .bind(location_facility_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(executor)
    .await?;

    Ok(recurrence)
}

pub async fn list_recurrences<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbAgendaRecurrence>> {
    let recurrences = sqlx::query_as::<_, DbAgendaRecurrence>(&format!(
        "SELECT {RECURRENCE_COLUMNS} FROM agenda_recurrences ORDER BY day_of_week ASC, start_time ASC, id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(recurrences)
}

pub async fn lock_recurrence<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbAgendaRecurrence>> {
    let recurrence = sqlx::query_as::<_, DbAgendaRecurrence>(&format!(
        "SELECT {RECURRENCE_COLUMNS} FROM agenda_recurrences WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(recurrence)
}

/// Deletes agendas of the rule that start at or after `from` and have never
/// been booked. Agendas with booking history stay, detached from the rule.
pub async fn delete_unbooked_occurrences<'e, E: PgExecutor<'e>>(
    executor: E,
    recurrence_id: i64,
    from: NaiveDateTime,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM agendas a
        WHERE a.recurrence_id = $1
          AND a.starts_at >= $2
          AND NOT EXISTS (SELECT 1 FROM agenda_bookings b WHERE b.agenda_id = a.id)
        "#,
    )
    .bind(recurrence_id)
    .bind(from)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_recurrence<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM agenda_recurrences WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
