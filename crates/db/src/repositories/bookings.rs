use crate::models::DbBooking;
use eyre::Result;
use sqlx::PgExecutor;

const BOOKING_COLUMNS: &str = "id, agenda_id, user_id, status, created_at, updated_at";

pub async fn create_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    agenda_id: i64,
    user_id: i64,
) -> Result<DbBooking> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO agenda_bookings (agenda_id, user_id, status)
        VALUES ($1, $2, 'booked')
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(agenda_id)
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM agenda_bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn lock_booking<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM agenda_bookings WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn set_status<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: &str,
) -> Result<DbBooking> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE agenda_bookings
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_one(executor)
    .await?;

    Ok(booking)
}

/// Seats taken on the agenda: every booking that is not cancelled.
pub async fn count_seats_taken<'e, E: PgExecutor<'e>>(executor: E, agenda_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM agenda_bookings WHERE agenda_id = $1 AND status <> 'cancelled'",
    )
    .bind(agenda_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// The user's booking on the agenda that still holds a seat, if any.
pub async fn find_live_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    agenda_id: i64,
    user_id: i64,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS} FROM agenda_bookings
        WHERE agenda_id = $1 AND user_id = $2 AND status <> 'cancelled'
        "#
    ))
    .bind(agenda_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(booking)
}

pub async fn list_bookings_for_agenda<'e, E: PgExecutor<'e>>(
    executor: E,
    agenda_id: i64,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM agenda_bookings WHERE agenda_id = $1 ORDER BY created_at ASC, id ASC"
    ))
    .bind(agenda_id)
    .fetch_all(executor)
    .await?;

    Ok(bookings)
}

/// Bookings of the user still waiting for check-in, per class type. Each of
/// them has a credit reserved against the user's packages.
pub async fn count_outstanding<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    class_type_id: i64,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM agenda_bookings b
        JOIN agendas a ON a.id = b.agenda_id
        JOIN classes c ON c.id = a.class_id
        WHERE b.user_id = $1 AND b.status = 'booked' AND c.class_type_id = $2
        "#,
    )
    .bind(user_id)
    .bind(class_type_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// Outstanding bookings of the user grouped by class type.
pub async fn outstanding_by_class_type<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Vec<(i64, i64)>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT c.class_type_id, COUNT(*)
        FROM agenda_bookings b
        JOIN agendas a ON a.id = b.agenda_id
        JOIN classes c ON c.id = a.class_id
        WHERE b.user_id = $1 AND b.status = 'booked'
        GROUP BY c.class_type_id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}
