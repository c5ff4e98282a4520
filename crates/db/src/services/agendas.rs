use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime, Utc};
use eyre::WrapErr;
use sqlx::PgConnection;
use studio_core::availability::fits_schedule;
use studio_core::booking::{check_seat, SeatRequest};
use studio_core::credits::{available_credit, pick_package};
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::agenda::{
    Agenda, AgendaBooking, AgendaInput, AgendaListing, AgendaRecurrence, AgendaRecurrenceInput,
    BookingStatus, RecurrenceResult,
};
use studio_core::models::loyalty::LoyaltyTrigger;
use studio_core::models::package::{CreditKind, UserPackage};
use studio_core::recurrence::{occurrences, within_span, MAX_RECURRENCE_DAYS};
use studio_core::services::AgendaService;
use tracing::{debug, info};

use super::{loyalty, schedule};
use crate::models::{convert_all, DbBooking, DbClass, DbFacility};
use crate::repositories::{agendas, bookings, classes, coaches, locations, packages, users};
use crate::DbPool;

pub struct PgAgendaService {
    pool: DbPool,
}

impl PgAgendaService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Agenda times are studio wall-clock times.
fn wall_clock_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Why a session cannot be placed at a given time.
enum Placement {
    Fits,
    Closed,
    Clash,
}

/// Class, coach and facility of a new session, with the facility row locked
/// so that concurrent writers cannot place overlapping sessions.
async fn load_placement_targets(
    conn: &mut PgConnection,
    class_id: i64,
    coach_id: i64,
    facility_id: i64,
) -> StudioResult<(DbClass, DbFacility)> {
    let class = classes::get_class_by_id(&mut *conn, class_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Class", class_id))?;
    coaches::get_coach_by_id(&mut *conn, coach_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Coach", coach_id))?;
    let facility = locations::lock_facility(&mut *conn, facility_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Facility", facility_id))?;
    Ok((class, facility))
}

async fn check_placement(
    conn: &mut PgConnection,
    facility: &DbFacility,
    starts_at: NaiveDateTime,
    duration_minutes: i32,
) -> StudioResult<Placement> {
    let date = starts_at.date();
    let duration = Duration::minutes(i64::from(duration_minutes));
    let hours = schedule::hours_on(conn, facility.location_id, date).await?;
    if !fits_schedule(&hours, &[], starts_at.time(), duration) {
        return Ok(Placement::Closed);
    }
    let busy = schedule::busy_on(conn, facility.id, date).await?;
    if !fits_schedule(&hours, &busy, starts_at.time(), duration) {
        return Ok(Placement::Clash);
    }
    Ok(Placement::Fits)
}

#[async_trait]
impl AgendaService for PgAgendaService {
    async fn create_agenda(&self, input: AgendaInput) -> StudioResult<Agenda> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let (class, facility) = load_placement_targets(
            &mut tx,
            input.class_id,
            input.coach_id,
            input.location_facility_id,
        )
        .await?;

        if input.is_show {
            match check_placement(&mut tx, &facility, input.time, class.duration_minutes).await? {
                Placement::Fits => {}
                Placement::Closed => {
                    return Err(StudioError::Conflict(format!(
                        "Location is closed at {}",
                        input.time
                    )))
                }
                Placement::Clash => {
                    return Err(StudioError::Conflict(format!(
                        "Facility {} is already in use at {}",
                        facility.name, input.time
                    )))
                }
            }
        }

        let row = agendas::create_agenda(
            &mut *tx,
            input.class_id,
            input.coach_id,
            input.location_facility_id,
            input.time,
            None,
            input.is_show,
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("Created agenda {} at {}", row.id, row.starts_at);
        Ok(row.into())
    }

    async fn list_agendas(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StudioResult<Vec<AgendaListing>> {
        if from >= to {
            return Err(StudioError::Validation(
                "Range start must be before its end".to_string(),
            ));
        }
        let rows = agendas::list_agendas_between(&self.pool, from, to).await?;
        Ok(rows.into_iter().map(AgendaListing::from).collect())
    }

    async fn create_agenda_recurrence(
        &self,
        input: AgendaRecurrenceInput,
    ) -> StudioResult<RecurrenceResult> {
        if input.start_date > input.end_date {
            return Err(StudioError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }
        if !within_span(input.start_date, input.end_date) {
            return Err(StudioError::Validation(format!(
                "Recurrence may cover at most {} days",
                MAX_RECURRENCE_DAYS
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let (class, facility) = load_placement_targets(
            &mut tx,
            input.class_id,
            input.coach_id,
            input.location_facility_id,
        )
        .await?;

        let recurrence = agendas::create_recurrence(
            &mut *tx,
            input.class_id,
            input.coach_id,
            input.location_facility_id,
            input.day_of_week,
            input.time,
            input.start_date,
            input.end_date,
        )
        .await?;

        let mut created = 0;
        let mut skipped = Vec::new();
        for starts_at in occurrences(
            input.day_of_week,
            input.time,
            input.start_date,
            input.end_date,
        ) {
            match check_placement(&mut tx, &facility, starts_at, class.duration_minutes).await? {
                Placement::Fits => {
                    agendas::create_agenda(
                        &mut *tx,
                        input.class_id,
                        input.coach_id,
                        input.location_facility_id,
                        starts_at,
                        Some(recurrence.id),
                        true,
                    )
                    .await?;
                    created += 1;
                }
                Placement::Closed | Placement::Clash => {
                    debug!("Skipping occurrence at {}", starts_at);
                    skipped.push(starts_at);
                }
            }
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!(
            "Recurrence {} created {} agendas, skipped {}",
            recurrence.id,
            created,
            skipped.len()
        );
        Ok(RecurrenceResult {
            recurrence: recurrence.into(),
            created,
            skipped,
        })
    }

    async fn find_all_agenda_recurrence(&self) -> StudioResult<Vec<AgendaRecurrence>> {
        let rows = agendas::list_recurrences(&self.pool).await?;
        Ok(rows.into_iter().map(AgendaRecurrence::from).collect())
    }

    async fn delete_agenda_recurrence(&self, id: i64) -> StudioResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        agendas::lock_recurrence(&mut *tx, id)
            .await?
            .ok_or_else(|| StudioError::not_found("Agenda recurrence", id))?;

        let removed = agendas::delete_unbooked_occurrences(&mut *tx, id, wall_clock_now()).await?;
        agendas::delete_recurrence(&mut *tx, id).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("Deleted recurrence {} and {} future agendas", id, removed);
        Ok(())
    }

    async fn book(&self, agenda_id: i64, user_id: i64) -> StudioResult<AgendaBooking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let agenda = agendas::lock_agenda(&mut *tx, agenda_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Agenda", agenda_id))?;
        if !agenda.is_show {
            return Err(StudioError::not_found("Agenda", agenda_id));
        }

        let class = classes::get_class_by_id(&mut *tx, agenda.class_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Class", agenda.class_id))?;

        users::lock_user(&mut *tx, user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", user_id))?;

        let already_booked = bookings::find_live_booking(&mut *tx, agenda_id, user_id)
            .await?
            .is_some();
        let seats_taken = bookings::count_seats_taken(&mut *tx, agenda_id).await?;

        let owned: Vec<UserPackage> =
            packages::lock_user_packages(&mut *tx, user_id, class.class_type_id)
                .await?
                .into_iter()
                .map(UserPackage::from)
                .collect();
        let outstanding =
            bookings::count_outstanding(&mut *tx, user_id, class.class_type_id).await?;

        check_seat(&SeatRequest {
            starts_at: agenda.starts_at,
            now: wall_clock_now(),
            already_booked,
            seats_taken,
            capacity: class.capacity,
            available_credit: available_credit(&owned, class.class_type_id, Utc::now()),
            outstanding,
        })?;

        let row = bookings::create_booking(&mut *tx, agenda_id, user_id).await?;
        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("User {} booked agenda {}", user_id, agenda_id);
        Ok(AgendaBooking::try_from(row)?)
    }

    async fn check_in(&self, booking_id: i64) -> StudioResult<AgendaBooking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let booking = lock_for_transition(&mut tx, booking_id, BookingStatus::CheckedIn).await?;

        let agenda = agendas::get_agenda_by_id(&mut *tx, booking.agenda_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Agenda", booking.agenda_id))?;
        let class = classes::get_class_by_id(&mut *tx, agenda.class_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Class", agenda.class_id))?;

        let owned: Vec<UserPackage> =
            packages::lock_user_packages(&mut *tx, booking.user_id, class.class_type_id)
                .await?
                .into_iter()
                .map(UserPackage::from)
                .collect();
        let package = pick_package(&owned, class.class_type_id, Utc::now()).ok_or_else(|| {
            StudioError::Conflict("No package with remaining credit for this class".to_string())
        })?;

        packages::set_credit_used(&mut *tx, package.id, package.credit_used + 1).await?;
        let note = format!("Check-in: {} on {}", class.name, agenda.starts_at);
        packages::insert_credit_transaction(
            &mut *tx,
            packages::CreditRow {
                user_id: booking.user_id,
                class_type_id: class.class_type_id,
                kind: CreditKind::Debit.as_str(),
                amount: 1,
                note: Some(&note),
                agenda_booking_id: Some(booking.id),
                user_package_id: Some(package.id),
            },
        )
        .await?;

        let row =
            bookings::set_status(&mut *tx, booking_id, BookingStatus::CheckedIn.as_str()).await?;
        loyalty::award_points(&mut tx, booking.user_id, LoyaltyTrigger::ClassCheckIn).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!(
            "Booking {} checked in against package {}",
            booking_id, package.id
        );
        Ok(AgendaBooking::try_from(row)?)
    }

    async fn cancel_booking(&self, booking_id: i64) -> StudioResult<AgendaBooking> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        lock_for_transition(&mut tx, booking_id, BookingStatus::Cancelled).await?;
        let row =
            bookings::set_status(&mut *tx, booking_id, BookingStatus::Cancelled.as_str()).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("Booking {} cancelled", booking_id);
        Ok(AgendaBooking::try_from(row)?)
    }

    async fn get_booking(&self, booking_id: i64) -> StudioResult<AgendaBooking> {
        let row = bookings::get_booking_by_id(&self.pool, booking_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Booking", booking_id))?;
        Ok(AgendaBooking::try_from(row)?)
    }

    async fn list_bookings(&self, agenda_id: i64) -> StudioResult<Vec<AgendaBooking>> {
        if agendas::get_agenda_by_id(&self.pool, agenda_id)
            .await?
            .is_none()
        {
            return Err(StudioError::not_found("Agenda", agenda_id));
        }
        let rows = bookings::list_bookings_for_agenda(&self.pool, agenda_id).await?;
        Ok(convert_all(rows)?)
    }
}

/// Locks the booking and checks that it may move to `next`.
async fn lock_for_transition(
    conn: &mut PgConnection,
    booking_id: i64,
    next: BookingStatus,
) -> StudioResult<DbBooking> {
    let row = bookings::lock_booking(&mut *conn, booking_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Booking", booking_id))?;
    let current: BookingStatus = row.status.parse().map_err(eyre::Report::from)?;
    if !current.can_transition_to(next) {
        return Err(StudioError::Conflict(format!(
            "Booking is {} and cannot become {}",
            current, next
        )));
    }
    Ok(row)
}
