use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use studio_core::{
    errors::{StudioError, StudioResult},
    form::{parse_date, parse_datetime, FormData},
    forms::{BookingForm, ParseForm},
    models::agenda::{
        Agenda, AgendaBooking, AgendaInput, AgendaListing, AgendaRecurrence,
        AgendaRecurrenceInput, RecurrenceResult,
    },
};

use crate::{
    middleware::{
        auth::{AdminUser, AuthUser},
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

const DEFAULT_RANGE_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
pub struct AgendaRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Accepts a date (midnight) or a date and time.
fn parse_bound(field: &str, raw: &str) -> StudioResult<NaiveDateTime> {
    parse_datetime(raw)
        .or_else(|| parse_date(raw).map(|date| date.and_time(NaiveTime::MIN)))
        .ok_or_else(|| StudioError::Validation(format!("Invalid {} '{}'", field, raw)))
}

impl AgendaRange {
    /// Resolves the window, defaulting to a week from the start of today.
    pub fn resolve(&self, today: NaiveDateTime) -> StudioResult<(NaiveDateTime, NaiveDateTime)> {
        let from = match &self.from {
            Some(raw) => parse_bound("from", raw)?,
            None => today,
        };
        let to = match &self.to {
            Some(raw) => parse_bound("to", raw)?,
            None => from + Duration::days(DEFAULT_RANGE_DAYS),
        };
        if to <= from {
            return Err(StudioError::Validation(
                "'to' must be after 'from'".to_string(),
            ));
        }
        Ok((from, to))
    }
}

#[axum::debug_handler]
pub async fn list_agendas(
    State(state): State<Arc<ApiState>>,
    Query(range): Query<AgendaRange>,
) -> Result<Json<Vec<AgendaListing>>, AppError> {
    let today = Local::now().date_naive().and_time(NaiveTime::MIN);
    let (from, to) = range.resolve(today)?;
    Ok(Json(state.services.agendas.list_agendas(from, to).await?))
}

#[axum::debug_handler]
pub async fn create_agenda(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Agenda> {
    form_action(form, "Agenda created", |input: AgendaInput| async move {
        state.services.agendas.create_agenda(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn list_recurrences(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<AgendaRecurrence>>, AppError> {
    Ok(Json(
        state.services.agendas.find_all_agenda_recurrence().await?,
    ))
}

/// The success message reports how many occurrences were scheduled and
/// skipped.
#[axum::debug_handler]
pub async fn create_recurrence(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<RecurrenceResult> {
    let input = match AgendaRecurrenceInput::parse(&form) {
        Ok(input) => input,
        Err(errors) => return FormReply::field_errors(&form, errors),
    };

    match state.services.agendas.create_agenda_recurrence(input).await {
        Ok(result) => {
            let message = if result.skipped.is_empty() {
                format!("{} agendas scheduled", result.created)
            } else {
                format!(
                    "{} agendas scheduled, {} skipped",
                    result.created,
                    result.skipped.len()
                )
            };
            FormReply::success(result, message)
        }
        Err(err) => FormReply::failure(&form, err),
    }
}

#[axum::debug_handler]
pub async fn delete_recurrence(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.agendas.delete_agenda_recurrence(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(agenda_id): Path<i64>,
) -> Result<Json<Vec<AgendaBooking>>, AppError> {
    Ok(Json(state.services.agendas.list_bookings(agenda_id).await?))
}

/// Members book for themselves; admins may book on behalf of a member.
#[axum::debug_handler]
pub async fn book(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Form(form): Form<FormData>,
) -> FormReply<AgendaBooking> {
    form_action(form, "Booked", |input: BookingForm| async move {
        let user_id = auth.acting_for(input.user_id)?;
        state.services.agendas.book(input.agenda_id, user_id).await
    })
    .await
}

#[axum::debug_handler]
pub async fn check_in(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> FormReply<AgendaBooking> {
    let result = state.services.agendas.check_in(id).await;
    FormReply::from_result(&FormData::new(), result, "Checked in")
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> FormReply<AgendaBooking> {
    let result = async {
        let booking = state.services.agendas.get_booking(id).await?;
        auth.ensure_can_access(booking.user_id)?;
        state.services.agendas.cancel_booking(id).await
    }
    .await;
    FormReply::from_result(&FormData::new(), result, "Booking cancelled")
}
