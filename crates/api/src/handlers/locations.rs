use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use studio_core::{
    availability::slot_lengths,
    errors::StudioError,
    form::{parse_date, FormData},
    forms::location::OperationalHoursForm,
    models::location::{
        Asset, FacilityAvailability, FacilityInput, Location, LocationDetail, LocationFacility,
        LocationInput, OperationalHour,
    },
};
use tracing::warn;

use crate::{
    middleware::{
        auth::AdminUser,
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

const DEFAULT_DURATION_MINUTES: i64 = 60;
const DEFAULT_STEP_MINUTES: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub duration: Option<i64>,
    pub step: Option<i64>,
}

#[axum::debug_handler]
pub async fn list_locations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Location>>, AppError> {
    Ok(Json(state.services.locations.list_locations().await?))
}

#[axum::debug_handler]
pub async fn get_location(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<LocationDetail>, AppError> {
    Ok(Json(state.services.locations.get_location(id).await?))
}

#[axum::debug_handler]
pub async fn create_location(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Location> {
    form_action(form, "Location created", |input: LocationInput| async move {
        state.services.locations.create_location(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn update_location(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<Location> {
    form_action(form, "Location updated", |input: LocationInput| async move {
        state.services.locations.update_location(id, input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn set_operational_hours(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<Vec<OperationalHour>> {
    form_action(
        form,
        "Operational hours saved",
        |OperationalHoursForm(hours): OperationalHoursForm| async move {
            state
                .services
                .locations
                .set_operational_hours(id, hours)
                .await
        },
    )
    .await
}

#[axum::debug_handler]
pub async fn create_facility(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(location_id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<LocationFacility> {
    form_action(form, "Facility created", |input: FacilityInput| async move {
        state
            .services
            .locations
            .create_facility(location_id, input)
            .await
    })
    .await
}

#[axum::debug_handler]
pub async fn delete_facility(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.locations.delete_facility(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the asset row, then its file. A file that cannot be removed is
/// only logged since the asset is already gone.
#[axum::debug_handler]
pub async fn delete_asset(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Asset>, AppError> {
    let asset = state.services.locations.delete_asset(id).await?;
    if let Err(err) = state.files.remove(&asset.url).await {
        warn!("Failed to remove file of asset {}: {:?}", id, err);
    }
    Ok(Json(asset))
}

#[axum::debug_handler]
pub async fn facility_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<FacilityAvailability>, AppError> {
    let date = parse_date(&query.date).ok_or_else(|| {
        StudioError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", query.date))
    })?;

    let duration = query.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    let step = query.step.unwrap_or(DEFAULT_STEP_MINUTES);
    slot_lengths(duration, step).map_err(|message| StudioError::Validation(message.to_string()))?;

    let availability = state
        .services
        .locations
        .facility_availability(id, date, duration, step)
        .await?;
    Ok(Json(availability))
}
