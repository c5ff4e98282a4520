use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    models::coach::{Coach, CoachInput},
};

use crate::{
    middleware::{
        auth::AdminUser,
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_coaches(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Coach>>, AppError> {
    Ok(Json(state.services.coaches.list_coaches().await?))
}

#[axum::debug_handler]
pub async fn create_coach(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Coach> {
    form_action(form, "Coach created", |input: CoachInput| async move {
        state.services.coaches.create_coach(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn update_coach(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<Coach> {
    form_action(form, "Coach updated", |input: CoachInput| async move {
        state.services.coaches.update_coach(id, input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn delete_coach(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.coaches.delete_coach(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
