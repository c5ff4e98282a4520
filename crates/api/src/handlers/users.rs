use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    errors::StudioError,
    form::FormData,
    forms::{LoginForm, ParseForm, RegisterForm},
    models::user::{Session, User, UserRole, UserUpdate},
};

use crate::{
    middleware::{
        auth::{AdminUser, AuthUser, BearerToken},
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<FormData>,
) -> FormReply<User> {
    form_action(form, "Account created", |RegisterForm(new_user): RegisterForm| async move {
        state.services.users.register(new_user).await
    })
    .await
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<FormData>,
) -> FormReply<Session> {
    form_action(form, "Signed in", |LoginForm(credentials): LoginForm| async move {
        state.services.users.login(credentials).await
    })
    .await
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    state.services.users.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.services.users.list_users().await?))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    auth.ensure_can_access(id)?;
    Ok(Json(state.services.users.get_user(id).await?))
}

/// Members may edit their own profile but never their role.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> Result<FormReply<User>, AppError> {
    auth.ensure_can_access(id)?;

    let mut update = match UserUpdate::parse(&form) {
        Ok(update) => update,
        Err(errors) => return Ok(FormReply::field_errors(&form, errors)),
    };
    if !auth.0.is_admin() {
        update.role = None;
    }
    if auth.0.id == id && update.role.is_some_and(|role| role != UserRole::Admin) {
        return Ok(FormReply::failure(
            &form,
            StudioError::Validation("Admins cannot demote themselves".to_string()),
        ));
    }

    let result = state.services.users.update_user(id, update).await;
    Ok(FormReply::from_result(&form, result, "Profile updated"))
}
