use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    forms::settings::WebSettingsForm,
    models::settings::{DepositAccount, DepositAccountInput, WebSettings},
};

use crate::{
    middleware::{
        auth::AdminUser,
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<WebSettings>, AppError> {
    Ok(Json(state.services.settings.get_settings().await?))
}

#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<WebSettings> {
    form_action(form, "Settings saved", |WebSettingsForm(settings): WebSettingsForm| async move {
        state.services.settings.update_settings(settings).await
    })
    .await
}

#[axum::debug_handler]
pub async fn list_deposit_accounts(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<DepositAccount>>, AppError> {
    Ok(Json(state.services.settings.list_deposit_accounts().await?))
}

#[axum::debug_handler]
pub async fn create_deposit_account(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<DepositAccount> {
    form_action(
        form,
        "Deposit account created",
        |input: DepositAccountInput| async move {
            state.services.settings.create_deposit_account(input).await
        },
    )
    .await
}

#[axum::debug_handler]
pub async fn delete_deposit_account(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.settings.delete_deposit_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
