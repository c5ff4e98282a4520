use axum::{
    extract::{Path, State},
    http::StatusCode,
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    forms::VoucherPreviewForm,
    models::voucher::{Voucher, VoucherInput},
    pricing::PriceBreakdown,
};

use crate::{
    middleware::{
        auth::{AdminUser, AuthUser},
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_vouchers(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<Voucher>>, AppError> {
    Ok(Json(state.services.vouchers.list_vouchers().await?))
}

#[axum::debug_handler]
pub async fn create_voucher(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Voucher> {
    form_action(form, "Voucher created", |input: VoucherInput| async move {
        state.services.vouchers.create_voucher(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn delete_voucher(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.vouchers.delete_voucher(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Prices a package with the code for the signed-in member.
#[axum::debug_handler]
pub async fn preview_voucher(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Form(form): Form<FormData>,
) -> FormReply<PriceBreakdown> {
    form_action(form, "Voucher applied", |input: VoucherPreviewForm| async move {
        state
            .services
            .vouchers
            .preview_voucher(&input.code, input.package_id, auth.0.id)
            .await
    })
    .await
}
