use axum::{
    extract::{Path, State},
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    forms::{ParseForm, PurchaseForm, UserPackageForm},
    models::package::{
        CreditBalance, CreditTransaction, Package, PackageInput, PackageTransaction,
        PurchaseRequest, TransactionStatus, UserPackage,
    },
};

use crate::{
    middleware::{
        auth::{AdminUser, AuthUser},
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_packages(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Package>>, AppError> {
    Ok(Json(state.services.packages.list_packages().await?))
}

#[axum::debug_handler]
pub async fn create_package(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Package> {
    form_action(form, "Package created", |input: PackageInput| async move {
        state.services.packages.create_package(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn update_package(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<Package> {
    form_action(form, "Package updated", |input: PackageInput| async move {
        state.services.packages.update_package(id, input).await
    })
    .await
}

/// A purchase with nothing left to pay is active right away; anything else
/// waits for staff to confirm the transfer.
#[axum::debug_handler]
pub async fn purchase(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Form(form): Form<FormData>,
) -> FormReply<PackageTransaction> {
    let input = match PurchaseForm::parse(&form) {
        Ok(input) => input,
        Err(errors) => return FormReply::field_errors(&form, errors),
    };
    let user_id = match auth.acting_for(input.user_id) {
        Ok(user_id) => user_id,
        Err(err) => return FormReply::failure(&form, err),
    };

    let request = PurchaseRequest {
        user_id,
        package_id: input.package_id,
        voucher_code: input.voucher_code,
        deposit_account_id: input.deposit_account_id,
    };
    match state.services.packages.purchase_package(request).await {
        Ok(transaction) => {
            let message = match transaction.status {
                TransactionStatus::Completed => "Package activated",
                _ => "Purchase recorded, awaiting payment confirmation",
            };
            FormReply::success(transaction, message)
        }
        Err(err) => FormReply::failure(&form, err),
    }
}

#[axum::debug_handler]
pub async fn list_transactions(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<PackageTransaction>>, AppError> {
    Ok(Json(state.services.packages.list_transactions().await?))
}

#[axum::debug_handler]
pub async fn confirm_transaction(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> FormReply<PackageTransaction> {
    let result = state.services.packages.confirm_transaction(id).await;
    FormReply::from_result(&FormData::new(), result, "Payment confirmed")
}

#[axum::debug_handler]
pub async fn reject_transaction(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> FormReply<PackageTransaction> {
    let result = state.services.packages.reject_transaction(id).await;
    FormReply::from_result(&FormData::new(), result, "Payment rejected")
}

#[axum::debug_handler]
pub async fn list_user_packages(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserPackage>>, AppError> {
    auth.ensure_can_access(user_id)?;
    Ok(Json(
        state.services.packages.list_user_packages(user_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn update_user_package(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<UserPackage> {
    form_action(form, "Package updated", |input: UserPackageForm| async move {
        state
            .services
            .packages
            .update_user_package(id, input.update)
            .await
    })
    .await
}

#[axum::debug_handler]
pub async fn credit_balance(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CreditBalance>>, AppError> {
    auth.ensure_can_access(user_id)?;
    Ok(Json(state.services.packages.credit_balance(user_id).await?))
}

#[axum::debug_handler]
pub async fn credit_history(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CreditTransaction>>, AppError> {
    auth.ensure_can_access(user_id)?;
    Ok(Json(state.services.packages.credit_history(user_id).await?))
}
