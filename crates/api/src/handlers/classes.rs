use axum::{
    extract::{Path, State},
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    forms::class::ClassTypeForm,
    models::{
        class::{Class, ClassDetail, ClassDetailInput, ClassInput, ClassType},
        location::Asset,
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

#[axum::debug_handler]
pub async fn list_class_types(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ClassType>>, AppError> {
    Ok(Json(state.services.classes.list_class_types().await?))
}

#[axum::debug_handler]
pub async fn create_class_type(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<ClassType> {
    form_action(form, "Class type created", |ClassTypeForm(name): ClassTypeForm| async move {
        state.services.classes.create_class_type(name).await
    })
    .await
}

#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Class>>, AppError> {
    Ok(Json(state.services.classes.list_classes().await?))
}

#[axum::debug_handler]
pub async fn get_class(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ClassDetail>, AppError> {
    Ok(Json(state.services.classes.get_class(id).await?))
}

#[axum::debug_handler]
pub async fn create_class(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<Class> {
    form_action(form, "Class created", |input: ClassInput| async move {
        state.services.classes.create_class(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn update_class(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<Class> {
    form_action(form, "Class updated", |input: ClassInput| async move {
        state.services.classes.update_class(id, input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn update_class_detail(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Form(form): Form<FormData>,
) -> FormReply<ClassDetail> {
    form_action(form, "Class details saved", |input: ClassDetailInput| async move {
        state.services.classes.update_class_detail(id, input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn delete_class_asset(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Asset>, AppError> {
    let asset = state.services.classes.delete_class_asset(id).await?;
    if let Err(err) = state.files.remove(&asset.url).await {
        warn!("Failed to remove file of class asset {}: {:?}", id, err);
    }
    Ok(Json(asset))
}
