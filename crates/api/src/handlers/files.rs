//! Multipart uploads. Files land in the [`FileStore`](crate::storage::FileStore)
//! first and are attached to their owner afterwards; when attaching fails the
//! stored files are removed again.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use studio_core::{
    errors::{StudioError, StudioResult},
    models::location::{Asset, StoredFile},
};
use tracing::{debug, warn};

use crate::{
    middleware::{auth::AdminUser, error_handling::AppError},
    ApiState,
};

/// Saves every file part of the request, skipping plain fields and empty
/// parts.
pub(crate) async fn store_uploads(
    state: &ApiState,
    mut multipart: Multipart,
) -> StudioResult<Vec<StoredFile>> {
    let mut stored = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                discard(state, &stored).await;
                return Err(StudioError::Validation(err.body_text()));
            }
        };
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                discard(state, &stored).await;
                return Err(StudioError::Validation(err.body_text()));
            }
        };
        if bytes.is_empty() {
            debug!("Skipping empty upload {}", name);
            continue;
        }
        match state.files.save(&name, &bytes).await {
            Ok(file) => stored.push(file),
            Err(err) => {
                discard(state, &stored).await;
                return Err(StudioError::Internal(err.into()));
            }
        }
    }

    if stored.is_empty() {
        return Err(StudioError::Validation("No files uploaded".to_string()));
    }
    Ok(stored)
}

async fn discard(state: &ApiState, files: &[StoredFile]) {
    for file in files {
        if let Err(err) = state.files.remove(&file.url).await {
            warn!("Failed to remove upload {}: {:?}", file.url, err);
        }
    }
}

async fn attach<F, Fut>(
    state: &ApiState,
    multipart: Multipart,
    attach: F,
) -> Result<Json<Vec<Asset>>, AppError>
where
    F: FnOnce(Vec<StoredFile>) -> Fut,
    Fut: std::future::Future<Output = StudioResult<Vec<Asset>>>,
{
    let files = store_uploads(state, multipart).await?;
    match attach(files.clone()).await {
        Ok(assets) => Ok(Json(assets)),
        Err(err) => {
            discard(state, &files).await;
            Err(err.into())
        }
    }
}

#[axum::debug_handler]
pub async fn upload_files(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<Vec<StoredFile>>, AppError> {
    Ok(Json(store_uploads(&state, multipart).await?))
}

#[axum::debug_handler]
pub async fn upload_location_assets(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Vec<Asset>>, AppError> {
    let services = state.services.clone();
    attach(&state, multipart, |files| async move {
        services.locations.add_location_assets(id, files).await
    })
    .await
}

#[axum::debug_handler]
pub async fn upload_class_assets(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Vec<Asset>>, AppError> {
    let services = state.services.clone();
    attach(&state, multipart, |files| async move {
        services.classes.add_class_assets(id, files).await
    })
    .await
}
