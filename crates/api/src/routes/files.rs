use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::{handlers::files, ApiState};

/// Upload routes, the only ones accepting bodies up to `max_upload_bytes`.
pub fn routes(max_upload_bytes: usize) -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/files", post(files::upload_files))
        .route(
            "/api/locations/:id/assets",
            post(files::upload_location_assets),
        )
        .route("/api/classes/:id/assets", post(files::upload_class_assets))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
