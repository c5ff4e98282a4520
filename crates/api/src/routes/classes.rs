use axum::{
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::classes, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/class-types",
            get(classes::list_class_types).post(classes::create_class_type),
        )
        .route(
            "/api/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route(
            "/api/classes/:id",
            get(classes::get_class).put(classes::update_class),
        )
        .route("/api/classes/:id/detail", put(classes::update_class_detail))
        .route("/api/classes/assets/:id", delete(classes::delete_class_asset))
}
