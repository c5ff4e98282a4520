use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::coaches, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/coaches",
            get(coaches::list_coaches).post(coaches::create_coach),
        )
        .route(
            "/api/coaches/:id",
            put(coaches::update_coach).delete(coaches::delete_coach),
        )
}
