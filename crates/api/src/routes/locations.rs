use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::locations, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/api/locations/:id",
            get(locations::get_location).put(locations::update_location),
        )
        .route(
            "/api/locations/:id/operational-hours",
            put(locations::set_operational_hours),
        )
        .route(
            "/api/locations/:id/facilities",
            post(locations::create_facility),
        )
        .route("/api/locations/assets/:id", delete(locations::delete_asset))
        .route("/api/facilities/:id", delete(locations::delete_facility))
        .route(
            "/api/facilities/:id/availability",
            get(locations::facility_availability),
        )
}
