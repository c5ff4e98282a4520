use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::vouchers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/vouchers",
            get(vouchers::list_vouchers).post(vouchers::create_voucher),
        )
        .route("/api/vouchers/preview", post(vouchers::preview_voucher))
        .route("/api/vouchers/:id", delete(vouchers::delete_voucher))
}
