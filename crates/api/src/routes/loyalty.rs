use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::loyalty, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/loyalty/rewards",
            get(loyalty::list_rewards).post(loyalty::create_reward),
        )
        .route(
            "/api/loyalty/shop",
            get(loyalty::list_shop_items).post(loyalty::create_shop_item),
        )
        .route("/api/loyalty/shop/:id/redeem", post(loyalty::redeem))
        .route("/api/users/:id/loyalty", get(loyalty::balance))
        .route("/api/users/:id/loyalty/history", get(loyalty::history))
}
