use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::users, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/register", post(users::register))
        .route("/api/auth/login", post(users::login))
        .route("/api/auth/logout", post(users::logout))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:id",
            get(users::get_user).put(users::update_user),
        )
}
