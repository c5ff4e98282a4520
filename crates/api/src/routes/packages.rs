use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::packages, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/packages",
            get(packages::list_packages).post(packages::create_package),
        )
        .route("/api/packages/:id", put(packages::update_package))
        .route("/api/packages/purchase", post(packages::purchase))
        .route(
            "/api/package-transactions",
            get(packages::list_transactions),
        )
        .route(
            "/api/package-transactions/:id/confirm",
            post(packages::confirm_transaction),
        )
        .route(
            "/api/package-transactions/:id/reject",
            post(packages::reject_transaction),
        )
        .route("/api/user-packages/:id", put(packages::update_user_package))
        .route(
            "/api/users/:id/packages",
            get(packages::list_user_packages),
        )
        .route("/api/users/:id/credits", get(packages::credit_balance))
        .route(
            "/api/users/:id/credit-history",
            get(packages::credit_history),
        )
}
