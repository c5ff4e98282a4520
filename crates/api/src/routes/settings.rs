use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::{handlers::settings, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/deposit-accounts",
            get(settings::list_deposit_accounts).post(settings::create_deposit_account),
        )
        .route(
            "/api/deposit-accounts/:id",
            delete(settings::delete_deposit_account),
        )
}
