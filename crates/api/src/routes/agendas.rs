use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::agendas, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/agendas",
            get(agendas::list_agendas).post(agendas::create_agenda),
        )
        .route("/api/agendas/:id/bookings", get(agendas::list_bookings))
        .route(
            "/api/agenda-recurrences",
            get(agendas::list_recurrences).post(agendas::create_recurrence),
        )
        .route(
            "/api/agenda-recurrences/:id",
            delete(agendas::delete_recurrence),
        )
        .route("/api/bookings", post(agendas::book))
        .route("/api/bookings/:id/check-in", post(agendas::check_in))
        .route("/api/bookings/:id/cancel", post(agendas::cancel_booking))
}
