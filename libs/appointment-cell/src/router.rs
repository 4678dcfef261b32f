// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::scheduling::SchedulingService;

pub fn appointment_routes(service: Arc<SchedulingService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::book_appointment))
        .route("/legacy", post(handlers::book_appointment_legacy))
        .route("/cancel", post(handlers::cancel_appointment))
        .route("/availability", get(handlers::check_availability))
        .route("/next-available", get(handlers::next_available_slot))
        .route("/suggestions", get(handlers::suggest_appointments))
        .with_state(service)
}
