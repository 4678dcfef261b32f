use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic scheduler API is running!" }))
        .nest("/doctors", doctor_routes(state.doctors.clone()))
        .nest("/appointments", appointment_routes(state.scheduling.clone()))
}
