use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::matching::DoctorMatchingService;

pub fn doctor_routes(service: Arc<DoctorMatchingService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/search", get(handlers::search_doctors))
        .route("/{name}", get(handlers::get_doctor))
        .with_state(service)
}
