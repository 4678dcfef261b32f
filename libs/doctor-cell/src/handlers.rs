use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::DoctorError;
use crate::services::matching::DoctorMatchingService;

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub disease: String,
}

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound(name) => AppError::NotFound(format!("Doctor not found: {}", name)),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DuplicateDoctor(_) => AppError::Internal(e.to_string()),
            DoctorError::Storage(err) => AppError::Storage(err.to_string()),
        }
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<DoctorMatchingService>>,
) -> Result<Json<Value>, AppError> {
    let doctors = service.all_doctors();

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn search_doctors(
    State(service): State<Arc<DoctorMatchingService>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    if query.disease.trim().is_empty() {
        return Err(AppError::BadRequest("disease must not be empty".to_string()));
    }

    let result = service.search(&query.disease);
    let total = result.doctors.len();

    Ok(Json(json!({
        "disease": result.disease,
        "specialty": result.specialty,
        "doctors": result.doctors,
        "total": total
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(service): State<Arc<DoctorMatchingService>>,
    Path(name): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.get_doctor(&name)?;
    Ok(Json(json!(doctor)))
}
