// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest, BookingMode, CancelAppointmentRequest};
use crate::services::scheduling::SchedulingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentListQuery {
    pub patient: Option<String>,
    pub doctor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor: String,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NextAvailableQuery {
    pub doctor: Option<String>,
    /// Search origin; defaults to the server's local time.
    pub from: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub disease: String,
    pub from: Option<NaiveDateTime>,
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::SlotConflict { .. } => AppError::Conflict(e.to_string()),
            AppointmentError::NotFound { .. } => AppError::NotFound(e.to_string()),
            AppointmentError::NoSlotAvailable { .. } => AppError::BadRequest(e.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Storage(err) => AppError::Storage(err.to_string()),
        }
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

// ==============================================================================
// BOOKING AND CANCELLATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(service): State<Arc<SchedulingService>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    book_with_mode(&service, request, BookingMode::DoctorScoped).await
}

/// Legacy booking: rejects any exact start-time collision across all doctors.
#[axum::debug_handler]
pub async fn book_appointment_legacy(
    State(service): State<Arc<SchedulingService>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    book_with_mode(&service, request, BookingMode::GlobalExactMatch).await
}

async fn book_with_mode(
    service: &SchedulingService,
    request: BookAppointmentRequest,
    mode: BookingMode,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let outcome = service.book(request, mode).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mode": mode,
            "appointment": outcome.appointment,
            "notification": outcome.notification,
            "message": outcome.message()
        })),
    ))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(service): State<Arc<SchedulingService>>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let outcome = service.cancel(request).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": outcome.appointment,
        "notification": outcome.notification,
        "message": outcome.message()
    })))
}

// ==============================================================================
// AVAILABILITY AND LISTING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = match (query.patient, query.doctor) {
        (Some(patient), _) => service.appointments_for_patient(&patient).await,
        (None, Some(doctor)) => service.appointments_for_doctor(&doctor).await,
        (None, None) => service.list_appointments().await,
    };

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn check_availability(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let report = service.check_availability(&query.doctor, query.start_time).await;
    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn next_available_slot(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<NextAvailableQuery>,
) -> Result<Json<Value>, AppError> {
    let from = query.from.unwrap_or_else(local_now);

    let slot = match query.doctor.as_deref() {
        Some(doctor) => service.next_available_slot_for_doctor(doctor, from).await?,
        None => service.next_available_slot(from).await?,
    };

    Ok(Json(json!({
        "doctor": query.doctor,
        "start_time": slot,
        "message": format!("One appointment available at {}", slot)
    })))
}

#[axum::debug_handler]
pub async fn suggest_appointments(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<Value>, AppError> {
    if query.disease.trim().is_empty() {
        return Err(AppError::BadRequest("disease must not be empty".to_string()));
    }

    let now = query.from.unwrap_or_else(local_now);
    let suggestions = service.suggest_appointments(&query.disease, now).await;

    Ok(Json(json!({
        "disease": query.disease,
        "suggestions": suggestions,
        "fallback_time": service.suggest_next_hour(now)
    })))
}
