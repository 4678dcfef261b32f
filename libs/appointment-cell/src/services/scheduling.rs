// libs/appointment-cell/src/services/scheduling.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use doctor_cell::{Doctor, DoctorMatchingService};

use crate::models::{
    Appointment, AppointmentError, AvailabilityReport, BookAppointmentRequest, BookingMode,
    BookingOutcome, CancelAppointmentRequest, CancellationOutcome, DoctorSuggestion,
};
use crate::services::booking::AppointmentBookingService;
use crate::services::conflict::suggest_next_hour;

/// Entry point for the external UI/chat caller: which doctors can see a
/// patient, and when.
pub struct SchedulingService {
    doctors: Arc<DoctorMatchingService>,
    booking: Arc<AppointmentBookingService>,
}

impl SchedulingService {
    pub fn new(doctors: Arc<DoctorMatchingService>, booking: Arc<AppointmentBookingService>) -> Self {
        Self { doctors, booking }
    }

    pub fn doctors_for_disease(&self, disease: &str) -> Vec<Doctor> {
        self.doctors.doctors_for_disease(disease)
    }

    /// One proposal per doctor treating `disease`, each at that doctor's next
    /// free slot. Doctors with no slot left in the calendar are omitted. The
    /// caller may override the time before booking.
    pub async fn suggest_appointments(&self, disease: &str, now: NaiveDateTime) -> Vec<DoctorSuggestion> {
        let candidates = self.doctors_for_disease(disease);
        debug!("Suggesting slots for {} doctors treating '{}'", candidates.len(), disease);

        let mut suggestions = Vec::with_capacity(candidates.len());
        for doctor in candidates {
            match self.booking.next_available_slot_for_doctor(&doctor.name, now).await {
                Ok(suggested_time) => suggestions.push(DoctorSuggestion { doctor, suggested_time }),
                Err(e) => debug!("No suggestion for {}: {}", doctor.name, e),
            }
        }

        suggestions
    }

    pub async fn next_available_slot(&self, now: NaiveDateTime) -> Result<NaiveDateTime, AppointmentError> {
        self.booking.next_available_slot(now).await
    }

    pub async fn next_available_slot_for_doctor(
        &self,
        doctor: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime, AppointmentError> {
        self.booking.next_available_slot_for_doctor(doctor, now).await
    }

    pub fn suggest_next_hour(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        suggest_next_hour(now)
    }

    pub async fn is_available(&self, doctor: &str, start_time: NaiveDateTime) -> bool {
        self.booking.is_available(doctor, start_time).await
    }

    pub async fn check_availability(&self, doctor: &str, start_time: NaiveDateTime) -> AvailabilityReport {
        self.booking.check_availability(doctor, start_time).await
    }

    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        mode: BookingMode,
    ) -> Result<BookingOutcome, AppointmentError> {
        self.booking.book(request, mode).await
    }

    pub async fn cancel(&self, request: CancelAppointmentRequest) -> Result<CancellationOutcome, AppointmentError> {
        self.booking.cancel(request).await
    }

    pub async fn list_appointments(&self) -> Vec<Appointment> {
        self.booking.list_appointments().await
    }

    pub async fn appointments_for_patient(&self, patient: &str) -> Vec<Appointment> {
        self.booking.appointments_for_patient(patient).await
    }

    pub async fn appointments_for_doctor(&self, doctor: &str) -> Vec<Appointment> {
        self.booking.appointments_for_doctor(doctor).await
    }
}
