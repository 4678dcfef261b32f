// libs/appointment-cell/src/services/booking.rs
use chrono::NaiveDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use notification_cell::{NotificationDispatcher, NotificationMessage, NotificationStatus};

use crate::models::{
    slot_end, Appointment, AppointmentError, AvailabilityReport, BookAppointmentRequest, BookingMode,
    BookingOutcome, CancelAppointmentRequest, CancellationOutcome,
};
use crate::services::conflict::SlotConflictEngine;
use crate::services::ledger::AppointmentLedger;

pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmation";
pub const CANCELLATION_SUBJECT: &str = "Appointment Cancellation";

/// Book and cancel transactions over the shared ledger.
///
/// A single lock covers check-then-append and find-then-remove, including the
/// save. Notification happens after the lock is released and never undoes a
/// committed change.
pub struct AppointmentBookingService {
    ledger: Mutex<AppointmentLedger>,
    notifications: NotificationDispatcher,
}

impl AppointmentBookingService {
    pub fn new(ledger: AppointmentLedger, notifications: NotificationDispatcher) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            notifications,
        }
    }

    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        mode: BookingMode,
    ) -> Result<BookingOutcome, AppointmentError> {
        let appointment = validate_booking(request)?;
        debug!("Booking {:?} for {} at {} ({:?})",
               appointment.doctor, appointment.patient, appointment.start_time, mode);

        {
            let mut ledger = self.ledger.lock().await;

            let conflict = {
                let engine = SlotConflictEngine::new(ledger.appointments());
                match (mode, appointment.doctor.as_deref()) {
                    (BookingMode::DoctorScoped, Some(doctor)) => {
                        !engine.is_available(doctor, appointment.start_time)
                    }
                    (BookingMode::DoctorScoped, None) => {
                        return Err(AppointmentError::ValidationError(
                            "doctor is required for doctor-scoped booking".to_string(),
                        ));
                    }
                    (BookingMode::GlobalExactMatch, _) => {
                        engine.has_exact_collision(appointment.start_time)
                    }
                }
            };

            if conflict {
                warn!("Attempt to book already booked slot: {} ({:?})",
                      appointment.start_time, appointment.doctor);
                return Err(AppointmentError::SlotConflict {
                    doctor: appointment.doctor.clone(),
                    start_time: appointment.start_time,
                });
            }

            ledger.append(appointment.clone()).await?;
            info!("Appointment booked: {} with {:?} for {}",
                  appointment.start_time, appointment.doctor, appointment.patient);
        }

        let notification = self.notifications.dispatch(confirmation_message(&appointment)).await;
        log_notification(&notification, &appointment.patient, "Confirmation");

        Ok(BookingOutcome {
            appointment,
            notification,
        })
    }

    pub async fn cancel(&self, request: CancelAppointmentRequest) -> Result<CancellationOutcome, AppointmentError> {
        let doctor = request.doctor.as_deref().filter(|name| !name.trim().is_empty());

        let removed = {
            let mut ledger = self.ledger.lock().await;

            let Some(removed) = ledger.remove_first(doctor, request.start_time).await? else {
                warn!("No appointment found to cancel at: {} ({:?})", request.start_time, doctor);
                return Err(AppointmentError::NotFound {
                    doctor: doctor.map(str::to_string),
                    start_time: request.start_time,
                });
            };

            info!("Appointment canceled: {} ({:?})", removed.start_time, removed.doctor);
            removed
        };

        let notification = self.notifications.dispatch(cancellation_message(&removed)).await;
        log_notification(&notification, &removed.patient, "Cancellation");

        Ok(CancellationOutcome {
            appointment: removed,
            notification,
        })
    }

    pub async fn is_available(&self, doctor: &str, proposed_start: NaiveDateTime) -> bool {
        let ledger = self.ledger.lock().await;
        SlotConflictEngine::new(ledger.appointments()).is_available(doctor, proposed_start)
    }

    pub async fn check_availability(&self, doctor: &str, proposed_start: NaiveDateTime) -> AvailabilityReport {
        let ledger = self.ledger.lock().await;
        let engine = SlotConflictEngine::new(ledger.appointments());
        let conflicting_appointments: Vec<Appointment> = engine
            .conflicting_appointments(doctor, proposed_start)
            .into_iter()
            .cloned()
            .collect();

        let end_time = slot_end(proposed_start);

        AvailabilityReport {
            doctor: doctor.to_string(),
            start_time: proposed_start,
            end_time: end_time.unwrap_or(NaiveDateTime::MAX),
            available: end_time.is_some() && conflicting_appointments.is_empty(),
            conflicting_appointments,
        }
    }

    pub async fn next_available_slot(&self, from_time: NaiveDateTime) -> Result<NaiveDateTime, AppointmentError> {
        let ledger = self.ledger.lock().await;
        SlotConflictEngine::new(ledger.appointments())
            .next_available_slot(from_time)
            .ok_or(AppointmentError::NoSlotAvailable { after: from_time })
    }

    pub async fn next_available_slot_for_doctor(
        &self,
        doctor: &str,
        from_time: NaiveDateTime,
    ) -> Result<NaiveDateTime, AppointmentError> {
        let ledger = self.ledger.lock().await;
        SlotConflictEngine::new(ledger.appointments())
            .next_available_slot_for_doctor(doctor, from_time)
            .ok_or(AppointmentError::NoSlotAvailable { after: from_time })
    }

    pub async fn list_appointments(&self) -> Vec<Appointment> {
        self.ledger.lock().await.appointments().to_vec()
    }

    pub async fn appointments_for_patient(&self, patient: &str) -> Vec<Appointment> {
        self.filtered(|appointment| appointment.patient == patient).await
    }

    pub async fn appointments_for_doctor(&self, doctor: &str) -> Vec<Appointment> {
        self.filtered(|appointment| appointment.is_with(doctor)).await
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let ledger = self.ledger.lock().await;
        ledger
            .appointments()
            .iter()
            .filter(|appointment| predicate(appointment))
            .cloned()
            .collect()
    }
}

fn validate_booking(request: BookAppointmentRequest) -> Result<Appointment, AppointmentError> {
    let patient = request.patient.trim().to_string();
    if patient.is_empty() {
        return Err(AppointmentError::ValidationError("patient must not be empty".to_string()));
    }

    if slot_end(request.start_time).is_none() {
        return Err(AppointmentError::ValidationError(format!(
            "start_time {} leaves no room for a 30-minute slot",
            request.start_time
        )));
    }

    let doctor = request
        .doctor
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let disease = request
        .disease
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty());

    Ok(Appointment {
        doctor,
        patient,
        disease,
        start_time: request.start_time,
    })
}

pub fn confirmation_message(appointment: &Appointment) -> NotificationMessage {
    let when = appointment.start_time.format("%Y-%m-%d %H:%M");
    let body = match (&appointment.doctor, &appointment.disease) {
        (Some(doctor), Some(disease)) => {
            format!("Your appointment with {} for {} is confirmed on {}.", doctor, disease, when)
        }
        (Some(doctor), None) => format!("Your appointment with {} is confirmed on {}.", doctor, when),
        (None, _) => format!(
            "Your appointment with {} is booked for {}.",
            appointment.patient, appointment.start_time
        ),
    };

    NotificationMessage::new(appointment.patient.clone(), CONFIRMATION_SUBJECT, body)
}

pub fn cancellation_message(appointment: &Appointment) -> NotificationMessage {
    NotificationMessage::new(
        appointment.patient.clone(),
        CANCELLATION_SUBJECT,
        format!("Your appointment on {} has been canceled.", appointment.start_time),
    )
}

fn log_notification(status: &NotificationStatus, recipient: &str, kind: &str) {
    match status {
        NotificationStatus::Sent => info!("{} email sent to user: {}", kind, recipient),
        NotificationStatus::Failed(reason) => {
            warn!("{} email to {} failed, change already committed: {}", kind, recipient, reason)
        }
        NotificationStatus::TimedOut => {
            warn!("{} email to {} still pending, change already committed", kind, recipient)
        }
    }
}
