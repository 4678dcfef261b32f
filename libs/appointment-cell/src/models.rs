// libs/appointment-cell/src/models.rs
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use doctor_cell::Doctor;
use notification_cell::NotificationStatus;
use shared_storage::StorageError;

/// Every appointment occupies one fixed-length slot.
pub const SLOT_DURATION_MINUTES: i64 = 30;

pub fn slot_duration() -> Duration {
    Duration::minutes(SLOT_DURATION_MINUTES)
}

/// End of the slot starting at `start`, or `None` when it would run past the
/// last representable instant.
pub fn slot_end(start: NaiveDateTime) -> Option<NaiveDateTime> {
    start.checked_add_signed(slot_duration())
}

// ==============================================================================
// CORE APPOINTMENT MODEL
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(rename = "user", alias = "name")]
    pub patient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(rename = "time")]
    pub start_time: NaiveDateTime,
}

impl Appointment {
    /// Saturates at `NaiveDateTime::MAX` for records stored near the end of
    /// the calendar.
    pub fn end_time(&self) -> NaiveDateTime {
        slot_end(self.start_time).unwrap_or(NaiveDateTime::MAX)
    }

    pub fn is_with(&self, doctor: &str) -> bool {
        self.doctor.as_deref() == Some(doctor)
    }
}

// ==============================================================================
// BOOKING MODES
// ==============================================================================

/// Which conflict policy a booking is checked against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    /// Reject only when the same doctor has an overlapping 30-minute slot.
    #[default]
    DoctorScoped,
    /// Reject when any appointment, for any doctor, starts at the exact same
    /// instant. Kept for records written by the original chat tool.
    GlobalExactMatch,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor: Option<String>,
    pub patient: String,
    pub disease: Option<String>,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    /// When absent, the first appointment at `start_time` is cancelled
    /// regardless of doctor.
    pub doctor: Option<String>,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    pub notification: NotificationStatus,
}

impl BookingOutcome {
    pub fn message(&self) -> String {
        let when = self.appointment.start_time.format("%Y-%m-%d %H:%M");
        match &self.notification {
            NotificationStatus::Sent => format!("Appointment booked for {}.", when),
            NotificationStatus::Failed(reason) => {
                format!("Appointment booked, but email notification failed: {}", reason)
            }
            NotificationStatus::TimedOut => {
                format!("Appointment booked for {}, email notification still pending.", when)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub appointment: Appointment,
    pub notification: NotificationStatus,
}

impl CancellationOutcome {
    pub fn message(&self) -> String {
        match &self.notification {
            NotificationStatus::Sent => format!("Appointment at {} cancelled", self.appointment.start_time),
            NotificationStatus::Failed(reason) => {
                format!("Appointment canceled, but email notification failed: {}", reason)
            }
            NotificationStatus::TimedOut => format!(
                "Appointment at {} cancelled, email notification still pending.",
                self.appointment.start_time
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub doctor: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub available: bool,
    pub conflicting_appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSuggestion {
    pub doctor: Doctor,
    pub suggested_time: NaiveDateTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment at {start_time} conflicts with an existing booking{}", doctor_suffix(.doctor))]
    SlotConflict {
        doctor: Option<String>,
        start_time: NaiveDateTime,
    },

    #[error("No appointment found at {start_time}{}", doctor_suffix(.doctor))]
    NotFound {
        doctor: Option<String>,
        start_time: NaiveDateTime,
    },

    #[error("No free 30-minute slot after {after}")]
    NoSlotAvailable { after: NaiveDateTime },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

fn doctor_suffix(doctor: &Option<String>) -> String {
    match doctor {
        Some(name) => format!(" for {}", name),
        None => String::new(),
    }
}
