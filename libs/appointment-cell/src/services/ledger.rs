// libs/appointment-cell/src/services/ledger.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, error, info};

use shared_storage::{load_typed, save_typed, DocumentStore};

use crate::models::{Appointment, AppointmentError};

/// In-memory, write-through copy of the durable appointment document.
///
/// Every mutation is followed by a full save. If the save fails the mutation
/// is undone, so memory and storage never disagree.
pub struct AppointmentLedger {
    appointments: Vec<Appointment>,
    store: Arc<dyn DocumentStore>,
    key: String,
}

impl AppointmentLedger {
    pub async fn load(store: Arc<dyn DocumentStore>, key: impl Into<String>) -> Result<Self, AppointmentError> {
        let key = key.into();
        let appointments: Vec<Appointment> = load_typed(store.as_ref(), &key).await?;
        info!("Loaded {} appointments from '{}'", appointments.len(), key);

        Ok(Self { appointments, store, key })
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub async fn append(&mut self, appointment: Appointment) -> Result<(), AppointmentError> {
        self.appointments.push(appointment);

        if let Err(e) = self.persist().await {
            self.appointments.pop();
            return Err(e);
        }

        Ok(())
    }

    /// Removes the first appointment starting exactly at `start_time`,
    /// restricted to `doctor` when one is given. `Ok(None)` when nothing
    /// matches, in which case nothing is saved.
    pub async fn remove_first(
        &mut self,
        doctor: Option<&str>,
        start_time: NaiveDateTime,
    ) -> Result<Option<Appointment>, AppointmentError> {
        let Some(index) = self.appointments.iter().position(|appointment| {
            appointment.start_time == start_time && doctor.map_or(true, |name| appointment.is_with(name))
        }) else {
            return Ok(None);
        };

        let removed = self.appointments.remove(index);

        if let Err(e) = self.persist().await {
            self.appointments.insert(index, removed);
            return Err(e);
        }

        Ok(Some(removed))
    }

    async fn persist(&self) -> Result<(), AppointmentError> {
        save_typed(self.store.as_ref(), &self.key, &self.appointments)
            .await
            .map_err(|e| {
                error!("Failed to persist appointment ledger '{}': {}", self.key, e);
                AppointmentError::from(e)
            })?;

        debug!("Persisted {} appointments to '{}'", self.appointments.len(), self.key);
        Ok(())
    }
}
